//! Service definition

use super::port::Port;
use super::volume::Volume;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Service definition
///
/// YAML form:
/// ```yaml
/// services:
///   db:
///     image: postgres:16
///     restart: unless-stopped
///     ports:
///       - host: 5432
///         container: 5432
///     environment:
///       POSTGRES_PASSWORD: secret
///     volumes:
///       - host: ./data
///         container: /var/lib/postgresql/data
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub environment: HashMap<String, String>,
    #[serde(default)]
    pub volumes: Vec<Volume>,
    /// Services that must be started before this one
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Build configuration; services without one are never built
    #[serde(default)]
    pub build: Option<BuildConfig>,
    /// Restart policy (no, always, on-failure, unless-stopped)
    #[serde(default)]
    pub restart: Option<RestartPolicy>,
}

/// Restart policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// Never restart (default)
    #[default]
    No,
    /// Always restart
    Always,
    /// Restart on abnormal exit only
    OnFailure,
    /// Restart unless explicitly stopped
    UnlessStopped,
}

impl RestartPolicy {
    /// Parse from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "no" => Some(Self::No),
            "always" => Some(Self::Always),
            "on-failure" | "on_failure" => Some(Self::OnFailure),
            "unless-stopped" | "unless_stopped" => Some(Self::UnlessStopped),
            _ => None,
        }
    }

    /// String form used by the Docker API.
    pub fn as_docker_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Always => "always",
            Self::OnFailure => "on-failure",
            Self::UnlessStopped => "unless-stopped",
        }
    }
}

/// Build configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Build context path, relative to the deployment file
    #[serde(default)]
    pub context: Option<PathBuf>,
    /// Dockerfile path, relative to the build context
    #[serde(default)]
    pub dockerfile: Option<PathBuf>,
    /// Build arguments
    #[serde(default)]
    pub args: HashMap<String, String>,
    /// Multi-stage build target
    #[serde(default)]
    pub target: Option<String>,
}

impl Service {
    /// Whether `build` would produce an image for this service.
    pub fn is_buildable(&self) -> bool {
        self.build.is_some()
    }

    /// Merge another Service into this one.
    ///
    /// Fields set in `other` win (override semantics):
    /// - Option<T>: other's Some replaces, None keeps the original
    /// - Vec<T>: other's non-empty list replaces, empty keeps
    /// - HashMap<K, V>: merged key-by-key, other wins
    pub fn merge(&mut self, other: Service) {
        if other.image.is_some() {
            self.image = other.image;
        }
        if other.command.is_some() {
            self.command = other.command;
        }
        if other.build.is_some() {
            self.build = other.build;
        }
        if other.restart.is_some() {
            self.restart = other.restart;
        }

        if !other.ports.is_empty() {
            self.ports = other.ports;
        }
        if !other.volumes.is_empty() {
            self.volumes = other.volumes;
        }
        if !other.depends_on.is_empty() {
            self.depends_on = other.depends_on;
        }

        for (key, value) in other.environment {
            self.environment.insert(key, value);
        }
    }
}
