//! Deployment file root

use super::environment::Environment;
use super::service::Service;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Deployment - the orchestration blueprint
///
/// A deployment declares the services of a project, the profiles that
/// group them, and the environments supplying per-variant settings.
/// It is loaded once per invocation and read-only during execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deployment {
    /// Project name
    pub name: String,
    /// Shared Docker network name; defaults to "{name}-{environment}"
    #[serde(default)]
    pub network: Option<String>,
    /// Profiles selected when none are requested explicitly
    #[serde(default)]
    pub default_profiles: Vec<String>,
    /// Named configuration variants
    #[serde(default)]
    pub environments: HashMap<String, Environment>,
    /// Profile name → service names it groups
    #[serde(default)]
    pub profiles: HashMap<String, Vec<String>>,
    /// Services defined by this deployment
    #[serde(default)]
    pub services: HashMap<String, Service>,
}

impl Deployment {
    /// Name of the shared network joined by every started container.
    pub fn network_name(&self, environment: &str) -> String {
        match &self.network {
            Some(name) => name.clone(),
            None => format!("{}-{}", self.name, environment),
        }
    }

    /// Look up the active environment.
    ///
    /// A file without an `environments` section accepts any name and
    /// yields an empty variable set; once environments are declared,
    /// an unknown name is a configuration error.
    pub fn environment(&self, name: &str) -> Result<Environment> {
        if self.environments.is_empty() {
            return Ok(Environment::default());
        }
        self.environments
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::EnvironmentNotFound(name.to_string()))
    }

    /// Look up a service definition.
    pub fn service(&self, name: &str) -> Result<&Service> {
        self.services
            .get(name)
            .ok_or_else(|| ConfigError::ServiceNotFound(name.to_string()))
    }
}
