use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read deployment file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML in deployment file: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error(
        "deployment file not found\nsearched from: {0}\nhint: run inside a directory containing deployment.yml, or set ANUBIS_DEPLOYMENT_FILE"
    )]
    DeploymentFileNotFound(PathBuf),

    #[error("unknown profile(s): {}", .0.join(", "))]
    UnknownProfiles(Vec<String>),

    #[error("environment not found: {0}")]
    EnvironmentNotFound(String),

    #[error("profile '{profile}' references undeclared service '{service}'")]
    UndeclaredService { profile: String, service: String },

    #[error("service not found: {0}")]
    ServiceNotFound(String),

    #[error("no profiles requested and no default_profiles configured")]
    NoProfilesSelected,

    #[error("dependency cycle detected: {0}")]
    DependencyCycle(String),

    #[error("invalid deployment: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
