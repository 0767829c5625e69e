//! Deployment file loading
//!
//! Locates, parses, and validates the deployment file. Validation runs
//! before any orchestration action so a broken file never reaches the
//! container runtime.

use crate::error::{ConfigError, Result};
use crate::model::Deployment;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File names probed when no explicit path is given.
const DEPLOYMENT_FILE_CANDIDATES: [&str; 2] = ["deployment.yml", "deployment.yaml"];

/// Locate the deployment file.
///
/// Search order:
/// 1. the ANUBIS_DEPLOYMENT_FILE environment variable (direct path)
/// 2. deployment.yml / deployment.yaml in the current directory or the
///    nearest ancestor that has one
pub fn find_deployment_file() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("ANUBIS_DEPLOYMENT_FILE") {
        let path = PathBuf::from(&path);
        debug!(env_path = %path.display(), "Checking ANUBIS_DEPLOYMENT_FILE");
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::DeploymentFileNotFound(path));
    }

    let start_dir = std::env::current_dir()?;
    find_deployment_file_from(&start_dir)
}

/// Locate the deployment file walking up from `start_dir`.
pub fn find_deployment_file_from(start_dir: &Path) -> Result<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for candidate in DEPLOYMENT_FILE_CANDIDATES {
            let path = current.join(candidate);
            debug!(checking = %path.display(), "Looking for deployment file");
            if path.exists() {
                info!(deployment_file = %path.display(), "Found deployment file");
                return Ok(path);
            }
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return Err(ConfigError::DeploymentFileNotFound(start_dir.to_path_buf())),
        }
    }
}

/// Load and validate a deployment file.
pub fn load_deployment(path: &Path) -> Result<Deployment> {
    debug!(path = %path.display(), "Loading deployment file");

    let content = std::fs::read_to_string(path)?;
    let deployment: Deployment = serde_yaml::from_str(&content)?;
    validate(&deployment)?;

    info!(
        services = deployment.services.len(),
        profiles = deployment.profiles.len(),
        environments = deployment.environments.len(),
        "Deployment loaded"
    );

    Ok(deployment)
}

/// Locate, load, and validate in one step.
pub fn load() -> Result<(Deployment, PathBuf)> {
    let path = find_deployment_file()?;
    let deployment = load_deployment(&path)?;
    Ok((deployment, path))
}

/// Structural validation, independent of any requested profiles.
fn validate(deployment: &Deployment) -> Result<()> {
    if deployment.name.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "deployment 'name' must not be empty".to_string(),
        ));
    }

    // Every service a profile names must be declared.
    for (profile, services) in &deployment.profiles {
        for service in services {
            if !deployment.services.contains_key(service) {
                return Err(ConfigError::UndeclaredService {
                    profile: profile.clone(),
                    service: service.clone(),
                });
            }
        }
    }

    // default_profiles must themselves exist.
    let unknown_defaults: Vec<String> = deployment
        .default_profiles
        .iter()
        .filter(|p| !deployment.profiles.contains_key(*p))
        .cloned()
        .collect();
    if !unknown_defaults.is_empty() {
        return Err(ConfigError::UnknownProfiles(unknown_defaults));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const VALID_DEPLOYMENT: &str = r#"
name: myproject
default_profiles: [infra]
environments:
  dev:
    variables:
      DATABASE_URL: postgres://localhost/dev
profiles:
  infra: [db]
  api: [web]
services:
  db:
    image: postgres:16
  web:
    build:
      context: ./web
"#;

    #[test]
    fn test_load_valid_deployment() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment.yml");
        fs::write(&path, VALID_DEPLOYMENT).unwrap();

        let deployment = load_deployment(&path).unwrap();
        assert_eq!(deployment.name, "myproject");
        assert_eq!(deployment.profiles["infra"], vec!["db"]);
        assert!(deployment.services["web"].is_buildable());
        assert!(!deployment.services["db"].is_buildable());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_deployment(&dir.path().join("deployment.yml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment.yml");
        fs::write(&path, "name: [unclosed").unwrap();

        let result = load_deployment(&path);
        assert!(matches!(result, Err(ConfigError::YamlParse(_))));
    }

    #[test]
    fn test_profile_referencing_undeclared_service() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment.yml");
        fs::write(
            &path,
            "name: p\nprofiles:\n  infra: [ghost]\nservices: {}\n",
        )
        .unwrap();

        let result = load_deployment(&path);
        match result {
            Err(ConfigError::UndeclaredService { profile, service }) => {
                assert_eq!(profile, "infra");
                assert_eq!(service, "ghost");
            }
            other => panic!("expected UndeclaredService, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_default_profile() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment.yml");
        fs::write(&path, "name: p\ndefault_profiles: [nope]\n").unwrap();

        let result = load_deployment(&path);
        assert!(matches!(result, Err(ConfigError::UnknownProfiles(_))));
    }

    #[test]
    fn test_find_in_current_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("deployment.yml"), VALID_DEPLOYMENT).unwrap();

        let found = find_deployment_file_from(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("deployment.yml"));
    }

    #[test]
    fn test_find_in_ancestor_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("deployment.yaml"), VALID_DEPLOYMENT).unwrap();
        let nested = dir.path().join("services/web");
        fs::create_dir_all(&nested).unwrap();

        let found = find_deployment_file_from(&nested).unwrap();
        assert_eq!(found, dir.path().join("deployment.yaml"));
    }

    #[test]
    fn test_find_prefers_yml_over_yaml() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("deployment.yml"), VALID_DEPLOYMENT).unwrap();
        fs::write(dir.path().join("deployment.yaml"), VALID_DEPLOYMENT).unwrap();

        let found = find_deployment_file_from(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("deployment.yml"));
    }
}
