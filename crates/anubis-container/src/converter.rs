//! Conversion from deployment definitions to Docker API parameters

use anubis_core::{Environment, Service};
use bollard::container::{Config, CreateContainerOptions, NetworkingConfig};
use bollard::models::{EndpointSettings, HostConfig, PortBinding, RestartPolicyNameEnum};
use std::collections::HashMap;

/// Name of the container backing a service: {project}-{environment}-{service}.
pub fn container_name(project: &str, environment: &str, service: &str) -> String {
    format!("{}-{}-{}", project, environment, service)
}

/// Image reference for a service.
///
/// Uses the declared image (tagged `latest` if untagged); services
/// without one get "{project}-{service}:latest", the tag `build`
/// produces for them.
pub fn resolve_image(project: &str, service_name: &str, service: &Service) -> String {
    match &service.image {
        Some(img) if img.contains(':') => img.clone(),
        Some(img) => format!("{}:latest", img),
        None => format!("{}-{}:latest", project, service_name),
    }
}

/// Convert a Service into the Docker container configuration used to
/// create it.
///
/// Environment variables layer in two steps: the active environment's
/// variables first, service-level variables over them.
pub fn service_to_container_config(
    service_name: &str,
    service: &Service,
    environment_name: &str,
    environment: &Environment,
    project_name: &str,
    network_name: &str,
) -> (Config<String>, CreateContainerOptions<String>) {
    let image = resolve_image(project_name, service_name, service);

    // Environment variables: environment entry first, service wins.
    let mut merged: HashMap<String, String> = environment.variables.clone();
    for (k, v) in &service.environment {
        merged.insert(k.clone(), v.clone());
    }
    let env: Vec<String> = merged.iter().map(|(k, v)| format!("{}={}", k, v)).collect();

    // Port bindings
    let mut port_bindings = HashMap::new();
    let mut exposed_ports = HashMap::new();

    for port in &service.ports {
        let container_port = format!("{}/{}", port.container, port.protocol.as_str());

        exposed_ports.insert(container_port.clone(), HashMap::new());

        let host_ip = port.host_ip.as_deref().unwrap_or("0.0.0.0");
        port_bindings.insert(
            container_port,
            Some(vec![PortBinding {
                host_ip: Some(host_ip.to_string()),
                host_port: Some(port.host.to_string()),
            }]),
        );
    }

    // Volume bindings; relative host paths are anchored to the cwd
    let binds: Vec<String> = service
        .volumes
        .iter()
        .map(|v| {
            let mode = if v.read_only { "ro" } else { "rw" };
            let host_path = if v.host.is_relative() {
                std::env::current_dir()
                    .unwrap_or_else(|_| v.host.clone())
                    .join(&v.host)
            } else {
                v.host.clone()
            };
            format!("{}:{}:{}", host_path.display(), v.container.display(), mode)
        })
        .collect();

    let restart_policy = service.restart.map(|p| bollard::models::RestartPolicy {
        name: Some(match p {
            anubis_core::RestartPolicy::No => RestartPolicyNameEnum::NO,
            anubis_core::RestartPolicy::Always => RestartPolicyNameEnum::ALWAYS,
            anubis_core::RestartPolicy::OnFailure => RestartPolicyNameEnum::ON_FAILURE,
            anubis_core::RestartPolicy::UnlessStopped => RestartPolicyNameEnum::UNLESS_STOPPED,
        }),
        maximum_retry_count: None,
    });

    let host_config = Some(HostConfig {
        port_bindings: Some(port_bindings),
        binds: Some(binds),
        network_mode: Some(network_name.to_string()),
        restart_policy,
        ..Default::default()
    });

    // Labels for ps filtering and compose-compatible grouping
    let mut labels = HashMap::new();
    labels.insert(
        "com.docker.compose.project".to_string(),
        format!("{}-{}", project_name, environment_name),
    );
    labels.insert(
        "com.docker.compose.service".to_string(),
        service_name.to_string(),
    );
    labels.insert("anubis.project".to_string(), project_name.to_string());
    labels.insert(
        "anubis.environment".to_string(),
        environment_name.to_string(),
    );
    labels.insert("anubis.service".to_string(), service_name.to_string());

    // Attach to the shared network under the service name so services
    // reach each other by name.
    let mut endpoints = HashMap::new();
    endpoints.insert(
        network_name.to_string(),
        EndpointSettings {
            aliases: Some(vec![service_name.to_string()]),
            ..Default::default()
        },
    );
    let networking_config = Some(NetworkingConfig {
        endpoints_config: endpoints,
    });

    let config = Config {
        image: Some(image),
        env: Some(env),
        exposed_ports: Some(exposed_ports),
        host_config,
        labels: Some(labels),
        cmd: service
            .command
            .as_ref()
            .map(|c| c.split_whitespace().map(String::from).collect()),
        networking_config,
        ..Default::default()
    };

    let options = CreateContainerOptions {
        name: container_name(project_name, environment_name, service_name),
        platform: None,
    };

    (config, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anubis_core::{Port, Protocol, RestartPolicy, Volume};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn no_env() -> Environment {
        Environment::default()
    }

    #[test]
    fn test_basic_conversion() {
        let service = Service {
            image: Some("postgres:16".to_string()),
            ..Default::default()
        };

        let (config, options) = service_to_container_config(
            "db",
            &service,
            "dev",
            &no_env(),
            "myproject",
            "myproject-dev",
        );

        assert_eq!(config.image, Some("postgres:16".to_string()));
        assert_eq!(options.name, "myproject-dev-db");
    }

    #[test]
    fn test_untagged_image_gets_latest() {
        let service = Service {
            image: Some("redis".to_string()),
            ..Default::default()
        };

        let (config, _) =
            service_to_container_config("cache", &service, "dev", &no_env(), "p", "p-dev");

        assert_eq!(config.image, Some("redis:latest".to_string()));
    }

    #[test]
    fn test_buildable_service_image_tag() {
        // No image declared: the name build would tag it with.
        let service = Service::default();
        assert_eq!(resolve_image("myproject", "web", &service), "myproject-web:latest");
    }

    #[test]
    fn test_environment_variables_injected() {
        let environment = Environment {
            variables: HashMap::from([
                ("DATABASE_URL".to_string(), "postgres://prod".to_string()),
                ("LOG_LEVEL".to_string(), "info".to_string()),
            ]),
        };

        let service = Service {
            environment: HashMap::from([("LOG_LEVEL".to_string(), "debug".to_string())]),
            ..Default::default()
        };

        let (config, _) =
            service_to_container_config("api", &service, "prod", &environment, "p", "p-prod");

        let env = config.env.unwrap();
        assert!(env.contains(&"DATABASE_URL=postgres://prod".to_string()));
        // service-level variable wins on collision
        assert!(env.contains(&"LOG_LEVEL=debug".to_string()));
        assert!(!env.contains(&"LOG_LEVEL=info".to_string()));
    }

    #[test]
    fn test_port_bindings() {
        let service = Service {
            ports: vec![
                Port {
                    host: 8080,
                    container: 3000,
                    protocol: Protocol::Tcp,
                    host_ip: None,
                },
                Port {
                    host: 5432,
                    container: 5432,
                    protocol: Protocol::Tcp,
                    host_ip: Some("127.0.0.1".to_string()),
                },
            ],
            ..Default::default()
        };

        let (config, _) =
            service_to_container_config("web", &service, "dev", &no_env(), "p", "p-dev");

        let exposed_ports = config.exposed_ports.unwrap();
        assert!(exposed_ports.contains_key("3000/tcp"));
        assert!(exposed_ports.contains_key("5432/tcp"));

        let host_config = config.host_config.unwrap();
        let port_bindings = host_config.port_bindings.unwrap();

        let binding_3000 = port_bindings.get("3000/tcp").unwrap().as_ref().unwrap();
        assert_eq!(binding_3000[0].host_port, Some("8080".to_string()));
        assert_eq!(binding_3000[0].host_ip, Some("0.0.0.0".to_string()));

        let binding_5432 = port_bindings.get("5432/tcp").unwrap().as_ref().unwrap();
        assert_eq!(binding_5432[0].host_ip, Some("127.0.0.1".to_string()));
    }

    #[test]
    fn test_udp_port() {
        let service = Service {
            ports: vec![Port {
                host: 53,
                container: 53,
                protocol: Protocol::Udp,
                host_ip: None,
            }],
            ..Default::default()
        };

        let (config, _) =
            service_to_container_config("dns", &service, "dev", &no_env(), "p", "p-dev");

        let exposed_ports = config.exposed_ports.unwrap();
        assert!(exposed_ports.contains_key("53/udp"));
    }

    #[test]
    fn test_volume_bindings() {
        let service = Service {
            volumes: vec![
                Volume {
                    host: PathBuf::from("/data"),
                    container: PathBuf::from("/var/lib/data"),
                    read_only: false,
                },
                Volume {
                    host: PathBuf::from("/config"),
                    container: PathBuf::from("/etc/config"),
                    read_only: true,
                },
            ],
            ..Default::default()
        };

        let (config, _) =
            service_to_container_config("db", &service, "dev", &no_env(), "p", "p-dev");

        let host_config = config.host_config.unwrap();
        let binds = host_config.binds.unwrap();

        assert_eq!(binds.len(), 2);
        assert!(binds[0].contains("/data:/var/lib/data:rw"));
        assert!(binds[1].contains("/config:/etc/config:ro"));
    }

    #[test]
    fn test_command_split() {
        let service = Service {
            command: Some("start --user root --pass root".to_string()),
            ..Default::default()
        };

        let (config, _) =
            service_to_container_config("db", &service, "dev", &no_env(), "p", "p-dev");

        let cmd = config.cmd.unwrap();
        assert_eq!(cmd, vec!["start", "--user", "root", "--pass", "root"]);
    }

    #[test]
    fn test_restart_policy_mapped() {
        let service = Service {
            restart: Some(RestartPolicy::UnlessStopped),
            ..Default::default()
        };

        let (config, _) =
            service_to_container_config("db", &service, "dev", &no_env(), "p", "p-dev");

        let host_config = config.host_config.unwrap();
        let policy = host_config.restart_policy.unwrap();
        assert_eq!(policy.name, Some(RestartPolicyNameEnum::UNLESS_STOPPED));
    }

    #[test]
    fn test_labels() {
        let service = Service::default();
        let (config, _) = service_to_container_config(
            "db",
            &service,
            "prod",
            &no_env(),
            "myproject",
            "myproject-prod",
        );

        let labels = config.labels.unwrap();
        assert_eq!(
            labels.get("com.docker.compose.project"),
            Some(&"myproject-prod".to_string())
        );
        assert_eq!(
            labels.get("com.docker.compose.service"),
            Some(&"db".to_string())
        );
        assert_eq!(labels.get("anubis.project"), Some(&"myproject".to_string()));
        assert_eq!(labels.get("anubis.environment"), Some(&"prod".to_string()));
        assert_eq!(labels.get("anubis.service"), Some(&"db".to_string()));
        assert_eq!(labels.len(), 5);
    }

    #[test]
    fn test_network_alias_is_service_name() {
        let service = Service::default();
        let (config, _) =
            service_to_container_config("api", &service, "dev", &no_env(), "p", "shared-net");

        let networking = config.networking_config.unwrap();
        let endpoint = networking.endpoints_config.get("shared-net").unwrap();
        assert_eq!(endpoint.aliases, Some(vec!["api".to_string()]));
    }
}
