use crate::commands::build::build_service;
use crate::docker;
use crate::utils;
use anubis_container::{ActionReport, ServiceAction};
use anubis_core::{Deployment, Environment, Service};
use colored::Colorize;
use std::path::Path;

pub async fn handle(
    deployment: &Deployment,
    deployment_dir: &Path,
    profiles: &[String],
    env_name: &str,
    pull: bool,
) -> anyhow::Result<ActionReport> {
    // Environment and profile resolution both run before any Docker
    // call: a configuration error must perform zero actions.
    let environment = deployment.environment(env_name)?;
    let services = anubis_core::resolve_services(deployment, profiles)?;

    println!("environment: {}", env_name.cyan());
    println!();
    utils::print_services(&services);

    println!();
    println!("{}", "connecting to Docker...".blue());
    let docker_conn = docker::connect().await?;

    // Shared network, create-if-absent
    let network_name = deployment.network_name(env_name);
    println!();
    println!("{}", format!("network: {}", network_name).blue());

    let network_config = bollard::models::NetworkCreateRequest {
        name: network_name.clone(),
        driver: Some("bridge".to_string()),
        ..Default::default()
    };

    match docker_conn.create_network(network_config).await {
        Ok(_) => {
            println!("  ✓ network created");
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 409, ..
        }) => {
            println!("  ℹ network already exists");
        }
        Err(e) => {
            eprintln!("  ⚠ network create error: {}", e);
        }
    }

    let mut report = ActionReport::new(ServiceAction::Up);

    for service_name in &services {
        let service = deployment.service(service_name)?;

        println!();
        println!(
            "{}",
            format!("▶ starting {}...", service_name).green().bold()
        );

        match up_service(
            &docker_conn,
            deployment,
            deployment_dir,
            service_name,
            service,
            env_name,
            &environment,
            &network_name,
            pull,
        )
        .await
        {
            Ok(message) => {
                report.add_success(service_name, &message);
            }
            Err(e) => {
                eprintln!("  {} {}", "✗".red(), e);
                report.add_failure(service_name, e.to_string());
            }
        }
    }

    Ok(report)
}

/// Start one service, creating (and if needed building or pulling) its
/// container. Errors bubble to the caller, which records them and moves
/// on to the next service.
#[allow(clippy::too_many_arguments)]
async fn up_service(
    docker_conn: &bollard::Docker,
    deployment: &Deployment,
    deployment_dir: &Path,
    service_name: &str,
    service: &Service,
    env_name: &str,
    environment: &Environment,
    network_name: &str,
    pull: bool,
) -> anyhow::Result<String> {
    let (container_config, create_options) = anubis_container::service_to_container_config(
        service_name,
        service,
        env_name,
        environment,
        deployment.name.as_str(),
        network_name,
    );

    #[allow(deprecated)]
    let image = container_config
        .image
        .clone()
        .ok_or_else(|| anyhow::anyhow!("no image resolved for service '{}'", service_name))?;

    // Local build takes precedence over a registry image
    if service.build.is_some() {
        build_service(docker_conn, deployment, deployment_dir, service_name, service, false)
            .await?;
    } else if pull {
        docker::pull_image(docker_conn, &image).await?;
    }

    match docker_conn
        .create_container(Some(create_options.clone()), container_config.clone())
        .await
    {
        Ok(response) => {
            println!("  ✓ container created: {}", response.id);

            docker_conn
                .start_container(
                    &response.id,
                    None::<bollard::query_parameters::StartContainerOptions>,
                )
                .await
                .map_err(|e| anyhow::anyhow!("failed to start container: {}", e))?;
            println!("  ✓ started");
            Ok("created and started".to_string())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 409, ..
        }) => {
            // Container already exists: start it, restarting if running
            println!("  ℹ container already exists");
            #[allow(deprecated)]
            let container_name = &create_options.name;

            match docker_conn
                .start_container(
                    container_name,
                    None::<bollard::query_parameters::StartContainerOptions>,
                )
                .await
            {
                Ok(_) => {
                    println!("  ✓ existing container started");
                    Ok("existing container started".to_string())
                }
                Err(bollard::errors::Error::DockerResponseServerError {
                    status_code: 304, ..
                }) => {
                    println!("  ℹ container already running, restarting...");
                    docker_conn
                        .restart_container(
                            container_name,
                            None::<bollard::query_parameters::RestartContainerOptions>,
                        )
                        .await
                        .map_err(|e| anyhow::anyhow!("failed to restart container: {}", e))?;
                    println!("  ✓ restarted");
                    Ok("restarted".to_string())
                }
                Err(e) => Err(anyhow::anyhow!("failed to start container: {}", e)),
            }
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            // Image missing: build or pull, then retry once
            println!("  ℹ image not found: {}", image.cyan());
            if service.build.is_some() {
                build_service(docker_conn, deployment, deployment_dir, service_name, service, false)
                    .await?;
            } else {
                docker::pull_image(docker_conn, &image).await?;
            }

            let response = docker_conn
                .create_container(Some(create_options.clone()), container_config.clone())
                .await
                .map_err(|e| anyhow::anyhow!("failed to create container: {}", e))?;

            println!("  ✓ container created: {}", response.id);

            docker_conn
                .start_container(
                    &response.id,
                    None::<bollard::query_parameters::StartContainerOptions>,
                )
                .await
                .map_err(|e| anyhow::anyhow!("failed to start container: {}", e))?;
            println!("  ✓ started");
            Ok("created and started".to_string())
        }
        Err(e) => {
            let err_str = e.to_string();
            if err_str.contains("port is already allocated") {
                Err(anyhow::anyhow!(
                    "port already allocated: {}\nhint: `anubis docker down` the conflicting environment or change the host port",
                    err_str
                ))
            } else {
                Err(anyhow::anyhow!("failed to create container: {}", err_str))
            }
        }
    }
}
