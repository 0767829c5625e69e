use crate::docker;
use crate::utils;
use anubis_container::{ActionReport, ServiceAction, container_name};
use anubis_core::Deployment;
use colored::Colorize;

pub async fn handle(
    deployment: &Deployment,
    profiles: &[String],
    env_name: &str,
    yes: bool,
) -> anyhow::Result<ActionReport> {
    let _ = deployment.environment(env_name)?;
    let services = anubis_core::resolve_services(deployment, profiles)?;

    println!("environment: {}", env_name.cyan());
    println!();
    utils::print_services(&services);
    println!();

    let mut report = ActionReport::new(ServiceAction::Clean);

    if !utils::confirm_action(
        "This stops and removes the containers, their anonymous volumes, and the shared network. Continue?",
        yes,
    ) {
        println!("{}", "clean aborted".yellow());
        return Ok(report);
    }

    println!();
    println!("{}", "connecting to Docker...".blue());
    let docker_conn = docker::connect().await?;

    // Remove in reverse dependency order
    for service_name in services.iter().rev() {
        println!();
        println!(
            "{}",
            format!("■ removing {}...", service_name).yellow().bold()
        );

        let container = container_name(&deployment.name, env_name, service_name);

        match clean_container(&docker_conn, &container).await {
            Ok(message) => {
                report.add_success(service_name, &message);
            }
            Err(e) => {
                eprintln!("  {} {}", "✗".red(), e);
                report.add_failure(service_name, e.to_string());
            }
        }
    }

    // Shared network goes last, once nothing is attached to it
    let network_name = deployment.network_name(env_name);
    println!();
    println!(
        "{}",
        format!("removing network: {}", network_name).yellow()
    );

    match docker_conn.remove_network(&network_name).await {
        Ok(_) => {
            println!("  ✓ network removed");
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            println!("  ℹ network does not exist");
        }
        Err(e) => {
            // Other environments' containers may still be attached
            eprintln!("  {} network remove error: {}", "✗".red(), e);
            report.add_failure("network", e.to_string());
        }
    }

    Ok(report)
}

/// Stop (if needed) and remove one container together with its
/// anonymous volumes.
async fn clean_container(
    docker_conn: &bollard::Docker,
    container: &str,
) -> anyhow::Result<String> {
    match docker_conn
        .stop_container(
            container,
            None::<bollard::query_parameters::StopContainerOptions>,
        )
        .await
    {
        Ok(_) => println!("  ✓ stopped"),
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 304, ..
        }) => println!("  ℹ already stopped"),
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            println!("  ℹ no container to remove");
            return Ok("no container".to_string());
        }
        Err(e) => return Err(anyhow::anyhow!("failed to stop container: {}", e)),
    }

    #[allow(deprecated)]
    let remove_options = bollard::container::RemoveContainerOptions {
        v: true, // also drop anonymous volumes created for this container
        ..Default::default()
    };

    #[allow(deprecated)]
    match docker_conn
        .remove_container(container, Some(remove_options))
        .await
    {
        Ok(_) => {
            println!("  ✓ removed");
            Ok("removed".to_string())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            println!("  ℹ container already gone");
            Ok("no container".to_string())
        }
        Err(e) => Err(anyhow::anyhow!("failed to remove container: {}", e)),
    }
}
