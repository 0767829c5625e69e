use crate::docker;
use crate::utils;
use anubis_container::{ActionReport, ServiceAction, container_name};
use anubis_core::Deployment;
use colored::Colorize;

pub async fn handle(
    deployment: &Deployment,
    profiles: &[String],
    env_name: &str,
) -> anyhow::Result<ActionReport> {
    println!("{}", "stopping services...".yellow());

    let _ = deployment.environment(env_name)?;
    let services = anubis_core::resolve_services(deployment, profiles)?;

    println!("environment: {}", env_name.cyan());
    println!();
    utils::print_services(&services);

    println!();
    println!("{}", "connecting to Docker...".blue());
    let docker_conn = docker::connect().await?;

    let mut report = ActionReport::new(ServiceAction::Down);

    // Stop in reverse dependency order
    for service_name in services.iter().rev() {
        println!();
        println!(
            "{}",
            format!("■ stopping {}...", service_name).yellow().bold()
        );

        let container = container_name(&deployment.name, env_name, service_name);

        match docker_conn
            .stop_container(
                &container,
                None::<bollard::query_parameters::StopContainerOptions>,
            )
            .await
        {
            Ok(_) => {
                println!("  ✓ stopped");
                report.add_success(service_name, "stopped");
            }
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 304, ..
            }) => {
                println!("  ℹ container already stopped");
                report.add_success(service_name, "already stopped");
            }
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => {
                println!("  ℹ no container to stop");
                report.add_success(service_name, "no container");
            }
            Err(e) => {
                eprintln!("  {} stop error: {}", "✗".red(), e);
                report.add_failure(service_name, e.to_string());
            }
        }
    }

    // Containers, volumes, and the shared network are preserved;
    // `clean` is the destructive path.
    println!();
    println!(
        "{}",
        format!(
            "  network '{}' preserved; use `anubis docker clean` to remove it",
            deployment.network_name(env_name)
        )
        .dimmed()
    );

    Ok(report)
}
