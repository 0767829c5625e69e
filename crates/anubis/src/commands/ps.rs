use crate::docker;
use anubis_core::Deployment;
use colored::Colorize;

pub async fn handle(deployment: &Deployment, all: bool) -> anyhow::Result<()> {
    println!("{}", "listing containers...".blue());

    let docker_conn = docker::connect().await?;

    // Every container this tool creates carries the project label
    let mut filters = std::collections::HashMap::new();
    filters.insert(
        "label".to_string(),
        vec![format!("anubis.project={}", deployment.name)],
    );

    #[allow(deprecated)]
    let options = bollard::container::ListContainersOptions {
        all,
        filters,
        ..Default::default()
    };

    #[allow(deprecated)]
    let containers = docker_conn.list_containers(Some(options)).await?;

    println!();
    if containers.is_empty() {
        println!("{}", "no running containers".dimmed());
    } else {
        println!(
            "{}",
            format!(
                "{:<30} {:<20} {:<25} {:<30}",
                "NAME", "STATUS", "IMAGE", "PORTS"
            )
            .bold()
        );
        println!("{}", "─".repeat(105).dimmed());

        for container in containers {
            let name = container
                .names
                .as_ref()
                .and_then(|n| n.first())
                .map(|n| n.trim_start_matches('/'))
                .unwrap_or("N/A");

            let status = container.status.as_deref().unwrap_or("N/A");
            let status_colored = if status.contains("Up") {
                status.green()
            } else {
                status.red()
            };

            let image = container.image.as_deref().unwrap_or("N/A");

            let ports = container
                .ports
                .as_ref()
                .map(|ports| {
                    ports
                        .iter()
                        .filter_map(|p| {
                            p.public_port
                                .map(|pub_port| format!("{}:{}", pub_port, p.private_port))
                        })
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();

            println!(
                "{:<30} {:<20} {:<25} {:<30}",
                name.cyan(),
                status_colored,
                image,
                ports.dimmed()
            );
        }
    }

    Ok(())
}
