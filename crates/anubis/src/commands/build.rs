use crate::docker;
use crate::utils;
use anubis_container::{ActionReport, ContextBuilder, ImageBuilder, ServiceAction};
use anubis_core::{Deployment, Service};
use colored::Colorize;
use std::path::{Path, PathBuf};

pub async fn handle(
    deployment: &Deployment,
    deployment_dir: &Path,
    profiles: &[String],
    env_name: &str,
    no_cache: bool,
) -> anyhow::Result<ActionReport> {
    let _ = deployment.environment(env_name)?;
    let services = anubis_core::resolve_services(deployment, profiles)?;

    println!("environment: {}", env_name.cyan());
    println!();
    utils::print_services(&services);

    println!();
    println!("{}", "connecting to Docker...".blue());
    let docker_conn = docker::connect().await?;

    let mut report = ActionReport::new(ServiceAction::Build);

    for service_name in &services {
        let service = deployment.service(service_name)?;

        println!();
        if service.build.is_none() {
            // Prebuilt image, nothing to do
            println!(
                "{}",
                format!("ℹ {} uses a prebuilt image, skipping", service_name).dimmed()
            );
            continue;
        }

        println!(
            "{}",
            format!("🔨 building {}...", service_name).green().bold()
        );

        match build_service(
            &docker_conn,
            deployment,
            deployment_dir,
            service_name,
            service,
            no_cache,
        )
        .await
        {
            Ok(tag) => {
                report.add_success(service_name, format!("built {}", tag));
            }
            Err(e) => {
                eprintln!("  {} {}", "✗".red(), e);
                report.add_failure(service_name, e.to_string());
            }
        }
    }

    Ok(report)
}

/// Build one service's image from its build section. Shared with `up`,
/// which builds locally before starting buildable services.
pub(crate) async fn build_service(
    docker_conn: &bollard::Docker,
    deployment: &Deployment,
    deployment_dir: &Path,
    service_name: &str,
    service: &Service,
    no_cache: bool,
) -> anyhow::Result<String> {
    let build = service
        .build
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("service '{}' has no build section", service_name))?;

    let context_path = deployment_dir.join(
        build
            .context
            .clone()
            .unwrap_or_else(|| PathBuf::from(".")),
    );
    let dockerfile_path = context_path.join(
        build
            .dockerfile
            .clone()
            .unwrap_or_else(|| PathBuf::from("Dockerfile")),
    );

    let tag = anubis_container::resolve_image(&deployment.name, service_name, service);

    println!("  → context: {}", context_path.display().to_string().cyan());
    println!(
        "  → dockerfile: {}",
        dockerfile_path.display().to_string().cyan()
    );
    println!("  → image: {}", tag.cyan());

    let context_data = ContextBuilder::create_context(&context_path, &dockerfile_path)?;

    let builder = ImageBuilder::new(docker_conn.clone());
    builder
        .build_image(
            context_data,
            &tag,
            build.args.clone(),
            build.target.as_deref(),
            no_cache,
        )
        .await?;

    println!("  {} build complete", "✓".green());
    Ok(tag)
}
