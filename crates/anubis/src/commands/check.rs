use colored::Colorize;
use std::path::Path;

/// Verify the local environment: deployment file discoverable, Docker
/// daemon reachable. A missing deployment file is a warning (the tool
/// may be run from anywhere); an unreachable daemon fails the check.
pub async fn handle(file: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", "checking local environment...".blue());
    println!();

    // Deployment file
    match file {
        Some(path) => {
            if path.exists() {
                println!("  ✓ deployment file: {}", path.display().to_string().cyan());
            } else {
                println!(
                    "  {} deployment file not found: {}",
                    "⚠".yellow(),
                    path.display()
                );
            }
        }
        None => match anubis_core::find_deployment_file() {
            Ok(path) => {
                println!("  ✓ deployment file: {}", path.display().to_string().cyan());
            }
            Err(_) => {
                println!(
                    "  {} no deployment.yml found from the current directory",
                    "⚠".yellow()
                );
            }
        },
    }

    // Docker daemon
    let docker_conn = crate::docker::connect().await?;
    let version = docker_conn.version().await?;
    println!(
        "  ✓ Docker daemon reachable (engine {})",
        version.version.as_deref().unwrap_or("unknown").cyan()
    );

    println!();
    println!("{}", "✓ environment looks good".green().bold());

    Ok(())
}
