mod commands;
mod docker;
mod utils;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "anubis")]
#[command(about = "Profile-scoped service orchestration for development environments", long_about = None)]
struct Cli {
    /// Path to the deployment file (default: discover deployment.yml)
    #[arg(long, global = true, env = "ANUBIS_DEPLOYMENT_FILE")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Orchestrate Docker services by profile
    #[command(subcommand)]
    Docker(DockerCommands),
    /// Verify the local environment
    #[command(subcommand)]
    Check(CheckCommands),
    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum DockerCommands {
    /// Start the services of the selected profiles
    Up {
        /// Comma-separated profile names (default: default_profiles)
        #[arg(short, long)]
        profiles: Option<String>,
        /// Environment name (dev, prod, ...)
        #[arg(short, long, env = "ANUBIS_ENV", default_value = "dev")]
        env: String,
        /// Pull the latest image before starting prebuilt services
        #[arg(long)]
        pull: bool,
    },
    /// Stop the services of the selected profiles (containers are kept)
    Down {
        /// Comma-separated profile names (default: default_profiles)
        #[arg(short, long)]
        profiles: Option<String>,
        /// Environment name (dev, prod, ...)
        #[arg(short, long, env = "ANUBIS_ENV", default_value = "dev")]
        env: String,
    },
    /// Build images for services that declare a build section
    Build {
        /// Comma-separated profile names (default: default_profiles)
        #[arg(short, long)]
        profiles: Option<String>,
        /// Environment name (dev, prod, ...)
        #[arg(short, long, env = "ANUBIS_ENV", default_value = "dev")]
        env: String,
        /// Build without the layer cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Stop and remove containers, their volumes, and the shared network
    Clean {
        /// Comma-separated profile names (default: default_profiles)
        #[arg(short, long)]
        profiles: Option<String>,
        /// Environment name (dev, prod, ...)
        #[arg(short, long, env = "ANUBIS_ENV", default_value = "dev")]
        env: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List project containers
    Ps {
        /// Include stopped containers
        #[arg(short, long)]
        all: bool,
    },
    /// Show container logs
    Logs {
        /// Comma-separated profile names (default: default_profiles)
        #[arg(short, long)]
        profiles: Option<String>,
        /// Environment name (dev, prod, ...)
        #[arg(short, long, env = "ANUBIS_ENV", default_value = "dev")]
        env: String,
        /// Only this service
        #[arg(short = 'n', long)]
        service: Option<String>,
        /// Number of log lines per service
        #[arg(short = 'l', long, default_value = "250")]
        lines: usize,
        /// Follow logs in real time
        #[arg(long)]
        follow: bool,
    },
}

#[derive(Subcommand)]
enum CheckCommands {
    /// Check that Docker and the deployment file are usable
    Environment,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    // Version needs no deployment file
    if matches!(cli.command, Commands::Version) {
        println!("anubis {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Environment checks run even with a broken or absent deployment file
    if let Commands::Check(CheckCommands::Environment) = &cli.command {
        return commands::check::handle(cli.file.as_deref()).await;
    }

    let deployment_file = match &cli.file {
        Some(path) => path.clone(),
        None => anubis_core::find_deployment_file()?,
    };
    let deployment = anubis_core::load_deployment(&deployment_file)?;
    tracing::debug!(file = %deployment_file.display(), "deployment loaded");
    let deployment_dir = deployment_file
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Commands::Docker(docker_cmd) => {
            let report = match docker_cmd {
                DockerCommands::Up { profiles, env, pull } => {
                    let profiles = utils::parse_profiles(profiles.as_deref());
                    commands::up::handle(&deployment, &deployment_dir, &profiles, &env, pull)
                        .await?
                }
                DockerCommands::Down { profiles, env } => {
                    let profiles = utils::parse_profiles(profiles.as_deref());
                    commands::down::handle(&deployment, &profiles, &env).await?
                }
                DockerCommands::Build {
                    profiles,
                    env,
                    no_cache,
                } => {
                    let profiles = utils::parse_profiles(profiles.as_deref());
                    commands::build::handle(&deployment, &deployment_dir, &profiles, &env, no_cache)
                        .await?
                }
                DockerCommands::Clean { profiles, env, yes } => {
                    let profiles = utils::parse_profiles(profiles.as_deref());
                    commands::clean::handle(&deployment, &profiles, &env, yes).await?
                }
                DockerCommands::Ps { all } => {
                    return commands::ps::handle(&deployment, all).await;
                }
                DockerCommands::Logs {
                    profiles,
                    env,
                    service,
                    lines,
                    follow,
                } => {
                    let profiles = utils::parse_profiles(profiles.as_deref());
                    return commands::logs::handle(
                        &deployment,
                        &profiles,
                        &env,
                        service,
                        lines,
                        follow,
                    )
                    .await;
                }
            };

            println!();
            if report.is_success() {
                println!("{}", format!("✓ {}", report.summary()).green().bold());
            } else {
                eprintln!("{}", format!("✗ {}", report.summary()).red().bold());
                for failed in &report.failed {
                    eprintln!(
                        "  {} {}: {}",
                        "✗".red(),
                        failed.service,
                        failed.error.as_deref().unwrap_or("unknown error")
                    );
                }
                std::process::exit(1);
            }
        }
        Commands::Check(_) => {
            unreachable!("Check is handled before config loading");
        }
        Commands::Version => {
            unreachable!("Version is handled before config loading");
        }
    }

    Ok(())
}
