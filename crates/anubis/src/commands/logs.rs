use crate::docker;
use anubis_container::container_name;
use anubis_core::Deployment;
use colored::Colorize;

pub async fn handle(
    deployment: &Deployment,
    profiles: &[String],
    env_name: &str,
    service: Option<String>,
    lines: usize,
    follow: bool,
) -> anyhow::Result<()> {
    println!("{}", "fetching logs...".blue());

    let _ = deployment.environment(env_name)?;

    // One explicit service, or the resolved profile set
    let target_services = match service {
        Some(service_name) => {
            deployment.service(&service_name)?;
            vec![service_name]
        }
        None => anubis_core::resolve_services(deployment, profiles)?,
    };

    println!("environment: {}", env_name.cyan());
    println!();

    let docker_conn = docker::connect().await?;

    let colors = [
        colored::Color::Cyan,
        colored::Color::Green,
        colored::Color::Yellow,
        colored::Color::Magenta,
        colored::Color::Blue,
    ];

    for (idx, service_name) in target_services.iter().enumerate() {
        let container = container_name(&deployment.name, env_name, service_name);
        let service_color = colors[idx % colors.len()];

        if !follow {
            println!(
                "{}",
                format!("=== {} ===", service_name).bold().color(service_color)
            );
        }

        #[allow(deprecated)]
        let options = bollard::container::LogsOptions::<String> {
            follow,
            stdout: true,
            stderr: true,
            tail: lines.to_string(),
            timestamps: true,
            ..Default::default()
        };

        use bollard::container::LogOutput;
        use futures_util::stream::StreamExt;

        let mut log_stream = docker_conn.logs(&container, Some(options));

        while let Some(log) = log_stream.next().await {
            match log {
                Ok(output) => {
                    let prefix = format!("[{}]", service_name).color(service_color);

                    match output {
                        LogOutput::StdOut { message } | LogOutput::Console { message } => {
                            let msg = String::from_utf8_lossy(&message);
                            for line in msg.lines() {
                                if !line.is_empty() {
                                    println!("{} {}", prefix, line);
                                }
                            }
                        }
                        LogOutput::StdErr { message } => {
                            let msg = String::from_utf8_lossy(&message);
                            for line in msg.lines() {
                                if !line.is_empty() {
                                    println!("{} {} {}", prefix, "stderr:".red(), line);
                                }
                            }
                        }
                        LogOutput::StdIn { .. } => {}
                    }
                }
                Err(e) => {
                    eprintln!("  ⚠ log fetch error ({}): {}", service_name, e);
                    break;
                }
            }
        }

        if !follow {
            println!();
        }
    }

    if follow {
        println!();
        println!("{}", "Ctrl+C to stop following".dimmed());
    }

    Ok(())
}
