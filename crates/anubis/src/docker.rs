use colored::Colorize;
use futures_util::stream::StreamExt;

/// Read registry credentials from the Docker config.json, if present.
pub fn get_docker_credentials(registry: &str) -> Option<bollard::auth::DockerCredentials> {
    let home = std::env::var("HOME").ok()?;
    let config_path = format!("{}/.docker/config.json", home);
    let config_content = std::fs::read_to_string(&config_path).ok()?;
    let config: serde_json::Value = serde_json::from_str(&config_content).ok()?;

    let auths = config.get("auths")?.as_object()?;
    let auth_entry = auths.get(registry)?;
    let auth_b64 = auth_entry.get("auth")?.as_str()?;

    // base64 "username:password"
    use base64::Engine;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(auth_b64)
        .ok()?;
    let auth_str = String::from_utf8(decoded).ok()?;
    let (username, password) = auth_str.split_once(':')?;

    Some(bollard::auth::DockerCredentials {
        username: Some(username.to_string()),
        password: Some(password.to_string()),
        serveraddress: Some(registry.to_string()),
        ..Default::default()
    })
}

/// Extract the registry host from an image reference.
///
/// The first path segment is a registry only when it contains a dot or
/// a port (ghcr.io, localhost:5000); "library/nginx" is not.
pub fn extract_registry(image: &str) -> Option<&str> {
    if image.contains('/') {
        let first = image.split('/').next()?;
        if first.contains('.') || first.contains(':') {
            return Some(first);
        }
    }
    None
}

/// Split an image reference into name and tag, defaulting to "latest".
pub fn parse_image_tag(image: &str) -> (&str, &str) {
    if let Some((name, tag)) = image.split_once(':') {
        (name, tag)
    } else {
        (image, "latest")
    }
}

/// Pull an image, streaming progress to the terminal.
pub async fn pull_image(docker: &bollard::Docker, image: &str) -> anyhow::Result<()> {
    let (image_name, tag) = parse_image_tag(image);

    println!("  ↓ pulling image: {}", image.cyan());

    let credentials = extract_registry(image).and_then(get_docker_credentials);

    #[allow(deprecated)]
    let options = bollard::image::CreateImageOptions {
        from_image: image_name,
        tag,
        ..Default::default()
    };

    #[allow(deprecated)]
    let mut stream = docker.create_image(Some(options), None, credentials);

    while let Some(info) = stream.next().await {
        match info {
            Ok(bollard::models::CreateImageInfo {
                status: Some(status),
                progress: Some(progress),
                ..
            }) => {
                print!("\r  ↓ {}: {}", status, progress);
                use std::io::Write;
                std::io::stdout().flush()?;
            }
            Ok(bollard::models::CreateImageInfo {
                status: Some(status),
                ..
            }) => {
                print!("\r  ↓ {}                    ", status);
                use std::io::Write;
                std::io::stdout().flush()?;
            }
            Err(e) => {
                println!();
                return Err(anyhow::anyhow!("failed to pull image '{}': {}", image, e));
            }
            _ => {}
        }
    }

    println!();
    println!("  ✓ pull complete");

    Ok(())
}

/// Connect to the Docker daemon, with actionable diagnostics on failure.
///
/// An unreachable daemon is fatal for the whole invocation, so this
/// runs before any per-service work.
pub async fn connect() -> anyhow::Result<bollard::Docker> {
    let failed = |e: &dyn std::fmt::Display| {
        eprintln!();
        eprintln!("{}", "✗ cannot connect to Docker".red().bold());
        eprintln!();
        eprintln!("{}", "cause:".yellow());
        eprintln!("  {}", e);
        eprintln!();
        eprintln!("{}", "hints:".yellow());
        eprintln!("  • check that the Docker daemon is running");
        eprintln!("  • check that your user can reach the Docker socket");
        eprintln!("  • check that `docker ps` works from this shell");
        anyhow::anyhow!("Docker connection failed")
    };

    match bollard::Docker::connect_with_local_defaults() {
        Ok(docker) => match docker.ping().await {
            Ok(_) => Ok(docker),
            Err(e) => Err(failed(&e)),
        },
        Err(e) => Err(failed(&e)),
    }
}
