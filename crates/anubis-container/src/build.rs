use crate::error::{ContainerError, Result};
use bollard::Docker;
use bollard::image::BuildImageOptions;
use colored::Colorize;
use futures_util::stream::StreamExt;
use std::collections::HashMap;

pub struct ImageBuilder {
    docker: Docker,
}

impl ImageBuilder {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// Build an image from an in-memory tar.gz context.
    pub async fn build_image(
        &self,
        context_data: Vec<u8>,
        tag: &str,
        build_args: HashMap<String, String>,
        target: Option<&str>,
        no_cache: bool,
    ) -> Result<()> {
        tracing::info!("Building image: {}", tag);

        let build_args_refs: HashMap<&str, &str> = build_args
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let options = BuildImageOptions {
            dockerfile: "Dockerfile",
            t: tag,
            buildargs: build_args_refs,
            target: target.unwrap_or(""),
            nocache: no_cache,
            rm: true,
            forcerm: true,
            pull: true,
            ..Default::default()
        };

        tracing::debug!("Build options: {:?}", options);

        use bytes::Bytes;
        use http_body_util::{Either, Full};
        let context_bytes = Bytes::from(context_data);
        let body = Full::new(context_bytes);
        let mut stream = self
            .docker
            .build_image(options, None, Some(Either::Left(body)));

        while let Some(msg) = stream.next().await {
            match msg {
                Ok(output) => {
                    self.handle_build_output(output)?;
                }
                Err(e) => {
                    return Err(e.into());
                }
            }
        }

        tracing::info!("Successfully built: {}", tag);
        Ok(())
    }

    fn handle_build_output(&self, output: bollard::models::BuildInfo) -> Result<()> {
        if let Some(stream) = output.stream {
            print!("{}", stream);
        }

        if let Some(error) = output.error {
            return Err(ContainerError::BuildFailed(error));
        }

        if let Some(error_detail) = output.error_detail {
            let error_msg = error_detail
                .message
                .unwrap_or_else(|| "unknown build error".to_string());
            return Err(ContainerError::BuildFailed(error_msg));
        }

        if let Some(status) = output.status {
            println!("{}", status.cyan());
        }

        Ok(())
    }

    /// Check whether an image exists locally.
    pub async fn image_exists(&self, image_tag: &str) -> Result<bool> {
        match self.docker.inspect_image(image_tag).await {
            Ok(_) => Ok(true),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextBuilder;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    #[ignore] // needs a running Docker daemon
    async fn test_build_simple_image() {
        let docker = Docker::connect_with_local_defaults().unwrap();
        let builder = ImageBuilder::new(docker);

        let temp_dir = tempdir().unwrap();
        let dockerfile = temp_dir.path().join("Dockerfile");
        fs::write(&dockerfile, "FROM alpine:latest\nCMD echo 'test'").unwrap();

        let context_data = ContextBuilder::create_context(temp_dir.path(), &dockerfile).unwrap();

        let result = builder
            .build_image(
                context_data,
                "anubis-build-test:latest",
                HashMap::new(),
                None,
                false,
            )
            .await;
        assert!(result.is_ok());
    }
}
