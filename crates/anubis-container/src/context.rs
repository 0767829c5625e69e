use crate::error::{ContainerError, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tar::Builder;

pub struct ContextBuilder;

impl ContextBuilder {
    /// Create the build context as a tar.gz archive.
    ///
    /// The Dockerfile is appended under the fixed name "Dockerfile" so
    /// it can live outside the context directory.
    pub fn create_context(context_path: &Path, dockerfile_path: &Path) -> Result<Vec<u8>> {
        tracing::debug!("Creating build context from: {}", context_path.display());

        if !context_path.is_dir() {
            return Err(ContainerError::InvalidBuildContext(format!(
                "context directory does not exist: {}",
                context_path.display()
            )));
        }

        let mut archive_data = Vec::new();
        {
            let encoder = GzEncoder::new(&mut archive_data, Compression::default());
            let mut tar = Builder::new(encoder);

            tar.append_dir_all(".", context_path)
                .map_err(ContainerError::Io)?;

            let mut dockerfile_file = File::open(dockerfile_path).map_err(|_| {
                ContainerError::InvalidBuildContext(format!(
                    "Dockerfile not found: {}",
                    dockerfile_path.display()
                ))
            })?;
            let mut dockerfile_content = Vec::new();
            dockerfile_file.read_to_end(&mut dockerfile_content)?;

            let mut header = tar::Header::new_gnu();
            header.set_path("Dockerfile").map_err(|e| {
                ContainerError::InvalidBuildContext(format!("failed to set Dockerfile path: {}", e))
            })?;
            header.set_size(dockerfile_content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();

            tar.append(&header, &dockerfile_content[..])
                .map_err(ContainerError::Io)?;

            tar.finish().map_err(ContainerError::Io)?;
        }

        tracing::debug!("Build context created: {} bytes", archive_data.len());

        Self::check_context_size(archive_data.len());

        Ok(archive_data)
    }

    fn check_context_size(size: usize) {
        const MAX_CONTEXT_SIZE: usize = 500 * 1024 * 1024; // 500MB

        if size > MAX_CONTEXT_SIZE {
            tracing::warn!(
                "build context is very large ({}MB); consider a .dockerignore",
                size / 1024 / 1024
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_create_context() {
        let temp_dir = tempdir().unwrap();

        fs::write(temp_dir.path().join("file1.txt"), "content1").unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        fs::write(subdir.join("file2.txt"), "content2").unwrap();

        let dockerfile = temp_dir.path().join("Dockerfile");
        fs::write(&dockerfile, "FROM alpine\nRUN echo test").unwrap();

        let archive = ContextBuilder::create_context(temp_dir.path(), &dockerfile).unwrap();
        assert!(!archive.is_empty());

        // Round-trip: the archive must contain the Dockerfile entry.
        let mut archive_reader = std::io::Cursor::new(archive);
        let decoder = flate2::read::GzDecoder::new(&mut archive_reader);
        let mut tar = tar::Archive::new(decoder);
        let names: Vec<String> = tar
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().display().to_string())
            .collect();
        assert!(names.iter().any(|n| n == "Dockerfile"));
        assert!(names.iter().any(|n| n.contains("file1.txt")));
    }

    #[test]
    fn test_missing_context_directory() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("nope");
        let dockerfile = temp_dir.path().join("Dockerfile");

        let result = ContextBuilder::create_context(&missing, &dockerfile);
        assert!(matches!(
            result,
            Err(ContainerError::InvalidBuildContext(_))
        ));
    }

    #[test]
    fn test_missing_dockerfile() {
        let temp_dir = tempdir().unwrap();
        let dockerfile = temp_dir.path().join("Dockerfile");

        let result = ContextBuilder::create_context(temp_dir.path(), &dockerfile);
        assert!(matches!(
            result,
            Err(ContainerError::InvalidBuildContext(_))
        ));
    }
}
