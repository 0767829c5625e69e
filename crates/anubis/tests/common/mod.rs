use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write_deployment(&self, content: &str) {
        let path = self.root.path().join("deployment.yml");
        fs::write(path, content).unwrap();
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    #[allow(dead_code)]
    pub async fn docker_container_exists(&self, name: &str) -> bool {
        let docker = bollard::Docker::connect_with_local_defaults().unwrap();
        docker
            .inspect_container(
                name,
                None::<bollard::query_parameters::InspectContainerOptions>,
            )
            .await
            .is_ok()
    }

    #[allow(dead_code)]
    pub async fn docker_network_exists(&self, name: &str) -> bool {
        let docker = bollard::Docker::connect_with_local_defaults().unwrap();
        docker
            .inspect_network(
                name,
                None::<bollard::query_parameters::InspectNetworkOptions>,
            )
            .await
            .is_ok()
    }
}
