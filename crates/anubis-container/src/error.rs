use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error(
        "cannot connect to Docker: {0}\n\nhints:\n  • check that the Docker daemon is running\n  • check that `docker ps` works from this shell"
    )]
    ConnectionFailed(String),

    #[error("container '{container}' not found")]
    ContainerNotFound { container: String },

    #[error(
        "image '{image}' not found\nhint: check the image name and tag, or `docker pull {image}`"
    )]
    ImageNotFound { image: String },

    #[error("Docker API error: {0}")]
    ApiError(String),

    #[error("image build failed: {0}")]
    BuildFailed(String),

    #[error("invalid build context: {0}")]
    InvalidBuildContext(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bollard::errors::Error> for ContainerError {
    fn from(err: bollard::errors::Error) -> Self {
        let err_str = err.to_string();
        // A refused socket means the daemon itself is unreachable, which
        // is fatal for the whole invocation rather than one service.
        if err_str.contains("Connection refused") || err_str.contains("No such file or directory") {
            ContainerError::ConnectionFailed(err_str)
        } else {
            ContainerError::ApiError(err_str)
        }
    }
}

pub type Result<T> = std::result::Result<T, ContainerError>;
