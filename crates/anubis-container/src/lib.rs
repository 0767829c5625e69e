pub mod build;
pub mod context;
pub mod converter;
pub mod error;
pub mod report;

pub use build::ImageBuilder;
pub use context::ContextBuilder;
pub use converter::{container_name, resolve_image, service_to_container_config};
pub use error::{ContainerError, Result};
pub use report::{ActionReport, ActionResult, ServiceAction};
