//! Core functionality for Anubis
//!
//! Deployment file model, loading/validation, and profile resolution.
//! Everything the container layer and the CLI consume lives behind the
//! flat re-exports below.

pub mod error;
pub mod loader;
pub mod model;
pub mod resolve;

pub use error::{ConfigError, Result};
pub use loader::{find_deployment_file, find_deployment_file_from, load, load_deployment};
pub use model::*;
pub use resolve::resolve_services;
