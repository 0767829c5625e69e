//! Data model for the deployment file.
//!
//! One module per concept, re-exported flat so callers can write
//! `anubis_core::Service` instead of digging through submodules.

mod deployment;
mod environment;
mod port;
mod service;
mod volume;

// Re-exports
pub use deployment::*;
pub use environment::*;
pub use port::*;
pub use service::*;
pub use volume::*;
