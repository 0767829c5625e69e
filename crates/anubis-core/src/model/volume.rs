//! Volume definition

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Volume definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    pub host: PathBuf,
    pub container: PathBuf,
    #[serde(default)]
    pub read_only: bool,
}
