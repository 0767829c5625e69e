//! Environment definition

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Environment definition
///
/// Exactly one environment is active per invocation. Its variables are
/// injected into every container started under it; service-level
/// variables win on key collision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Environment {
    /// Variables injected into each started container
    #[serde(default)]
    pub variables: HashMap<String, String>,
}
