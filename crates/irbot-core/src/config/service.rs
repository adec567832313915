use serde::{Deserialize, Serialize};

/// HTTP service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Name reported by the liveness check.
    #[serde(default = "default_name")]
    pub name: String,

    /// Bind address, e.g. "0.0.0.0:3000"
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            bind: default_bind(),
        }
    }
}

fn default_name() -> String {
    "ir-bot".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}
