//! CLI command implementations for the `irbot` binary.

pub mod check;
pub mod serve;

use anyhow::{Context, Result};
use irbot_core::GatewayConfig;
use std::path::Path;

/// Load the configuration file, or the built-in defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig> {
    match path {
        Some(path) => GatewayConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            tracing::info!("no config file given, using built-in defaults");
            let config = GatewayConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}
