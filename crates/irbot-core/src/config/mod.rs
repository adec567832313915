//! Configuration types for the IR Bot gateway.
//!
//! The whole configuration is loaded once at startup from a TOML or YAML
//! file (chosen by extension) and is read-only afterwards. Every section
//! has defaults, so an empty file yields the built-in demo setup.
//!
//! # Sections
//!
//! - **service**: service name and bind address
//! - **audit**: location of the JSON Lines audit log
//! - **executor**: script interpreter, scripts directory, concurrency bound
//! - **users**: user id -> role
//! - **actions**: command phrase -> script and minimum role

pub mod audit;
pub mod executor;
pub mod service;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::{ActionCatalog, ActionDefinition, Role};

pub use audit::AuditConfig;
pub use executor::ExecutorConfig;
pub use service::ServiceConfig;

/// Complete gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub executor: ExecutorConfig,

    /// Static user id -> role assignments. Unlisted users have no role.
    #[serde(default = "default_users")]
    pub users: BTreeMap<String, Role>,

    /// Known actions.
    #[serde(default = "default_actions")]
    pub actions: Vec<ActionDefinition>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            audit: AuditConfig::default(),
            executor: ExecutorConfig::default(),
            users: default_users(),
            actions: default_actions(),
        }
    }
}

fn default_users() -> BTreeMap<String, Role> {
    BTreeMap::from([
        ("alice".to_string(), Role::Viewer),
        ("bob".to_string(), Role::Analyst),
        ("charlie".to_string(), Role::Responder),
    ])
}

fn default_actions() -> Vec<ActionDefinition> {
    vec![
        ActionDefinition::new("collect logs", "Collect-Logs.ps1", Role::Analyst)
            .with_description("Collect event logs from the host"),
        ActionDefinition::new("quarantine host", "Quarantine-Host.ps1", Role::Responder)
            .with_description("Isolate the host from the network"),
        ActionDefinition::new("check status", "Check-Status.ps1", Role::Viewer)
            .with_description("Report the host's health status"),
        ActionDefinition::new("remediation report", "Remediation-Report.ps1", Role::Analyst)
            .with_description("Summarize remediation performed on the host"),
        ActionDefinition::internal("error", "Error-Handler.ps1"),
    ]
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("Configuration error: {0}")]
    Invalid(String),
}

impl GatewayConfig {
    /// Load and validate configuration from a file.
    ///
    /// `.yaml` / `.yml` files are parsed as YAML, everything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false);

        let config = if is_yaml {
            Self::from_yaml(&content)?
        } else {
            Self::from_toml(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML content (not validated).
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Parse configuration from YAML content (not validated).
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Check the invariants the gateway relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for action in &self.actions {
            let name = action.name.trim().to_lowercase();
            if name.is_empty() {
                return Err(ConfigError::Invalid("action name must not be empty".into()));
            }
            if !seen.insert(name.clone()) {
                return Err(ConfigError::Invalid(format!("duplicate action '{}'", name)));
            }
            if action.script.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "action '{}' has no script",
                    name
                )));
            }
            // Every commandable action needs a role gate; the parser would
            // otherwise produce commands nobody can be authorized for.
            if !action.internal && action.min_role.is_none() {
                return Err(ConfigError::Invalid(format!(
                    "action '{}' must declare min_role",
                    name
                )));
            }
        }

        if self.users.keys().any(|id| id.trim().is_empty()) {
            return Err(ConfigError::Invalid("user ids must not be empty".into()));
        }

        if self.executor.max_concurrent_scripts == 0 {
            return Err(ConfigError::Invalid(
                "executor.max_concurrent_scripts must be at least 1".into(),
            ));
        }
        if self.audit.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "audit.queue_capacity must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Build the action lookup table.
    pub fn catalog(&self) -> ActionCatalog {
        ActionCatalog::new(self.actions.iter().cloned())
    }
}
