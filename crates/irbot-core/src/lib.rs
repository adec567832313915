use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// Configuration types shared across all IR Bot crates
pub mod config;

pub use config::{AuditConfig, ConfigError, ExecutorConfig, GatewayConfig, ServiceConfig};

/// Capability level gating which actions an identity may invoke.
///
/// Variants are declared lowest first; the derived `Ord` is the role
/// hierarchy (`viewer < analyst < responder`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Analyst,
    Responder,
}

impl Role {
    /// Every role, lowest to highest.
    pub const ALL: [Role; 3] = [Role::Viewer, Role::Analyst, Role::Responder];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Analyst => "analyst",
            Self::Responder => "responder",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownRole(s.to_string()))
    }
}

/// Catalog entry for a remediation action.
///
/// `name` doubles as the command phrase matched against free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub name: String,
    /// Script file name, resolved against the executor's scripts directory.
    pub script: String,
    /// Lowest role allowed to invoke the action. `None` means nobody can
    /// through the audited path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_role: Option<Role>,
    /// Internal actions are never parsed from command text; they can only be
    /// reached through the trusted direct interface.
    #[serde(default)]
    pub internal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ActionDefinition {
    pub fn new(name: impl Into<String>, script: impl Into<String>, min_role: Role) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
            min_role: Some(min_role),
            internal: false,
            description: None,
        }
    }

    /// An action that is only reachable through the direct interface.
    pub fn internal(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
            min_role: None,
            internal: true,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Read-only lookup over the configured actions.
///
/// Names are normalized to trimmed lowercase on construction and lookups are
/// case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    actions: Vec<ActionDefinition>,
    by_name: HashMap<String, usize>,
}

impl ActionCatalog {
    pub fn new(actions: impl IntoIterator<Item = ActionDefinition>) -> Self {
        let mut catalog = Self::default();
        for mut action in actions {
            action.name = normalize_name(&action.name);
            match catalog.by_name.get(&action.name) {
                // Later definitions win, matching map-style configuration.
                Some(&idx) => catalog.actions[idx] = action,
                None => {
                    catalog.by_name.insert(action.name.clone(), catalog.actions.len());
                    catalog.actions.push(action);
                }
            }
        }
        catalog
    }

    pub fn get(&self, name: &str) -> Option<&ActionDefinition> {
        self.by_name
            .get(&normalize_name(name))
            .map(|&idx| &self.actions[idx])
    }

    /// Script mapped to an action, if any.
    pub fn script(&self, name: &str) -> Option<&str> {
        self.get(name).map(|a| a.script.as_str())
    }

    /// Minimum role for an action. Unknown actions have none.
    pub fn minimum_role(&self, name: &str) -> Option<Role> {
        self.get(name).and_then(|a| a.min_role)
    }

    /// Actions that may be invoked from command text.
    pub fn commandable(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.actions.iter().filter(|a| !a.internal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_order() {
        assert!(Role::Viewer < Role::Analyst);
        assert!(Role::Analyst < Role::Responder);
        assert_eq!(Role::ALL.iter().max(), Some(&Role::Responder));
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Responder".parse::<Role>().unwrap(), Role::Responder);
        assert_eq!(" viewer ".parse::<Role>().unwrap(), Role::Viewer);
        assert!(matches!(
            "admin".parse::<Role>(),
            Err(ConfigError::UnknownRole(r)) if r == "admin"
        ));
    }

    #[test]
    fn test_catalog_lookup_is_case_insensitive() {
        let catalog = ActionCatalog::new([
            ActionDefinition::new("Collect Logs", "Collect-Logs.ps1", Role::Analyst),
            ActionDefinition::internal("error", "Error-Handler.ps1"),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.script("COLLECT LOGS"), Some("Collect-Logs.ps1"));
        assert_eq!(catalog.minimum_role("collect logs"), Some(Role::Analyst));
        assert_eq!(catalog.minimum_role("error"), None);
        assert_eq!(catalog.minimum_role("dance"), None);

        let names: Vec<_> = catalog.commandable().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["collect logs"]);
    }

    #[test]
    fn test_catalog_later_definition_wins() {
        let catalog = ActionCatalog::new([
            ActionDefinition::new("check status", "Old.ps1", Role::Viewer),
            ActionDefinition::new("check status", "Check-Status.ps1", Role::Analyst),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.script("check status"), Some("Check-Status.ps1"));
        assert_eq!(catalog.minimum_role("check status"), Some(Role::Analyst));
    }
}
