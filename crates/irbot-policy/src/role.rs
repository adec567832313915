//! Role model lookups.
//!
//! Maps user ids to roles and actions to minimum roles. Both tables come
//! from configuration and never change after construction.

use irbot_core::{ActionCatalog, GatewayConfig, Role};
use std::collections::HashMap;
use std::sync::Arc;

/// Whether a user holding `have` may perform an action needing `need`.
///
/// Users without a role satisfy nothing.
pub fn satisfies(have: Option<Role>, need: Role) -> bool {
    match have {
        Some(have) => have >= need,
        None => false,
    }
}

/// Read-only view of the user and action role tables.
#[derive(Debug, Clone)]
pub struct RoleModel {
    users: Arc<HashMap<String, Role>>,
    actions: Arc<ActionCatalog>,
}

impl RoleModel {
    /// Create a role model from explicit tables.
    pub fn new(users: HashMap<String, Role>, actions: Arc<ActionCatalog>) -> Self {
        Self {
            users: Arc::new(users),
            actions,
        }
    }

    /// Create a role model from the gateway configuration.
    pub fn from_config(config: &GatewayConfig, actions: Arc<ActionCatalog>) -> Self {
        let users = config
            .users
            .iter()
            .map(|(id, role)| (id.clone(), *role))
            .collect();
        Self::new(users, actions)
    }

    /// Role assigned to a user id. User ids are matched exactly.
    pub fn role_of(&self, user_id: &str) -> Option<Role> {
        self.users.get(user_id).copied()
    }

    /// Minimum role required to invoke an action.
    pub fn minimum_role(&self, action: &str) -> Option<Role> {
        self.actions.minimum_role(action)
    }

    /// Number of users with a role.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irbot_core::ActionDefinition;

    fn model() -> RoleModel {
        let actions = Arc::new(ActionCatalog::new([
            ActionDefinition::new("check status", "Check-Status.ps1", Role::Viewer),
            ActionDefinition::new("quarantine host", "Quarantine-Host.ps1", Role::Responder),
        ]));
        RoleModel::new(
            HashMap::from([
                ("alice".to_string(), Role::Viewer),
                ("charlie".to_string(), Role::Responder),
            ]),
            actions,
        )
    }

    #[test]
    fn test_satisfies_follows_total_order() {
        for (i, low) in Role::ALL.iter().enumerate() {
            for high in &Role::ALL[i..] {
                assert!(satisfies(Some(*high), *low), "{high} should satisfy {low}");
                if high != low {
                    assert!(!satisfies(Some(*low), *high), "{low} must not satisfy {high}");
                }
            }
        }
    }

    #[test]
    fn test_no_role_satisfies_nothing() {
        for need in Role::ALL {
            assert!(!satisfies(None, need));
        }
    }

    #[test]
    fn test_lookups() {
        let model = model();
        assert_eq!(model.role_of("alice"), Some(Role::Viewer));
        assert_eq!(model.role_of("Alice"), None);
        assert_eq!(model.role_of("mallory"), None);
        assert_eq!(model.minimum_role("Quarantine Host"), Some(Role::Responder));
        assert_eq!(model.minimum_role("dance"), None);
        assert_eq!(model.user_count(), 2);
    }
}
