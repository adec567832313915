//! Deny-by-default authorization.

use crate::error::Denial;
use crate::role::{RoleModel, satisfies};
use irbot_core::Role;

/// Decides whether a user may invoke an action.
///
/// A missing user mapping or a missing minimum-role mapping both deny.
#[derive(Debug, Clone)]
pub struct Authorizer {
    roles: RoleModel,
}

impl Authorizer {
    pub fn new(roles: RoleModel) -> Self {
        Self { roles }
    }

    /// Authorize `user_id` for `action`, returning the user's role on success.
    pub fn authorize(&self, user_id: &str, action: &str) -> Result<Role, Denial> {
        let have = self.roles.role_of(user_id);
        let Some(need) = self.roles.minimum_role(action) else {
            tracing::debug!(user_id, action, "no minimum role configured for action");
            return Err(Denial::unknown_action(have));
        };

        match have {
            Some(role) if satisfies(have, need) => {
                tracing::debug!(user_id, action, role = %role, "authorized");
                Ok(role)
            }
            Some(role) => {
                tracing::debug!(user_id, action, have = %role, need = %need, "role below minimum");
                Err(Denial::insufficient_role(role, need))
            }
            None => {
                tracing::debug!(user_id, action, need = %need, "user has no role");
                Err(Denial::unknown_user(need))
            }
        }
    }
}
