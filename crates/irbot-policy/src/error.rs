//! Denial types for authorization decisions.

use irbot_core::Role;
use thiserror::Error;

/// Reason an authorization check refused a request.
///
/// The message always cites the role the user has and the role the action
/// needs, with `none` standing in for a missing mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Denial {
    /// The kind of denial.
    pub kind: DenialKind,
    /// Role resolved for the user, if any.
    pub have: Option<Role>,
    /// Minimum role configured for the action, if any.
    pub need: Option<Role>,
    /// Human-readable message recorded in the audit log.
    pub message: String,
}

impl Denial {
    fn new(kind: DenialKind, have: Option<Role>, need: Option<Role>) -> Self {
        let message = format!(
            "Insufficient role (have={}, need={})",
            role_label(have),
            role_label(need)
        );
        Self {
            kind,
            have,
            need,
            message,
        }
    }

    /// The action has no minimum role mapping.
    pub fn unknown_action(have: Option<Role>) -> Self {
        Self::new(DenialKind::UnknownAction, have, None)
    }

    /// The user has no role mapping.
    pub fn unknown_user(need: Role) -> Self {
        Self::new(DenialKind::UnknownUser, None, Some(need))
    }

    /// The user's role is below the action's minimum.
    pub fn insufficient_role(have: Role, need: Role) -> Self {
        Self::new(DenialKind::InsufficientRole, Some(have), Some(need))
    }
}

/// Categories of denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    /// No minimum role is configured for the action.
    UnknownAction,
    /// The user id has no role.
    UnknownUser,
    /// The user's role ranks below the action's minimum.
    InsufficientRole,
}

fn role_label(role: Option<Role>) -> &'static str {
    role.map(|r| r.as_str()).unwrap_or("none")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_cite_have_and_need() {
        assert_eq!(
            Denial::insufficient_role(Role::Viewer, Role::Responder).to_string(),
            "Insufficient role (have=viewer, need=responder)"
        );
        assert_eq!(
            Denial::unknown_user(Role::Analyst).to_string(),
            "Insufficient role (have=none, need=analyst)"
        );
        assert_eq!(
            Denial::unknown_action(None).to_string(),
            "Insufficient role (have=none, need=none)"
        );
    }
}
