//! IR Bot policy enforcement
//!
//! Static role hierarchy (`viewer < analyst < responder`) and the
//! deny-by-default authorizer consulted before any remediation script runs.
//! Role and action tables are loaded from configuration at startup and are
//! never modified afterwards.

pub mod authorizer;
pub mod error;
pub mod role;

pub use authorizer::Authorizer;
pub use error::{Denial, DenialKind};
pub use role::{RoleModel, satisfies};
