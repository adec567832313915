//! # irbot-server
//!
//! HTTP surface of the IR Bot gateway.
//!
//! ## Endpoints
//!
//! - `POST /command` `{text, userId}`: parse, authorize, execute and audit
//! - `POST /ir` `{action, host}`: run an action directly. Unaudited and
//!   without a role check; bind it only where trusted callers can reach it.
//! - `GET /health`: liveness

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ServerError;
pub use routes::create_router;
pub use state::AppState;
