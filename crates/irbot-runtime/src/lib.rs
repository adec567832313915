//! # irbot-runtime
//!
//! Request-time machinery of the IR Bot gateway:
//!
//! - [`CommandParser`]: free text to `(action, host)`
//! - [`ActionExecutor`]: action to script, run with bounded concurrency
//! - [`Gateway`]: the audited parse, authorize, execute pipeline
//! - [`DirectExecutor`]: the unaudited path for trusted internal callers

pub mod direct;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod parser;

pub use direct::{DirectExecutor, DirectSuccess};
pub use error::{DirectError, ExecutionError, GatewayError, ParseError};
pub use executor::{ActionExecutor, ExecutionOutput, ProcessRunner, ScriptRunner};
pub use orchestrator::{CommandRequest, CommandSuccess, Gateway, UNKNOWN_USER};
pub use parser::{Command, CommandParser};
