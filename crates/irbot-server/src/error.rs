//! Error types for the HTTP layer.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use irbot_runtime::{Command, DirectError, GatewayError};
use serde_json::json;
use thiserror::Error;

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ServerError {
    /// An audited command failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A direct execution failed.
    #[error(transparent)]
    Direct(#[from] DirectError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Gateway(GatewayError::Parse(_) | GatewayError::NotMapped { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Gateway(GatewayError::Denied { .. }) => StatusCode::FORBIDDEN,
            ServerError::Gateway(GatewayError::Execution { .. } | GatewayError::Interrupted) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServerError::Direct(DirectError::MissingField | DirectError::NotAllowed { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Direct(DirectError::Execution(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn command(&self) -> Option<&Command> {
        match self {
            ServerError::Gateway(e) => e.command(),
            ServerError::Direct(_) => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        let mut body = json!({ "ok": false, "error": self.to_string() });
        // The chat adapter echoes action and host back to the user.
        if let Some(command) = self.command() {
            body["action"] = json!(command.action);
            body["host"] = json!(command.host);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irbot_runtime::{ExecutionError, ParseError};

    #[test]
    fn test_status_mapping() {
        let command = Command {
            action: "collect logs".to_string(),
            host: "db01".to_string(),
        };

        let cases = [
            (ServerError::from(GatewayError::Parse(ParseError::Empty)), StatusCode::BAD_REQUEST),
            (
                ServerError::from(GatewayError::NotMapped {
                    command: command.clone(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServerError::from(GatewayError::Denied {
                    command: command.clone(),
                    denial: irbot_policy::Denial::insufficient_role(
                        irbot_core::Role::Viewer,
                        irbot_core::Role::Analyst,
                    ),
                }),
                StatusCode::FORBIDDEN,
            ),
            (
                ServerError::from(GatewayError::Execution {
                    command,
                    role: irbot_core::Role::Analyst,
                    source: ExecutionError::script_failed(Some(1), "boom"),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServerError::from(GatewayError::Interrupted),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ServerError::from(DirectError::MissingField), StatusCode::BAD_REQUEST),
            (
                ServerError::from(DirectError::NotAllowed {
                    action: "dance".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status(), status, "{error}");
        }
    }
}
