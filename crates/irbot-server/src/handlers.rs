//! Request handlers.

use crate::error::ServerError;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use irbot_core::Role;
use irbot_runtime::CommandRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

/// Body of `POST /command`.
///
/// Fields are loosely typed so that a non-string `text` is treated like a
/// missing one instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct CommandBody {
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<Value>,
}

impl From<CommandBody> for CommandRequest {
    fn from(body: CommandBody) -> Self {
        CommandRequest {
            text: body.text.and_then(into_string),
            user_id: body.user_id.and_then(into_string),
        }
    }
}

fn into_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub ok: bool,
    pub action: String,
    pub host: String,
    pub role: Role,
    pub output: String,
}

/// Body of `POST /ir`.
#[derive(Debug, Default, Deserialize)]
pub struct DirectBody {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DirectResponse {
    pub ok: bool,
    pub action: String,
    pub host: String,
    pub output: String,
}

/// Audited command endpoint used by the chat adapter.
pub async fn command(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CommandBody>, JsonRejection>,
) -> Result<Json<CommandResponse>, ServerError> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable command body, treating as empty");
            CommandBody::default()
        }
    };

    let success = state.gateway.handle(body.into()).await?;
    Ok(Json(CommandResponse {
        ok: true,
        action: success.action,
        host: success.host,
        role: success.role,
        output: success.output,
    }))
}

/// Unaudited execution endpoint for trusted internal callers.
pub async fn direct(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DirectBody>, JsonRejection>,
) -> Result<Json<DirectResponse>, ServerError> {
    let body = payload.map(|Json(body)| body).unwrap_or_default();

    let action = body.action.unwrap_or_default();
    let host = body.host.unwrap_or_default();
    let success = state.direct.run(&action, &host).await?;

    Ok(Json(DirectResponse {
        ok: true,
        action: success.action,
        host: success.host,
        output: success.output,
    }))
}

/// Liveness check.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.service_name,
    }))
}
