//! Shared application state.

use irbot_audit::AuditLogger;
use irbot_core::GatewayConfig;
use irbot_policy::{Authorizer, RoleModel};
use irbot_runtime::{ActionExecutor, CommandParser, DirectExecutor, Gateway};
use std::sync::Arc;

/// State shared by every request handler.
pub struct AppState {
    pub gateway: Gateway,
    pub direct: DirectExecutor,
    pub service_name: String,
}

impl AppState {
    pub fn new(gateway: Gateway, direct: DirectExecutor, service_name: impl Into<String>) -> Self {
        Self {
            gateway,
            direct,
            service_name: service_name.into(),
        }
    }

    /// Wire the gateway from configuration.
    ///
    /// The audited gateway and the direct executor share one executor, so
    /// both paths count against the same script concurrency limit.
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let catalog = Arc::new(config.catalog());
        let executor = Arc::new(ActionExecutor::from_config(&config.executor, catalog.clone()));

        let gateway = Gateway::new(
            CommandParser::new(&catalog),
            Authorizer::new(RoleModel::from_config(config, catalog)),
            executor.clone(),
            AuditLogger::new(&config.audit),
        );

        Self::new(gateway, DirectExecutor::new(executor), &config.service.name)
    }
}
