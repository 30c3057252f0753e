use std::sync::Arc;

use g1000_events::Notifier;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and the rest is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: g1000_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Outbound notification channel (SMTP, or log-only when unconfigured).
    pub notifier: Arc<dyn Notifier>,
}
