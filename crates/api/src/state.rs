use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pulse_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Lead time between scheduling a repair and its planned date.
    pub fn repair_lead(&self) -> chrono::Duration {
        chrono::Duration::days(self.config.repair_lead_days)
    }
}
