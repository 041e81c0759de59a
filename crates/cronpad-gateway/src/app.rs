use axum::{routing::get, Router};
use cronpad_core::config::CronpadConfig;
use cronpad_store::TableManager;
use std::sync::Arc;

/// Central shared state: passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: CronpadConfig,
    pub tables: TableManager,
}

impl AppState {
    pub fn new(config: CronpadConfig, tables: TableManager) -> Self {
        Self { config, tables }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/api/crontab",
            get(crate::http::crontab::fetch_handler).post(crate::http::crontab::save_handler),
        )
        .route(
            "/api/crontab/skipped",
            get(crate::http::crontab::skipped_handler),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
