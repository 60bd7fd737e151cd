pub mod deployments;

use axum::{Router, routing::get};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health_check", get(health_check))
        .merge(deployments::routes())
}

async fn health_check() -> &'static str {
    "ok"
}
