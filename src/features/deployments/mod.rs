pub mod handlers;
pub mod schemas;

use axum::{
    Router,
    routing::{get, post},
};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deploy", post(handlers::deploy_handler))
        .route("/status/{app_name}", get(handlers::get_status_handler))
        .route("/statuses", get(handlers::get_statuses_handler))
}
