use axum::extract::FromRef;

use crate::{services::build_kubernetes::Kubernetes, utilities::config::Config};

#[derive(Clone)]
pub struct AppState {
    pub kubernetes: Kubernetes,
    pub config: Config,
}

impl FromRef<AppState> for Kubernetes {
    fn from_ref(state: &AppState) -> Self {
        state.kubernetes.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
