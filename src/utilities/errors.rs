use axum::{
    Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse,
    response::Response,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Environment variable {0} is not set")]
    EnvironmentVariableNotSetError(String),
    #[error("{0}")]
    FileReadError(String),
    #[error("Kubernetes config error: {0}")]
    KubeConfigError(String),
    #[error("{0}")]
    KubeError(#[from] kube::Error),
    #[error("Invalid json body, {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("Validation errors, {0}")]
    ValidatorValidationErrors(#[from] validator::ValidationErrors),
    #[error("{0}")]
    NotFoundError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::JsonRejection(rejection) => rejection.status(),
            Self::ValidatorValidationErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFoundError(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            Self::KubeError(e) => e.to_string(),
            Self::JsonRejection(rejection) => rejection.body_text(),
            Self::NotFoundError(e) => e,
            Self::ValidatorValidationErrors(e) => e.to_string(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!("{}", error_message);
        }

        let body = Json(json!({"error": error_message}));

        (status, body).into_response()
    }
}
