use axum::extract::FromRequest;

use crate::utilities::errors::AppError;

/// `axum::Json` whose rejections render as `{"error": ...}` like every other
/// [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
