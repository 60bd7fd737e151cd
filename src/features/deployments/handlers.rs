use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::info;
use validator::Validate;

use crate::{
    features::deployments::schemas::{DeployRequest, MessageResponse},
    services::{
        build_kubernetes::Kubernetes,
        kubernetes::{DeploymentService, IngressOptions},
    },
    utilities::{config::Config, errors::AppError, extractors::AppJson},
};

pub async fn deploy_handler(
    State(kubernetes): State<Kubernetes>,
    State(config): State<Config>,
    AppJson(req): AppJson<DeployRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    info!(
        "deploying {} from {} with {} replicas",
        req.app_name(),
        req.image(),
        req.replicas
    );

    let ingress = IngressOptions {
        enabled: config.ingress_enabled,
        class_name: config.ingress_class.clone(),
    };
    let manifests = DeploymentService::build_manifests(&req, &ingress);

    DeploymentService::create(kubernetes.cluster.as_ref(), &config.k8s_namespace, &manifests)
        .await?;

    Ok(Json(MessageResponse::new("App deployed successfully")))
}

pub async fn get_status_handler(
    Path(app_name): Path<String>,
    State(kubernetes): State<Kubernetes>,
    State(config): State<Config>,
) -> Result<impl IntoResponse, AppError> {
    let status =
        DeploymentService::get_status(kubernetes.cluster.as_ref(), &config.k8s_namespace, &app_name)
            .await?;

    Ok(Json(status))
}

pub async fn get_statuses_handler(
    State(kubernetes): State<Kubernetes>,
    State(config): State<Config>,
) -> Result<impl IntoResponse, AppError> {
    let statuses =
        DeploymentService::get_all_statuses(kubernetes.cluster.as_ref(), &config.k8s_namespace)
            .await?;

    Ok(Json(statuses))
}
