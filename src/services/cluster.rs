use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;

use crate::utilities::errors::AppError;

/// The cluster operations the API needs.
///
/// [`crate::services::build_kubernetes::KubeCluster`] talks to a real API
/// server; tests plug in an in-memory implementation.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, AppError>;

    async fn create_service(&self, namespace: &str, service: &Service)
    -> Result<Service, AppError>;

    async fn create_ingress(&self, namespace: &str, ingress: &Ingress)
    -> Result<Ingress, AppError>;

    /// Reads one deployment, failing with [`AppError::NotFoundError`] when the
    /// API server reports it missing.
    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, AppError>;

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>, AppError>;

    /// Lists pods matching an equality-based label selector such as `app=demo`.
    async fn list_pods(&self, namespace: &str, label_selector: &str)
    -> Result<Vec<Pod>, AppError>;
}
