use std::sync::Arc;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::{ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config as KubeConfig};
use tracing::{debug, info};

use crate::services::cluster::ClusterClient;
use crate::utilities::{config::Config, errors::AppError};

#[derive(Clone)]
pub struct Kubernetes {
    pub cluster: Arc<dyn ClusterClient>,
}

impl Kubernetes {
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let kube_config = load_kube_config(config).await?;
        let client = Client::try_from(kube_config)?;

        Ok(Self::from_cluster(KubeCluster { client }))
    }

    pub fn from_cluster(cluster: impl ClusterClient + 'static) -> Self {
        Self {
            cluster: Arc::new(cluster),
        }
    }
}

/// In-cluster config, an explicit kubeconfig file, or whatever the
/// environment provides, in that order.
pub async fn load_kube_config(config: &Config) -> Result<KubeConfig, AppError> {
    if config.k8s_in_cluster {
        // Running inside Kubernetes cluster
        info!("Loading in-cluster Kubernetes config");
        return KubeConfig::incluster().map_err(|e| AppError::KubeConfigError(e.to_string()));
    }

    if let Some(path) = &config.k8s_config_path {
        info!("Loading kubeconfig from {}", path);
        let kubeconfig =
            Kubeconfig::read_from(path).map_err(|e| AppError::KubeConfigError(e.to_string()))?;
        return KubeConfig::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| AppError::KubeConfigError(e.to_string()));
    }

    info!("Inferring Kubernetes config from environment");
    KubeConfig::infer()
        .await
        .map_err(|e| AppError::KubeConfigError(e.to_string()))
}

/// [`ClusterClient`] backed by the Kubernetes REST API.
#[derive(Clone)]
pub struct KubeCluster {
    pub client: Client,
}

#[async_trait]
impl ClusterClient for KubeCluster {
    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, AppError> {
        let deployments_api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        Ok(deployments_api
            .create(&PostParams::default(), deployment)
            .await?)
    }

    async fn create_service(
        &self,
        namespace: &str,
        service: &Service,
    ) -> Result<Service, AppError> {
        let services_api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        Ok(services_api.create(&PostParams::default(), service).await?)
    }

    async fn create_ingress(
        &self,
        namespace: &str,
        ingress: &Ingress,
    ) -> Result<Ingress, AppError> {
        let ingress_api: Api<Ingress> = Api::namespaced(self.client.clone(), namespace);
        Ok(ingress_api.create(&PostParams::default(), ingress).await?)
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, AppError> {
        let deployments_api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        match deployments_api.get(name).await {
            Ok(deployment) => Ok(deployment),
            Err(kube::Error::Api(err)) if err.code == 404 => Err(AppError::NotFoundError(
                format!("Deployment {} not found in namespace {}", name, namespace),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>, AppError> {
        let deployments_api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let list = deployments_api.list(&ListParams::default()).await?;
        Ok(list.items)
    }

    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<Pod>, AppError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let lp = ListParams::default().labels(label_selector);

        let pod_list = pods.list(&lp).await?;
        debug!(
            "found {} pods for selector {}",
            pod_list.items.len(),
            label_selector
        );

        Ok(pod_list.items)
    }
}
