use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kaas_api::{services::cluster::ClusterClient, utilities::errors::AppError};
use serde_json::json;

#[derive(Default)]
struct FakeState {
    deployments: Vec<(String, Deployment)>,
    services: Vec<(String, Service)>,
    ingresses: Vec<(String, Ingress)>,
    pods: Vec<(String, Pod)>,
    pod_selectors: Vec<String>,
    fail_services: bool,
}

/// In-memory stand-in for the API server. Stores whatever it is sent and
/// answers label-selector queries over seeded pods.
#[derive(Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<FakeState>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_service_creation(&self) {
        self.state.lock().unwrap().fail_services = true;
    }

    pub fn deployments(&self) -> Vec<Deployment> {
        let state = self.state.lock().unwrap();
        state.deployments.iter().map(|(_, d)| d.clone()).collect()
    }

    pub fn services(&self) -> Vec<Service> {
        let state = self.state.lock().unwrap();
        state.services.iter().map(|(_, s)| s.clone()).collect()
    }

    pub fn ingresses(&self) -> Vec<Ingress> {
        let state = self.state.lock().unwrap();
        state.ingresses.iter().map(|(_, i)| i.clone()).collect()
    }

    pub fn namespaces_written(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .deployments
            .iter()
            .map(|(ns, _)| ns.clone())
            .chain(state.services.iter().map(|(ns, _)| ns.clone()))
            .collect()
    }

    /// Every label selector the pods endpoint was queried with, in order.
    pub fn pod_selectors(&self) -> Vec<String> {
        self.state.lock().unwrap().pod_selectors.clone()
    }

    /// Seeds a deployment the way the cluster would report it after rollout.
    pub fn seed_deployment(&self, namespace: &str, name: &str, replicas: i32, ready: Option<i32>) {
        let status = match ready {
            Some(ready) => json!({"readyReplicas": ready}),
            None => json!({}),
        };
        let deployment: Deployment = serde_json::from_value(json!({
            "metadata": {"name": name, "namespace": namespace},
            "spec": {
                "replicas": replicas,
                "selector": {"matchLabels": {"app": name}},
                "template": {"metadata": {"labels": {"app": name}}}
            },
            "status": status
        }))
        .unwrap();

        self.state
            .lock()
            .unwrap()
            .deployments
            .push((namespace.to_string(), deployment));
    }

    pub fn seed_pod(&self, namespace: &str, name: &str, app: &str, phase: &str) {
        let pod: Pod = serde_json::from_value(json!({
            "metadata": {"name": name, "namespace": namespace, "labels": {"app": app}},
            "status": {
                "phase": phase,
                "hostIP": "10.0.0.1",
                "podIP": "172.16.0.10",
                "startTime": "2024-05-01T12:00:00Z"
            }
        }))
        .unwrap();

        self.state
            .lock()
            .unwrap()
            .pods
            .push((namespace.to_string(), pod));
    }
}

fn name_of(meta: &k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta) -> String {
    meta.name.clone().unwrap_or_default()
}

/// The error the API server returns, as the kube client surfaces it.
fn api_error(code: u16, reason: &str, message: String) -> AppError {
    let response: kube::core::ErrorResponse = serde_json::from_value(json!({
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    }))
    .unwrap();

    AppError::KubeError(kube::Error::Api(response))
}

fn already_exists(kind: &str, name: &str) -> AppError {
    api_error(
        409,
        "AlreadyExists",
        format!("{} \"{}\" already exists", kind, name),
    )
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, AppError> {
        let mut state = self.state.lock().unwrap();
        let name = name_of(&deployment.metadata);
        if state
            .deployments
            .iter()
            .any(|(ns, d)| ns == namespace && name_of(&d.metadata) == name)
        {
            return Err(already_exists("deployments.apps", &name));
        }

        state
            .deployments
            .push((namespace.to_string(), deployment.clone()));
        Ok(deployment.clone())
    }

    async fn create_service(
        &self,
        namespace: &str,
        service: &Service,
    ) -> Result<Service, AppError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_services {
            return Err(api_error(
                403,
                "Forbidden",
                "services is forbidden: exceeded quota".to_string(),
            ));
        }

        state.services.push((namespace.to_string(), service.clone()));
        Ok(service.clone())
    }

    async fn create_ingress(
        &self,
        namespace: &str,
        ingress: &Ingress,
    ) -> Result<Ingress, AppError> {
        let mut state = self.state.lock().unwrap();
        state
            .ingresses
            .push((namespace.to_string(), ingress.clone()));
        Ok(ingress.clone())
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, AppError> {
        let state = self.state.lock().unwrap();
        state
            .deployments
            .iter()
            .find(|(ns, d)| ns == namespace && name_of(&d.metadata) == name)
            .map(|(_, d)| d.clone())
            .ok_or_else(|| {
                AppError::NotFoundError(format!(
                    "Deployment {} not found in namespace {}",
                    name, namespace
                ))
            })
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .deployments
            .iter()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, d)| d.clone())
            .collect())
    }

    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<Pod>, AppError> {
        let (key, value) = label_selector
            .split_once('=')
            .ok_or_else(|| {
                api_error(
                    400,
                    "BadRequest",
                    format!("unable to parse requirement: {}", label_selector),
                )
            })?;

        let mut state = self.state.lock().unwrap();
        state.pod_selectors.push(label_selector.to_string());
        Ok(state
            .pods
            .iter()
            .filter(|(ns, _)| ns == namespace)
            .filter(|(_, pod)| {
                pod.metadata
                    .labels
                    .as_ref()
                    .and_then(|labels| labels.get(key))
                    .is_some_and(|label| label == value)
            })
            .map(|(_, pod)| pod.clone())
            .collect())
    }
}
