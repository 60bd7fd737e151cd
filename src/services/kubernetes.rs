use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, Pod, PodSpec, PodTemplateSpec, ResourceRequirements,
    SecretVolumeSource, Service, ServicePort, ServiceSpec, Volume, VolumeMount,
};
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, ServiceBackendPort,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ObjectMeta;
use tracing::{debug, info};

use crate::features::deployments::schemas::{
    AppStatusResponse, DeployRequest, PodStatusOut, QuantityIn,
};
use crate::services::cluster::ClusterClient;
use crate::utilities::errors::AppError;

pub const APP_LABEL: &str = "app";
pub const SERVICE_PORT: i32 = 80;

/// Everything [`DeploymentService::create`] submits for one request.
#[derive(Debug, Clone)]
pub struct Manifests {
    pub deployment: Deployment,
    pub service: Option<Service>,
    pub ingress: Option<Ingress>,
}

/// Switches that come from server config rather than the request.
#[derive(Debug, Clone, Default)]
pub struct IngressOptions {
    pub enabled: bool,
    pub class_name: Option<String>,
}

pub struct DeploymentService;

impl DeploymentService {
    /// Build the Deployment and, when requested, the Service and Ingress.
    pub fn build_manifests(req: &DeployRequest, ingress: &IngressOptions) -> Manifests {
        let deployment = Self::build_deployment(req);

        let service = req
            .external_access
            .then(|| Self::build_service(req.app_name(), req.service_port));

        let ingress = match (&req.domain_address, &service) {
            (Some(domain), Some(_)) if ingress.enabled && !domain.is_empty() => Some(
                Self::build_ingress(req.app_name(), domain, ingress.class_name.clone()),
            ),
            _ => None,
        };

        Manifests {
            deployment,
            service,
            ingress,
        }
    }

    pub fn build_deployment(req: &DeployRequest) -> Deployment {
        let name = req.app_name().to_string();
        let labels = app_labels(&name);

        let env: Vec<EnvVar> = req
            .envs
            .iter()
            .map(|env| EnvVar {
                name: env.name.clone(),
                value: Some(env.value.clone()),
                ..Default::default()
            })
            .collect();

        let volume_mounts: Vec<VolumeMount> = req
            .secrets
            .iter()
            .map(|secret| VolumeMount {
                name: secret.name.clone(),
                mount_path: secret.mount_path.clone(),
                read_only: Some(true),
                ..Default::default()
            })
            .collect();

        let volumes: Vec<Volume> = req
            .secrets
            .iter()
            .map(|secret| Volume {
                name: secret.name.clone(),
                secret: Some(SecretVolumeSource {
                    secret_name: Some(secret.name.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .collect();

        let requests = quantities(&req.resources.requests);
        let limits = quantities(&req.resources.limits);
        let resources = (requests.is_some() || limits.is_some()).then(|| ResourceRequirements {
            requests,
            limits,
            ..Default::default()
        });

        let container = Container {
            name: name.clone(),
            image: Some(req.image()),
            ports: Some(vec![ContainerPort {
                container_port: req.service_port,
                ..Default::default()
            }]),
            env: non_empty(env),
            volume_mounts: non_empty(volume_mounts),
            resources,
            ..Default::default()
        };

        Deployment {
            metadata: ObjectMeta {
                name: Some(name),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                replicas: Some(req.replicas),
                selector: LabelSelector {
                    match_labels: Some(labels.clone()),
                    ..Default::default()
                },
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: Some(labels),
                        ..Default::default()
                    }),
                    spec: Some(PodSpec {
                        containers: vec![container],
                        volumes: non_empty(volumes),
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// NodePort service exposing port 80 on the container's service port.
    pub fn build_service(name: &str, container_port: i32) -> Service {
        Service {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: Some(ServiceSpec {
                selector: Some(app_labels(name)),
                type_: Some("NodePort".to_string()),
                ports: Some(vec![ServicePort {
                    port: SERVICE_PORT,
                    target_port: Some(IntOrString::Int(container_port)),
                    protocol: Some("TCP".to_string()),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn build_ingress(name: &str, domain: &str, class_name: Option<String>) -> Ingress {
        let host = format!("{}.{}", name, domain);

        Ingress {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(app_labels(name)),
                ..Default::default()
            },
            spec: Some(IngressSpec {
                ingress_class_name: class_name,
                rules: Some(vec![IngressRule {
                    host: Some(host),
                    http: Some(HTTPIngressRuleValue {
                        paths: vec![HTTPIngressPath {
                            path: Some("/".to_string()),
                            path_type: "Prefix".to_string(),
                            backend: IngressBackend {
                                service: Some(IngressServiceBackend {
                                    name: name.to_string(),
                                    port: Some(ServiceBackendPort {
                                        number: Some(SERVICE_PORT),
                                        ..Default::default()
                                    }),
                                }),
                                ..Default::default()
                            },
                        }],
                    }),
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Submit the manifests for one request. A failure after the Deployment
    /// was created leaves it in place.
    pub async fn create(
        cluster: &dyn ClusterClient,
        namespace: &str,
        manifests: &Manifests,
    ) -> Result<(), AppError> {
        let created = cluster
            .create_deployment(namespace, &manifests.deployment)
            .await?;
        info!(
            "created deployment {} in {}",
            created.metadata.name.as_deref().unwrap_or_default(),
            namespace
        );

        if let Some(service) = &manifests.service {
            let created = cluster.create_service(namespace, service).await?;
            info!(
                "created service {} in {}",
                created.metadata.name.as_deref().unwrap_or_default(),
                namespace
            );
        }

        if let Some(ingress) = &manifests.ingress {
            let created = cluster.create_ingress(namespace, ingress).await?;
            info!(
                "created ingress {} in {}",
                created.metadata.name.as_deref().unwrap_or_default(),
                namespace
            );
        }

        Ok(())
    }

    pub async fn get_status(
        cluster: &dyn ClusterClient,
        namespace: &str,
        app_name: &str,
    ) -> Result<AppStatusResponse, AppError> {
        let deployment = cluster.get_deployment(namespace, app_name).await?;
        let pods = cluster
            .list_pods(namespace, &app_selector(app_name))
            .await?;

        Ok(app_status(&deployment, &pods))
    }

    /// One pod list call per deployment, in the order the cluster lists them.
    pub async fn get_all_statuses(
        cluster: &dyn ClusterClient,
        namespace: &str,
    ) -> Result<Vec<AppStatusResponse>, AppError> {
        let deployments = cluster.list_deployments(namespace).await?;
        debug!("found {} deployments in {}", deployments.len(), namespace);

        let mut statuses = Vec::with_capacity(deployments.len());
        for deployment in &deployments {
            let name = deployment.metadata.name.as_deref().unwrap_or_default();
            let pods = cluster.list_pods(namespace, &app_selector(name)).await?;
            statuses.push(app_status(deployment, &pods));
        }

        Ok(statuses)
    }
}

pub fn app_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL.to_string(), name.to_string())])
}

pub fn app_selector(name: &str) -> String {
    format!("{}={}", APP_LABEL, name)
}

pub fn app_status(deployment: &Deployment, pods: &[Pod]) -> AppStatusResponse {
    AppStatusResponse {
        deployment_name: deployment.metadata.name.clone().unwrap_or_default(),
        replicas: deployment.spec.as_ref().and_then(|spec| spec.replicas),
        ready_replicas: deployment
            .status
            .as_ref()
            .and_then(|status| status.ready_replicas),
        pod_statuses: pods.iter().map(pod_status).collect(),
    }
}

pub fn pod_status(pod: &Pod) -> PodStatusOut {
    let status = pod.status.clone().unwrap_or_default();

    PodStatusOut {
        name: pod.metadata.name.clone(),
        phase: status.phase,
        host_ip: status.host_ip,
        pod_ip: status.pod_ip,
        start_time: status.start_time,
    }
}

fn quantities(values: &BTreeMap<String, QuantityIn>) -> Option<BTreeMap<String, Quantity>> {
    let map: BTreeMap<String, Quantity> = values
        .iter()
        .map(|(key, value)| (key.clone(), value.into()))
        .collect();
    (!map.is_empty()).then_some(map)
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}
