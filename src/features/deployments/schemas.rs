use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use serde::{Deserialize, Serialize};
use validator::Validate;

// -- =====================
// -- IN
// -- =====================
#[derive(Deserialize, Validate, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    #[validate(
        required(message = "appName is required"),
        length(min = 1, message = "appName must not be empty")
    )]
    pub app_name: Option<String>,
    #[serde(default = "default_replicas")]
    #[validate(range(min = 0, message = "replicas must not be negative"))]
    pub replicas: i32,
    #[validate(
        required(message = "imageAddress is required"),
        length(min = 1, message = "imageAddress must not be empty")
    )]
    pub image_address: Option<String>,
    #[serde(default = "default_image_tag")]
    pub image_tag: String,
    #[serde(default = "default_service_port")]
    #[validate(range(min = 1, max = 65535, message = "servicePort must be a valid port"))]
    pub service_port: i32,
    #[serde(default)]
    pub resources: ResourcesIn,
    #[serde(default)]
    pub envs: Vec<EnvIn>,
    #[serde(default)]
    pub secrets: Vec<SecretIn>,
    #[serde(default)]
    pub external_access: bool,
    pub domain_address: Option<String>,
}

fn default_replicas() -> i32 {
    1
}

fn default_image_tag() -> String {
    "latest".to_string()
}

fn default_service_port() -> i32 {
    80
}

impl DeployRequest {
    pub fn app_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or_default()
    }

    /// Image reference in `address:tag` form.
    pub fn image(&self) -> String {
        format!(
            "{}:{}",
            self.image_address.as_deref().unwrap_or_default(),
            self.image_tag
        )
    }
}

#[derive(Deserialize, Default, Debug)]
pub struct ResourcesIn {
    #[serde(default)]
    pub requests: BTreeMap<String, QuantityIn>,
    #[serde(default)]
    pub limits: BTreeMap<String, QuantityIn>,
}

/// Resource quantity as sent by clients, `"500m"` or `2`.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum QuantityIn {
    Text(String),
    Number(serde_json::Number),
}

impl From<&QuantityIn> for Quantity {
    fn from(value: &QuantityIn) -> Self {
        match value {
            QuantityIn::Text(text) => Quantity(text.clone()),
            QuantityIn::Number(number) => Quantity(number.to_string()),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct EnvIn {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SecretIn {
    pub name: String,
    pub mount_path: String,
}

// -- =====================
// -- OUT
// -- =====================
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AppStatusResponse {
    pub deployment_name: String,
    pub replicas: Option<i32>,
    pub ready_replicas: Option<i32>,
    pub pod_statuses: Vec<PodStatusOut>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PodStatusOut {
    pub name: Option<String>,
    pub phase: Option<String>,
    #[serde(rename = "hostIP")]
    pub host_ip: Option<String>,
    #[serde(rename = "podIP")]
    pub pod_ip: Option<String>,
    pub start_time: Option<Time>,
}
