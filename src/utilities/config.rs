use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use tokio::fs;
use tracing::Level;

use crate::utilities::errors::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: String,
    pub base_dir: PathBuf,
    pub tracing_level: Level,

    // KUBERNETES
    pub k8s_in_cluster: bool,
    pub k8s_config_path: Option<String>,
    pub k8s_namespace: String,

    // INGRESS
    pub ingress_enabled: bool,
    pub ingress_class: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:5000".to_string(),
            base_dir: PathBuf::from("."),
            tracing_level: Level::DEBUG,
            k8s_in_cluster: false,
            k8s_config_path: None,
            k8s_namespace: "default".to_string(),
            ingress_enabled: false,
            ingress_class: None,
        }
    }
}

impl Config {
    pub async fn init() -> Result<Self, AppError> {
        let defaults = Config::default();

        let server_address = get_config_value(
            "SERVER_ADDRESS",
            Some("SERVER_ADDRESS"),
            None,
            Some(defaults.server_address),
        )
        .await?
        .ok_or_else(|| AppError::EnvironmentVariableNotSetError("SERVER_ADDRESS".to_string()))?;

        let base_dir = find_project_root().unwrap_or(defaults.base_dir);

        let tracing_level = get_config_value(
            "TRACING_LEVEL",
            Some("TRACING_LEVEL"),
            None,
            Some(defaults.tracing_level),
        )
        .await?
        .ok_or_else(|| AppError::EnvironmentVariableNotSetError("TRACING_LEVEL".to_string()))?;

        let k8s_in_cluster = get_config_value(
            "K8S_IN_CLUSTER",
            Some("K8S_IN_CLUSTER"),
            None,
            Some(defaults.k8s_in_cluster),
        )
        .await?
        .ok_or_else(|| AppError::EnvironmentVariableNotSetError("K8S_IN_CLUSTER".to_string()))?;

        let kubeconfig_path = base_dir.join("certs/kubeconfig");
        let k8s_config_path: Option<String> =
            get_config_value("K8S_KUBECONFIG", Some("K8S_KUBECONFIG"), None, None).await?;
        // A kubeconfig dropped into certs/ wins over ~/.kube/config
        let k8s_config_path = k8s_config_path.or_else(|| {
            kubeconfig_path
                .exists()
                .then(|| kubeconfig_path.display().to_string())
        });

        let k8s_namespace = get_config_value(
            "K8S_NAMESPACE",
            Some("K8S_NAMESPACE"),
            None,
            Some(defaults.k8s_namespace),
        )
        .await?
        .ok_or_else(|| AppError::EnvironmentVariableNotSetError("K8S_NAMESPACE".to_string()))?;
        if k8s_namespace.trim().is_empty() {
            return Err(AppError::EnvironmentVariableNotSetError(
                "K8S_NAMESPACE".to_string(),
            ));
        }

        let ingress_enabled = get_config_value(
            "INGRESS_ENABLED",
            Some("INGRESS_ENABLED"),
            None,
            Some(defaults.ingress_enabled),
        )
        .await?
        .ok_or_else(|| AppError::EnvironmentVariableNotSetError("INGRESS_ENABLED".to_string()))?;
        let ingress_class =
            get_config_value("INGRESS_CLASS", Some("INGRESS_CLASS"), None, None).await?;

        Ok(Config {
            server_address,
            base_dir,
            tracing_level,
            k8s_in_cluster,
            k8s_config_path,
            k8s_namespace,
            ingress_enabled,
            ingress_class,
        })
    }
}

fn find_project_root() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        if dir.join("Cargo.toml").exists() {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Try to resolve config value from Docker secrets, file path, or env var.
/// - `secret_name` → filename inside `/run/secrets/`
/// - `env_name` → optional environment variable key
/// - `fallback_path` → fallback file path (checked if exists)
///
/// Returns parsed `T` if found and successfully parsed, `fallback` otherwise.
pub async fn get_config_value<T>(
    secret_name: &str,
    env_name: Option<&str>,
    fallback_path: Option<&PathBuf>,
    fallback: Option<T>,
) -> Result<Option<T>, AppError>
where
    T: FromStr,
{
    // 1. Docker secrets
    let docker_secret = Path::new("/run/secrets").join(secret_name);
    if docker_secret.exists() {
        match fs::read_to_string(&docker_secret).await {
            Ok(content) => {
                if let Ok(parsed) = T::from_str(content.trim()) {
                    return Ok(Some(parsed));
                }
            }
            Err(e) => {
                return Err(AppError::FileReadError(format!(
                    "Failed to read docker secret at {0}, {e}",
                    docker_secret.display()
                )));
            }
        }
    }

    // 2. Env var
    if let Some(env_key) = env_name
        && let Ok(val) = std::env::var(env_key)
        && let Ok(parsed) = T::from_str(val.trim())
    {
        return Ok(Some(parsed));
    }

    // 3. Fallback file path
    if let Some(path) = fallback_path
        && path.exists()
    {
        match fs::read_to_string(path).await {
            Ok(content) => {
                if let Ok(parsed) = T::from_str(content.trim()) {
                    return Ok(Some(parsed));
                }
            }
            Err(e) => {
                return Err(AppError::FileReadError(format!(
                    "Failed to read fallback file at {}, {}",
                    path.display(),
                    e
                )));
            }
        }
    }

    // 4. Final fallback
    Ok(fallback)
}
