use powergate_core::{LifecycleAction, ParseActionError};
use std::net::SocketAddr;
use thiserror::Error;
use tracing::warn;

/// Deployment configuration, read from the environment once at startup
/// and passed into the gate explicitly.
///
/// The action is fixed per deployment; a start gate and a stop gate are
/// two deployments of the same binary.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Target instance id. May be empty when the deployment is
    /// misconfigured; the gate then reports a configuration error per
    /// invocation instead of refusing to boot.
    pub instance_id: String,
    pub action: LifecycleAction,
    pub bind_addr: SocketAddr,
    pub compute_api_url: String,
    pub compute_api_token: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("POWERGATE_ACTION: {0}")]
    Action(#[from] ParseActionError),
    #[error("POWERGATE_BIND_ADDR: {0}")]
    BindAddr(#[from] std::net::AddrParseError),
}

impl GateConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let instance_id = std::env::var("POWERGATE_INSTANCE_ID").unwrap_or_else(|_| {
            warn!("POWERGATE_INSTANCE_ID is not set; every invocation will report a configuration error");
            String::new()
        });
        let action = std::env::var("POWERGATE_ACTION")
            .unwrap_or_else(|_| "start".to_string())
            .parse::<LifecycleAction>()?;
        let bind_addr = std::env::var("POWERGATE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse::<SocketAddr>()?;
        let compute_api_url =
            std::env::var("COMPUTE_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8600".to_string());
        let compute_api_token = std::env::var("COMPUTE_API_TOKEN").ok();

        Ok(Self {
            instance_id,
            action,
            bind_addr,
            compute_api_url,
            compute_api_token,
        })
    }
}
