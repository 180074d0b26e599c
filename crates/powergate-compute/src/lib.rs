pub mod http;
pub mod memory;

use async_trait::async_trait;
use powergate_core::{InstanceState, LifecycleAction};
use thiserror::Error;

pub use http::HttpComputeClient;
pub use memory::InMemoryCompute;

/// Errors surfaced by a compute control backend. Every failure is
/// reported as-is; retry and classification are left to the caller's
/// operator.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("instance {0} not found")]
    InstanceNotFound(String),
    #[error("provider request failed with status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

pub type ComputeResult<T> = std::result::Result<T, ComputeError>;

/// Control-plane operations on a single instance.
///
/// `apply_action` is fire-and-forget: it reports whether the provider
/// accepted the call, not whether the transition completed.
#[async_trait]
pub trait ComputeControl: Send + Sync {
    /// Observe the instance's current power state.
    async fn describe_state(&self, instance_id: &str) -> ComputeResult<InstanceState>;

    /// Issue the start or stop call for the instance.
    async fn apply_action(&self, instance_id: &str, action: LifecycleAction) -> ComputeResult<()>;
}
