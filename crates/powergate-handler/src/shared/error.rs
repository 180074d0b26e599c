use powergate_compute::ComputeError;
use powergate_core::LifecycleAction;
use thiserror::Error;

/// Failures a gate evaluation can surface.
///
/// All three are reported identically to the invoker as a 500 with the
/// error text; no transient/permanent distinction is made.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("no target instance id is configured")]
    MissingInstanceId,
    #[error("describe instance {instance_id} failed: {source}")]
    Describe {
        instance_id: String,
        source: ComputeError,
    },
    #[error("{action} instance {instance_id} failed: {source}")]
    Apply {
        instance_id: String,
        action: LifecycleAction,
        source: ComputeError,
    },
}

pub type GateResult<T> = std::result::Result<T, GateError>;
