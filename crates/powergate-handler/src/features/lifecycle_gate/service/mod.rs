use std::sync::Arc;

use powergate_compute::ComputeControl;
use powergate_core::{LifecycleAction, TransitionReport};
use tracing::info;

use crate::shared::error::{GateError, GateResult};

/// Conditional state-transition gate for a single managed instance.
///
/// Stateless across invocations: each `evaluate` observes the provider
/// state fresh and issues at most one provider call. Observation and
/// action are not atomic, so overlapping invocations can both observe
/// the precondition state and issue the same provider call; nothing
/// here coordinates them.
pub struct LifecycleGateService {
    action: LifecycleAction,
    instance_id: String,
    compute: Arc<dyn ComputeControl>,
}

impl LifecycleGateService {
    pub fn new(
        action: LifecycleAction,
        instance_id: impl Into<String>,
        compute: Arc<dyn ComputeControl>,
    ) -> Self {
        Self {
            action,
            instance_id: instance_id.into(),
            compute,
        }
    }

    pub fn action(&self) -> LifecycleAction {
        self.action
    }

    /// Run one gate evaluation: observe, compare, conditionally act.
    ///
    /// Fire-and-forget with respect to the remote transition; the report
    /// says the call was issued, not that it completed.
    pub async fn evaluate(&self) -> GateResult<TransitionReport> {
        if self.instance_id.is_empty() {
            return Err(GateError::MissingInstanceId);
        }

        let current = self
            .compute
            .describe_state(&self.instance_id)
            .await
            .map_err(|source| GateError::Describe {
                instance_id: self.instance_id.clone(),
                source,
            })?;

        info!(instance_id = %self.instance_id, state = %current, "Observed instance state");

        if current != self.action.required_state() {
            info!(instance_id = %self.instance_id, state = %current, "No transition needed");
            return Ok(TransitionReport::already_in_state(&self.instance_id, current));
        }

        self.compute
            .apply_action(&self.instance_id, self.action)
            .await
            .map_err(|source| GateError::Apply {
                instance_id: self.instance_id.clone(),
                action: self.action,
                source,
            })?;

        info!(instance_id = %self.instance_id, action = %self.action, "Initiated instance transition");

        Ok(TransitionReport::initiated(
            self.action,
            &self.instance_id,
            current,
        ))
    }
}
