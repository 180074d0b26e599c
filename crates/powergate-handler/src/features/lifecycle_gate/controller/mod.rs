use std::sync::Arc;
use std::time::Instant;

use powergate_core::{GateOutcome, InstanceState};
use serde::Serialize;
use tracing::{error, info};

use crate::features::lifecycle_gate::service::LifecycleGateService;
use crate::features::observability::controller::ObservabilityController;

/// Invocation response body. Serialized keys are the wire contract:
/// `previousState` when a transition was initiated, `currentState` when
/// none was needed, `error` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GateResponseBody {
    #[serde(rename_all = "camelCase")]
    Initiated {
        message: String,
        previous_state: InstanceState,
    },
    #[serde(rename_all = "camelCase")]
    NoTransition {
        message: String,
        current_state: InstanceState,
    },
    Failure { error: String },
}

impl GateResponseBody {
    /// Both success shapes serialize under 200; every failure is 500.
    pub fn status_code(&self) -> u16 {
        match self {
            GateResponseBody::Failure { .. } => 500,
            _ => 200,
        }
    }
}

/// Controller for the gate invocation endpoint.
/// Thin wrapper that delegates to the service and shapes the response.
pub struct GateController {
    service: Arc<LifecycleGateService>,
    observability: Arc<ObservabilityController>,
}

impl GateController {
    pub fn new(
        service: Arc<LifecycleGateService>,
        observability: Arc<ObservabilityController>,
    ) -> Self {
        Self {
            service,
            observability,
        }
    }

    /// Handle one invocation. The trigger payload carries nothing the
    /// gate uses and is dropped at the boundary.
    pub async fn invoke(&self) -> GateResponseBody {
        let action = self.service.action();
        info!(action = %action, "Received gate invocation");
        let started = Instant::now();

        let (outcome_label, body) = match self.service.evaluate().await {
            Ok(report) => {
                let label = report.outcome.as_str();
                let body = match report.outcome {
                    GateOutcome::Initiated => GateResponseBody::Initiated {
                        message: report.message,
                        previous_state: report.state,
                    },
                    GateOutcome::AlreadyInState => GateResponseBody::NoTransition {
                        message: report.message,
                        current_state: report.state,
                    },
                };
                (label, body)
            }
            Err(err) => {
                error!(action = %action, error = %err, "Gate evaluation failed");
                let body = GateResponseBody::Failure {
                    error: format!("Failed to {} instance: {}", action.verb(), err),
                };
                ("error", body)
            }
        };

        self.observability.record_invocation(
            action.verb(),
            outcome_label,
            started.elapsed().as_secs_f64(),
        );

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powergate_compute::InMemoryCompute;
    use powergate_core::LifecycleAction;

    use crate::features::observability::repo::ObservabilityRepository;
    use crate::features::observability::service::ObservabilityService;

    fn observability() -> Arc<ObservabilityController> {
        let repo = Arc::new(ObservabilityRepository::new().unwrap());
        Arc::new(ObservabilityController::new(ObservabilityService::new(repo)))
    }

    fn controller(
        action: LifecycleAction,
        instance_id: &str,
        compute: Arc<InMemoryCompute>,
    ) -> GateController {
        let service = Arc::new(LifecycleGateService::new(action, instance_id, compute));
        GateController::new(service, observability())
    }

    #[tokio::test]
    async fn test_initiated_body_uses_previous_state_key() {
        let compute = Arc::new(InMemoryCompute::with_instance(
            "i-0abc",
            powergate_core::InstanceState::Stopped,
        ));

        let body = controller(LifecycleAction::Start, "i-0abc", compute)
            .invoke()
            .await;

        assert_eq!(body.status_code(), 200);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["previousState"], "stopped");
        assert_eq!(
            json["message"],
            "Successfully initiated start for instance i-0abc"
        );
        assert!(json.get("currentState").is_none());
    }

    #[tokio::test]
    async fn test_no_transition_body_uses_current_state_key() {
        let compute = Arc::new(InMemoryCompute::with_instance(
            "i-0abc",
            powergate_core::InstanceState::Pending,
        ));

        let body = controller(LifecycleAction::Start, "i-0abc", compute)
            .invoke()
            .await;

        assert_eq!(body.status_code(), 200);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["currentState"], "pending");
        assert_eq!(json["message"], "Instance i-0abc is already in state: pending");
        assert!(json.get("previousState").is_none());
    }

    #[tokio::test]
    async fn test_failure_body_carries_error_text() {
        let compute = Arc::new(InMemoryCompute::new());

        let body = controller(LifecycleAction::Stop, "i-0abc", compute)
            .invoke()
            .await;

        assert_eq!(body.status_code(), 500);
        let json = serde_json::to_value(&body).unwrap();
        let error = json["error"].as_str().unwrap();
        assert!(error.starts_with("Failed to stop instance:"));
        assert!(error.contains("i-0abc not found"));
    }

    #[tokio::test]
    async fn test_missing_instance_id_reported_as_failure() {
        let compute = Arc::new(InMemoryCompute::new());

        let body = controller(LifecycleAction::Start, "", compute).invoke().await;

        assert_eq!(body.status_code(), 500);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("no target instance id is configured"));
    }
}
