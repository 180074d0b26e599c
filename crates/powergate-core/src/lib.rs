use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Power state of a managed instance as reported by the provider.
///
/// The gate acts on exactly one state per action; everything else,
/// including the transitional states, results in a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Stopping,
    Stopped,
    Terminated,
}

impl InstanceState {
    pub const ALL: [InstanceState; 6] = [
        InstanceState::Pending,
        InstanceState::Running,
        InstanceState::ShuttingDown,
        InstanceState::Stopping,
        InstanceState::Stopped,
        InstanceState::Terminated,
    ];

    /// The provider's wire word for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceState::Pending => "pending",
            InstanceState::Running => "running",
            InstanceState::ShuttingDown => "shutting-down",
            InstanceState::Stopping => "stopping",
            InstanceState::Stopped => "stopped",
            InstanceState::Terminated => "terminated",
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle action a deployed gate is configured to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    Start,
    Stop,
}

impl LifecycleAction {
    /// The single observed state from which this action may be issued.
    pub fn required_state(self) -> InstanceState {
        match self {
            LifecycleAction::Start => InstanceState::Stopped,
            LifecycleAction::Stop => InstanceState::Running,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            LifecycleAction::Start => "start",
            LifecycleAction::Stop => "stop",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Debug, Error)]
#[error("unknown lifecycle action '{0}', expected 'start' or 'stop'")]
pub struct ParseActionError(String);

impl FromStr for LifecycleAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(LifecycleAction::Start),
            "stop" => Ok(LifecycleAction::Stop),
            _ => Err(ParseActionError(s.to_string())),
        }
    }
}

/// How a single gate evaluation resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// The precondition held and the provider call was issued.
    Initiated,
    /// Any other observed state, transitional states included.
    AlreadyInState,
}

impl GateOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateOutcome::Initiated => "initiated",
            GateOutcome::AlreadyInState => "already_in_state",
        }
    }
}

/// Result record for one gate invocation. Returned synchronously and
/// discarded; nothing outlives the invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionReport {
    pub outcome: GateOutcome,
    /// Previous state when the transition was initiated, the observed
    /// current state otherwise.
    pub state: InstanceState,
    pub message: String,
}

impl TransitionReport {
    pub fn initiated(action: LifecycleAction, instance_id: &str, previous: InstanceState) -> Self {
        Self {
            outcome: GateOutcome::Initiated,
            state: previous,
            message: format!(
                "Successfully initiated {} for instance {}",
                action.verb(),
                instance_id
            ),
        }
    }

    pub fn already_in_state(instance_id: &str, current: InstanceState) -> Self {
        Self {
            outcome: GateOutcome::AlreadyInState,
            state: current,
            message: format!("Instance {} is already in state: {}", instance_id, current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_required_state_lookup() {
        assert_eq!(
            LifecycleAction::Start.required_state(),
            InstanceState::Stopped
        );
        assert_eq!(
            LifecycleAction::Stop.required_state(),
            InstanceState::Running
        );
    }

    #[test]
    fn test_state_wire_words() {
        assert_tokens(
            &InstanceState::ShuttingDown,
            &[Token::UnitVariant {
                name: "InstanceState",
                variant: "shutting-down",
            }],
        );
        assert_tokens(
            &InstanceState::Stopped,
            &[Token::UnitVariant {
                name: "InstanceState",
                variant: "stopped",
            }],
        );
    }

    #[test]
    fn test_state_display_matches_wire_word() {
        for state in InstanceState::ALL {
            let wire = serde_json::to_value(state).unwrap();
            assert_eq!(wire, serde_json::Value::String(state.to_string()));
        }
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!(
            "start".parse::<LifecycleAction>().unwrap(),
            LifecycleAction::Start
        );
        assert_eq!(
            " Stop ".parse::<LifecycleAction>().unwrap(),
            LifecycleAction::Stop
        );

        let err = "restart".parse::<LifecycleAction>().unwrap_err();
        assert!(err.to_string().contains("restart"));
    }

    #[test]
    fn test_initiated_report_message() {
        let report =
            TransitionReport::initiated(LifecycleAction::Start, "i-0abc", InstanceState::Stopped);
        assert_eq!(report.outcome, GateOutcome::Initiated);
        assert_eq!(report.state, InstanceState::Stopped);
        assert_eq!(
            report.message,
            "Successfully initiated start for instance i-0abc"
        );
    }

    #[test]
    fn test_already_in_state_report_message() {
        let report = TransitionReport::already_in_state("i-0abc", InstanceState::Pending);
        assert_eq!(report.outcome, GateOutcome::AlreadyInState);
        assert_eq!(report.state, InstanceState::Pending);
        assert_eq!(report.message, "Instance i-0abc is already in state: pending");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(GateOutcome::Initiated.as_str(), "initiated");
        assert_eq!(GateOutcome::AlreadyInState.as_str(), "already_in_state");
    }
}
