use async_trait::async_trait;
use powergate_core::{InstanceState, LifecycleAction};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{ComputeControl, ComputeError, ComputeResult};

/// In-memory stand-in for a provider control plane, for local runs and
/// tests.
///
/// Holds a state per instance id and records every action issued so
/// callers can assert on the exact provider calls. Applying an action
/// moves the instance into the matching transitional state, the way a
/// real provider reports `pending`/`stopping` before a transition
/// settles.
#[derive(Clone, Default)]
pub struct InMemoryCompute {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    states: HashMap<String, InstanceState>,
    issued: Vec<(String, LifecycleAction)>,
}

impl InMemoryCompute {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(instance_id: impl Into<String>, state: InstanceState) -> Self {
        let compute = Self::new();
        compute.set_state(instance_id, state);
        compute
    }

    pub fn set_state(&self, instance_id: impl Into<String>, state: InstanceState) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.states.insert(instance_id.into(), state);
    }

    /// Every action issued through this backend, in order.
    pub fn issued_actions(&self) -> Vec<(String, LifecycleAction)> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .issued
            .clone()
    }
}

#[async_trait]
impl ComputeControl for InMemoryCompute {
    async fn describe_state(&self, instance_id: &str) -> ComputeResult<InstanceState> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ComputeError::Transport("state lock poisoned".to_string()))?;
        inner
            .states
            .get(instance_id)
            .copied()
            .ok_or_else(|| ComputeError::InstanceNotFound(instance_id.to_string()))
    }

    async fn apply_action(&self, instance_id: &str, action: LifecycleAction) -> ComputeResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ComputeError::Transport("state lock poisoned".to_string()))?;

        if !inner.states.contains_key(instance_id) {
            return Err(ComputeError::InstanceNotFound(instance_id.to_string()));
        }

        let next = match action {
            LifecycleAction::Start => InstanceState::Pending,
            LifecycleAction::Stop => InstanceState::Stopping,
        };
        inner.states.insert(instance_id.to_string(), next);
        inner.issued.push((instance_id.to_string(), action));

        Ok(())
    }
}
