use crate::features::observability::repo::ObservabilityRepository;
use std::sync::Arc;

pub struct ObservabilityService {
    repo: Arc<ObservabilityRepository>,
}

impl ObservabilityService {
    pub fn new(repo: Arc<ObservabilityRepository>) -> Self {
        Self { repo }
    }

    pub fn record_invocation(&self, action: &str, outcome: &str, seconds: f64) {
        self.repo.inc_gate_invocation(action, outcome);
        self.repo.observe_gate_latency(action, seconds);
    }

    pub fn render_metrics(&self) -> Result<String, String> {
        self.repo.render_metrics()
    }
}
