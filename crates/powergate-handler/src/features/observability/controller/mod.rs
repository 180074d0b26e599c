use crate::features::observability::service::ObservabilityService;

pub struct ObservabilityController {
    service: ObservabilityService,
}

impl ObservabilityController {
    pub fn new(service: ObservabilityService) -> Self {
        Self { service }
    }

    pub fn record_invocation(&self, action: &str, outcome: &str, seconds: f64) {
        self.service.record_invocation(action, outcome, seconds);
    }

    pub fn render_metrics(&self) -> Result<String, String> {
        self.service.render_metrics()
    }
}
