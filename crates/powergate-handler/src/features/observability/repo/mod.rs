use prometheus::{opts, CounterVec, Encoder, HistogramOpts, HistogramVec, Registry, TextEncoder};

pub struct ObservabilityRepository {
    registry: Registry,
    gate_invocation_total: CounterVec,
    gate_latency_seconds: HistogramVec,
}

impl ObservabilityRepository {
    pub fn new() -> Result<Self, String> {
        let registry = Registry::new();

        let gate_invocation_total = CounterVec::new(
            opts!(
                "powergate_gate_invocation_total",
                "Gate invocations by action and outcome"
            ),
            &["action", "outcome"],
        )
        .map_err(|e| e.to_string())?;
        let gate_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "powergate_gate_latency_seconds",
                "Gate evaluation latency (seconds)"
            ),
            &["action"],
        )
        .map_err(|e| e.to_string())?;

        registry
            .register(Box::new(gate_invocation_total.clone()))
            .map_err(|e| e.to_string())?;
        registry
            .register(Box::new(gate_latency_seconds.clone()))
            .map_err(|e| e.to_string())?;

        Ok(Self {
            registry,
            gate_invocation_total,
            gate_latency_seconds,
        })
    }

    pub fn inc_gate_invocation(&self, action: &str, outcome: &str) {
        self.gate_invocation_total
            .with_label_values(&[action, outcome])
            .inc();
    }

    pub fn observe_gate_latency(&self, action: &str, seconds: f64) {
        self.gate_latency_seconds
            .with_label_values(&[action])
            .observe(seconds);
    }

    pub fn render_metrics(&self) -> Result<String, String> {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|e| e.to_string())?;
        String::from_utf8(buffer).map_err(|e| e.to_string())
    }
}
