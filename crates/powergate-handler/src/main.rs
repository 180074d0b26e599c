use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use powergate_compute::HttpComputeClient;
use powergate_handler::features::lifecycle_gate::controller::GateController;
use powergate_handler::features::lifecycle_gate::service::LifecycleGateService;
use powergate_handler::features::observability::controller::ObservabilityController;
use powergate_handler::features::observability::repo::ObservabilityRepository;
use powergate_handler::features::observability::service::ObservabilityService;
use powergate_handler::server::{router, AppState};
use powergate_handler::shared::config::GateConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("powergate_handler=info,info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = GateConfig::from_env()?;

    info!(
        action = %config.action,
        instance_id = %config.instance_id,
        compute_api_url = %config.compute_api_url,
        "Starting Powergate handler"
    );

    let compute = Arc::new(HttpComputeClient::new(
        config.compute_api_url.clone(),
        config.compute_api_token.clone(),
    )?);

    let observability_repo = Arc::new(ObservabilityRepository::new()?);
    let observability = Arc::new(ObservabilityController::new(ObservabilityService::new(
        observability_repo,
    )));

    let service = Arc::new(LifecycleGateService::new(
        config.action,
        config.instance_id.clone(),
        compute,
    ));
    let gate = Arc::new(GateController::new(service, observability.clone()));

    let app = router(AppState { gate, observability });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(bind_addr = %config.bind_addr, "Powergate handler listening");
    axum::serve(listener, app).await?;

    Ok(())
}
