use medinfo_web::config::{get_configuration, SERVICE_NAME};
use medinfo_web::services::init_metrics;
use medinfo_web::startup::Application;
use service_core::observability::{init_tracing, TracingOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(&TracingOptions {
        service_name: SERVICE_NAME.to_string(),
        log_level: configuration.telemetry.log_level.clone(),
        otlp_endpoint: configuration.telemetry.otlp_endpoint.clone(),
    })
    .map_err(|e| anyhow::anyhow!("Tracing initialization failed: {}", e))?;

    init_metrics()?;

    let application = Application::build(configuration).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    application.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
