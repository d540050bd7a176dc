use attendance_service::config::AttendanceConfig;
use attendance_service::services::init_metrics;
use attendance_service::startup::{Application, SERVICE_NAME};
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AttendanceConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_tracing(
        SERVICE_NAME,
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;

    // Must be installed before any metric is recorded
    init_metrics()?;

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    tracing::info!("Attendance service stopped");
    Ok(())
}
