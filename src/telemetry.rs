use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Initialize structured JSON logging.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_telemetry(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init()?;

    tracing::debug!("Intake workflow telemetry initialized with structured logging");
    Ok(())
}

/// Generate a correlation ID for linking the events of one request
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span every workflow operation of a single request logs under
pub fn create_request_span(principal_id: &str, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "intake_request",
        principal.id = principal_id,
        correlation.id = correlation_id,
        otel.kind = "internal"
    )
}
