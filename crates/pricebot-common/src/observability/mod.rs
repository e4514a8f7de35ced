pub mod resource;
pub mod tracing;

#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("Failed to install opentelemetry tracer: {0}")]
    Tracer(#[from] opentelemetry::trace::TraceError),
    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] ::tracing::subscriber::SetGlobalDefaultError),
}
