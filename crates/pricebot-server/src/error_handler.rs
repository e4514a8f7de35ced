use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use teloxide::error_handlers::ErrorHandler;
use teloxide::RequestError;

/// Logs errors raised while polling or handling updates.
///
/// Network hiccups are expected during long polling and are retried by the listener itself, so they
/// are only logged at warn level. Nothing is surfaced to the chat.
#[derive(Debug, Default)]
pub struct UpdateErrorHandler;

impl UpdateErrorHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

pub fn is_transient(error: &RequestError) -> bool {
    matches!(
        error,
        RequestError::Network(_) | RequestError::RetryAfter(_) | RequestError::Io(_)
    )
}

fn log_request_error(error: &RequestError) {
    if is_transient(error) {
        log::warn!("Transient network error, polling will retry: {}", error);
    } else {
        log::error!("Telegram request failed: {:?}", error);
    }
}

impl ErrorHandler<RequestError> for UpdateErrorHandler {
    fn handle_error(self: Arc<Self>, error: RequestError) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>> {
        log_request_error(&error);
        Box::pin(async {})
    }
}

impl ErrorHandler<anyhow::Error> for UpdateErrorHandler {
    fn handle_error(self: Arc<Self>, error: anyhow::Error) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>> {
        match error.downcast_ref::<RequestError>() {
            Some(request_error) => log_request_error(request_error),
            None => log::error!("Error while handling update: {:?}", error),
        }
        Box::pin(async {})
    }
}

#[cfg(test)]
mod tests {
    use teloxide::ApiError;

    use super::*;

    #[test]
    fn io_errors_are_transient() {
        let error = RequestError::Io(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset").into());
        assert!(is_transient(&error));
    }

    #[test]
    fn api_errors_are_not_transient() {
        assert!(!is_transient(&RequestError::Api(ApiError::BotBlocked)));
    }

    #[tokio::test]
    async fn handles_errors_without_panicking() {
        let handler = UpdateErrorHandler::new();
        handler.clone().handle_error(RequestError::Api(ApiError::MessageNotModified)).await;
        handler.handle_error(anyhow::anyhow!("boom")).await;
    }
}
