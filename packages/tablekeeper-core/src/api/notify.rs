/// Surfaces messages to the user.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);

    fn success(&self, _message: &str) {}
}

/// Routes messages into the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }

    fn success(&self, message: &str) {
        tracing::info!("{}", message);
    }
}
