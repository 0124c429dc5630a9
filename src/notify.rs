//! User-facing notifications

/// Displays warnings and errors to the user
pub trait NotificationSink: Send + Sync {
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Writes notifications to stderr and mirrors them into the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn warn(&self, message: &str) {
        tracing::warn!(notification = message, "warning shown to user");
        eprintln!("warning: {}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(notification = message, "error shown to user");
        eprintln!("error: {}", message);
    }
}
