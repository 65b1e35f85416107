use tracing::error;

/// Blocking user-visible alert seam.
///
/// Configuration and transport failures that must interrupt the user go
/// through here; the page renders them as a modal alert.
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// Default sink: the alert lands in the log; the HTTP layer carries the
/// same message to the page in its error response.
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn alert(&self, message: &str) {
        error!("ALERT: {}", message);
    }
}
