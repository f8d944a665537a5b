use crate::interface::notification_sink::NotificationSink;

/// Emits notifications as log events on the `notification` target, where a
/// subscriber layer can forward them.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn dispatch(&self, subject: &str, message: &str) {
        tracing::info!(target: "notification", subject, "{}", message);
    }
}
