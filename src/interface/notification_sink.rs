/// Best-effort outbound notifications. Implementations must return without
/// waiting on delivery.
pub trait NotificationSink: Send + Sync {
    fn dispatch(&self, subject: &str, message: &str);
}
