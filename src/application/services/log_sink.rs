use crate::domain::models::{LogLevel, SinkKind};

/// Operator-facing event stream. Implementations must not block the caller.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    fn record_failure(&self, sender: &str, message: &str, sink: SinkKind, error: &str);

    /// Toggles whether debug-level lines are kept.
    fn set_debug_mode(&self, _enabled: bool) {}
}
