use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use super::subscriber::FilterHandle;
use crate::{
    application::services::log_sink::LogSink,
    domain::models::{FailureEntry, LogLevel, LogLine, SinkKind},
};

const HISTORY_LIMIT: usize = 500;
const FAILURE_LIMIT: usize = 100;
const CHANNEL_CAPACITY: usize = 256;

/// Operator event log: bounded history, live broadcast, mirrored to tracing.
pub struct EventLog {
    debug_mode: AtomicBool,
    history: Mutex<VecDeque<LogLine>>,
    failures: Mutex<VecDeque<FailureEntry>>,
    lines_tx: broadcast::Sender<LogLine>,
    failures_tx: broadcast::Sender<FailureEntry>,
    filter: Option<FilterHandle>,
}

impl EventLog {
    pub fn new(debug_mode: bool) -> Self {
        let (lines_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (failures_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            debug_mode: AtomicBool::new(debug_mode),
            history: Mutex::new(VecDeque::with_capacity(HISTORY_LIMIT)),
            failures: Mutex::new(VecDeque::with_capacity(FAILURE_LIMIT)),
            lines_tx,
            failures_tx,
            filter: None,
        }
    }

    /// Debug toggles also reload the process-wide tracing filter.
    pub fn with_filter_handle(mut self, handle: FilterHandle) -> Self {
        self.filter = Some(handle);
        self
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode.load(Ordering::Relaxed)
    }

    /// Oldest first.
    pub fn history(&self) -> Vec<LogLine> {
        lock(&self.history).iter().cloned().collect()
    }

    /// Oldest first.
    pub fn failures(&self) -> Vec<FailureEntry> {
        lock(&self.failures).iter().cloned().collect()
    }

    pub fn subscribe_lines(&self) -> broadcast::Receiver<LogLine> {
        self.lines_tx.subscribe()
    }

    pub fn subscribe_failures(&self) -> broadcast::Receiver<FailureEntry> {
        self.failures_tx.subscribe()
    }
}

impl LogSink for EventLog {
    fn log(&self, level: LogLevel, message: &str) {
        if level == LogLevel::Debug && !self.debug_mode() {
            return;
        }

        match level {
            LogLevel::Debug => debug!("{message}"),
            LogLevel::Info => info!("{message}"),
            LogLevel::Warning => warn!("{message}"),
            LogLevel::Error => error!("{message}"),
        }

        let line = LogLine {
            timestamp: clock(),
            level,
            message: message.to_string(),
        };
        push_bounded(&mut lock(&self.history), line.clone(), HISTORY_LIMIT);
        // No subscribers is not an error.
        let _ = self.lines_tx.send(line);
    }

    fn record_failure(&self, sender: &str, message: &str, sink: SinkKind, error: &str) {
        let entry = FailureEntry {
            timestamp: clock(),
            sender: sender.to_string(),
            message: message.to_string(),
            sink,
            error: error.to_string(),
        };
        warn!(%sink, sender, error, "delivery failure recorded");

        push_bounded(&mut lock(&self.failures), entry.clone(), FAILURE_LIMIT);
        let _ = self.failures_tx.send(entry);
    }

    fn set_debug_mode(&self, enabled: bool) {
        self.debug_mode.store(enabled, Ordering::Relaxed);
        if let Some(Err(err)) = self.filter.as_ref().map(|filter| filter.set_debug(enabled)) {
            warn!(error = %err, "tracing level unchanged");
        }
    }
}

fn clock() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn push_bounded<T>(buffer: &mut VecDeque<T>, item: T, limit: usize) {
    if buffer.len() == limit {
        buffer.pop_front();
    }
    buffer.push_back(item);
}
