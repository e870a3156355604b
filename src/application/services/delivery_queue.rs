use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::{
    sync::{Notify, watch},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::debug;

use crate::{
    application::services::{
        log_sink::LogSink,
        webhook::{SendOutcome, WebhookSender},
    },
    domain::models::{LogLevel, QueuedMessage, SinkKind},
};

#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Total send attempts a message gets before it is dropped.
    pub max_retries: u32,
    /// How often pending messages are re-checked without a wake-up.
    pub poll_interval: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// In-memory retry queue for Discord messages that were rate limited.
///
/// A single background task drains the queue, so sends are never concurrent
/// and each ready message gets exactly one attempt per pass. Pending messages
/// are lost when the process exits.
pub struct DiscordQueue {
    state: Arc<QueueState>,
    shutdown: watch::Sender<bool>,
}

struct QueueState {
    messages: Mutex<Vec<QueuedMessage>>,
    wake: Notify,
    sender: Arc<dyn WebhookSender>,
    log: Arc<dyn LogSink>,
    config: QueueConfig,
}

impl DiscordQueue {
    pub fn new(sender: Arc<dyn WebhookSender>, log: Arc<dyn LogSink>, config: QueueConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            state: Arc::new(QueueState {
                messages: Mutex::new(Vec::new()),
                wake: Notify::new(),
                sender,
                log,
                config,
            }),
            shutdown,
        }
    }

    /// Spawns the background drain task.
    pub fn start(&self) -> JoinHandle<()> {
        let state = self.state.clone();
        let shutdown = self.shutdown.subscribe();
        tokio::spawn(async move {
            state.run(shutdown).await;
            debug!("discord queue worker stopped");
        })
    }

    /// Queues `message` and wakes the worker. Never waits on a send.
    pub fn add(&self, message: QueuedMessage) {
        self.state.add(message);
    }

    pub fn queue_size(&self) -> usize {
        self.state.lock().len()
    }

    /// Prevents further drain passes. A pass already running finishes.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }
}

impl QueueState {
    fn lock(&self) -> MutexGuard<'_, Vec<QueuedMessage>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add(&self, message: QueuedMessage) {
        let count = {
            let mut messages = self.lock();
            messages.push(message);
            messages.len()
        };

        self.log.log(
            LogLevel::Info,
            &format!("Message queued for Discord retry (queue size: {count})"),
        );

        // Holds at most one permit, so a burst of adds coalesces into one pass.
        self.wake.notify_one();
    }

    async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                // The `Ref` from `wait_for` is a lock guard; drop it before the branch ends.
                _ = async { let _ = shutdown.wait_for(|stopped| *stopped).await; } => break,
                _ = self.wake.notified() => self.drain().await,
                _ = ticker.tick() => self.drain().await,
            }
        }
    }

    async fn drain(&self) {
        let ready = {
            let mut messages = self.lock();
            if messages.is_empty() {
                return;
            }
            let now = Utc::now();
            let (ready, pending): (Vec<_>, Vec<_>) =
                messages.drain(..).partition(|message| message.is_ready(now));
            *messages = pending;
            ready
        };

        debug!(
            ready = ready.len(),
            ids = ?ready.iter().map(|message| message.id).collect::<Vec<_>>(),
            "draining discord queue"
        );

        let mut retries = Vec::new();
        for message in ready {
            if let Some(retry) = self.attempt(message).await {
                retries.push(retry);
            }
        }

        for retry in retries {
            self.add(retry);
        }
    }

    /// Sends one queued message; returns it again when it should be retried.
    async fn attempt(&self, mut message: QueuedMessage) -> Option<QueuedMessage> {
        let max_retries = self.config.max_retries;
        let result = self
            .sender
            .send(&message.webhook_url, &message.sender, &message.message)
            .await;
        debug!(
            id = %message.id,
            attempt = message.attempts + 1,
            ok = result.is_ok(),
            "queued discord attempt finished"
        );

        let error = match result {
            Ok(SendOutcome::Delivered) => {
                self.log.log(
                    LogLevel::Info,
                    &format!(
                        "Queued message sent to Discord successfully (attempt {})",
                        message.attempts + 1
                    ),
                );
                return None;
            }
            Ok(SendOutcome::RateLimited { retry_after }) => {
                message.attempts += 1;
                if message.attempts < max_retries {
                    message.retry_at = Some(retry_time(Utc::now(), retry_after));
                    self.log.log(
                        LogLevel::Info,
                        &format!(
                            "Discord rate limited, will retry in {retry_after:?} (attempt {}/{max_retries})",
                            message.attempts
                        ),
                    );
                    return Some(message);
                }
                "rate limited by Discord".to_string()
            }
            Err(err) => {
                message.attempts += 1;
                err.to_string()
            }
        };

        if message.attempts >= max_retries {
            self.log.log(
                LogLevel::Error,
                &format!(
                    "Discord send failed after {} attempts: {error}",
                    message.attempts
                ),
            );
            self.log.record_failure(
                &message.sender,
                &message.message,
                SinkKind::Discord,
                &format!("max retries exceeded: {error}"),
            );
        } else {
            self.log
                .log(LogLevel::Error, &format!("Discord send failed: {error}"));
            self.log
                .record_failure(&message.sender, &message.message, SinkKind::Discord, &error);
        }

        None
    }
}

/// `now + wait`, saturating instead of overflowing on absurd advisories.
pub fn retry_time(now: DateTime<Utc>, wait: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(wait)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
