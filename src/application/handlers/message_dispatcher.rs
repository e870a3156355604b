use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::{
    application::services::{
        SharedSettings,
        delivery_queue::{DiscordQueue, retry_time},
        log_sink::LogSink,
        sinks::{ChatArchive, ChatForwarder},
        webhook::{SendOutcome, WebhookSender},
    },
    domain::models::{AppSettings, ChatMessage, LogLevel, QueuedMessage, SinkKind},
};

/// Fans an incoming chat line out to every enabled sink.
pub struct MessageDispatchHandler {
    settings: SharedSettings,
    discord: Arc<dyn WebhookSender>,
    queue: Arc<DiscordQueue>,
    archive: Arc<dyn ChatArchive>,
    forwarder: Arc<dyn ChatForwarder>,
    log: Arc<dyn LogSink>,
}

impl MessageDispatchHandler {
    pub fn new(
        settings: SharedSettings,
        discord: Arc<dyn WebhookSender>,
        queue: Arc<DiscordQueue>,
        archive: Arc<dyn ChatArchive>,
        forwarder: Arc<dyn ChatForwarder>,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            settings,
            discord,
            queue,
            archive,
            forwarder,
            log,
        }
    }

    /// Sink failures are logged and recorded, never returned.
    pub async fn handle(&self, message: ChatMessage) {
        let settings = self.settings.read().await.clone();
        self.log.log(
            LogLevel::Debug,
            &format!("Received message from {}", message.sender),
        );

        if settings.enable_discord {
            self.send_to_discord(&settings, &message).await;
        }
        if settings.enable_local_save {
            self.save_to_file(&settings, &message).await;
        }
        if settings.enable_http_forward {
            self.forward(&settings, &message).await;
        }
    }

    async fn send_to_discord(&self, settings: &AppSettings, message: &ChatMessage) {
        let result = self
            .discord
            .send(&settings.webhook_url, &message.sender, &message.message)
            .await;

        match result {
            Ok(SendOutcome::Delivered) => {
                self.log
                    .log(LogLevel::Debug, "Message sent to Discord successfully");
            }
            Ok(SendOutcome::RateLimited { retry_after }) => {
                let mut queued = QueuedMessage::new(
                    settings.webhook_url.clone(),
                    message.sender.clone(),
                    message.message.clone(),
                );
                // The attempt just made counts toward the retry budget.
                queued.attempts = 1;
                queued.retry_at = Some(retry_time(Utc::now(), retry_after));

                self.log.log(
                    LogLevel::Warning,
                    &format!("Discord rate limited, queuing message (retry in {retry_after:?})"),
                );
                debug!(id = %queued.id, "handing rate-limited message to the retry queue");
                self.queue.add(queued);
            }
            Err(err) => {
                self.log
                    .log(LogLevel::Error, &format!("Failed to send to Discord: {err}"));
                self.log.record_failure(
                    &message.sender,
                    &message.message,
                    SinkKind::Discord,
                    &err.to_string(),
                );
            }
        }
    }

    async fn save_to_file(&self, settings: &AppSettings, message: &ChatMessage) {
        match self
            .archive
            .archive(&settings.path, settings.file_format, message)
            .await
        {
            Ok(()) => self.log.log(
                LogLevel::Debug,
                &format!("Message logged to {} file", settings.file_format.as_str()),
            ),
            Err(err) => {
                self.log
                    .log(LogLevel::Error, &format!("Failed to save to file: {err}"));
                self.log.record_failure(
                    &message.sender,
                    &message.message,
                    SinkKind::File,
                    &err.to_string(),
                );
            }
        }
    }

    async fn forward(&self, settings: &AppSettings, message: &ChatMessage) {
        match self
            .forwarder
            .forward(&settings.forward_url, message, &settings.forward_scene)
            .await
        {
            Ok(()) => self
                .log
                .log(LogLevel::Debug, "Message forwarded via HTTP successfully"),
            Err(err) => {
                self.log
                    .log(LogLevel::Error, &format!("Failed to forward via HTTP: {err}"));
                self.log.record_failure(
                    &message.sender,
                    &message.message,
                    SinkKind::Forward,
                    &err.to_string(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tempfile::TempDir;
    use tokio::sync::RwLock;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;
    use crate::{
        application::services::delivery_queue::QueueConfig,
        domain::{errors::DeliveryError, models::FileFormat},
        infrastructure::{
            logging::event_log::EventLog, messaging::forward::HttpForwarder,
            storage::file_log::FileLogSink,
        },
    };

    struct FixedSender {
        outcome: fn() -> Result<SendOutcome, DeliveryError>,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl FixedSender {
        fn new(outcome: fn() -> Result<SendOutcome, DeliveryError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl WebhookSender for FixedSender {
        async fn send(
            &self,
            _webhook_url: &str,
            sender: &str,
            message: &str,
        ) -> Result<SendOutcome, DeliveryError> {
            self.sent
                .lock()
                .expect("sent lock")
                .push((sender.to_string(), message.to_string()));
            (self.outcome)()
        }
    }

    struct Harness {
        handler: MessageDispatchHandler,
        queue: Arc<DiscordQueue>,
        log: Arc<EventLog>,
    }

    fn harness(settings: AppSettings, sender: Arc<FixedSender>) -> Harness {
        let log = Arc::new(EventLog::new(true));
        let queue = Arc::new(DiscordQueue::new(
            sender.clone(),
            log.clone(),
            QueueConfig::default(),
        ));
        let handler = MessageDispatchHandler::new(
            Arc::new(RwLock::new(settings)),
            sender,
            queue.clone(),
            Arc::new(FileLogSink::new()),
            Arc::new(HttpForwarder::new(Duration::from_secs(5)).expect("client builds")),
            log.clone(),
        );
        Harness {
            handler,
            queue,
            log,
        }
    }

    fn chat() -> ChatMessage {
        ChatMessage {
            sender: "Bob".into(),
            message: "hello".into(),
        }
    }

    fn delivered() -> Result<SendOutcome, DeliveryError> {
        Ok(SendOutcome::Delivered)
    }

    fn throttled() -> Result<SendOutcome, DeliveryError> {
        Ok(SendOutcome::RateLimited {
            retry_after: Duration::from_secs(2),
        })
    }

    fn rejected() -> Result<SendOutcome, DeliveryError> {
        Err(DeliveryError::UnexpectedStatus {
            sink: SinkKind::Discord,
            status: 401,
        })
    }

    #[tokio::test]
    async fn disabled_sinks_are_skipped() {
        let sender = FixedSender::new(delivered);
        let harness = harness(AppSettings::default(), sender.clone());

        harness.handler.handle(chat()).await;

        assert!(sender.sent.lock().expect("sent lock").is_empty());
        assert!(harness.log.failures().is_empty());
    }

    #[tokio::test]
    async fn rate_limited_first_attempt_is_queued() {
        let sender = FixedSender::new(throttled);
        let settings = AppSettings {
            enable_discord: true,
            webhook_url: "http://hook".into(),
            ..AppSettings::default()
        };
        let harness = harness(settings, sender.clone());

        harness.handler.handle(chat()).await;

        assert_eq!(sender.sent.lock().expect("sent lock").len(), 1);
        assert_eq!(harness.queue.queue_size(), 1);
        assert!(harness.log.failures().is_empty());
    }

    #[tokio::test]
    async fn hard_discord_failure_is_recorded_not_queued() {
        let sender = FixedSender::new(rejected);
        let settings = AppSettings {
            enable_discord: true,
            webhook_url: "http://hook".into(),
            ..AppSettings::default()
        };
        let harness = harness(settings, sender);

        harness.handler.handle(chat()).await;

        assert_eq!(harness.queue.queue_size(), 0);
        let failures = harness.log.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].sink, SinkKind::Discord);
        assert_eq!(failures[0].error, "discord target returned status code: 401");
    }

    #[tokio::test]
    async fn every_enabled_sink_gets_the_message() {
        let dir = TempDir::new().expect("temp dir");
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/relay"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let sender = FixedSender::new(delivered);
        let settings = AppSettings {
            enable_discord: true,
            webhook_url: "http://hook".into(),
            enable_local_save: true,
            path: dir.path().to_string_lossy().to_string(),
            file_format: FileFormat::Txt,
            enable_http_forward: true,
            forward_url: format!("{}/relay", server.uri()),
            forward_scene: "tavern".into(),
            ..AppSettings::default()
        };
        let harness = harness(settings, sender.clone());

        harness.handler.handle(chat()).await;

        assert_eq!(
            *sender.sent.lock().expect("sent lock"),
            vec![("Bob".to_string(), "hello".to_string())]
        );
        let files: Vec<_> = std::fs::read_dir(dir.path())
            .expect("list dir")
            .collect::<Result<_, _>>()
            .expect("dir entries");
        assert_eq!(files.len(), 1);
        assert!(harness.log.failures().is_empty());
        server.verify().await;
    }

    #[tokio::test]
    async fn one_failing_sink_does_not_stop_the_others() {
        let dir = TempDir::new().expect("temp dir");
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let sender = FixedSender::new(rejected);
        let settings = AppSettings {
            enable_discord: true,
            webhook_url: "http://hook".into(),
            enable_local_save: true,
            path: dir.path().to_string_lossy().to_string(),
            enable_http_forward: true,
            forward_url: server.uri(),
            ..AppSettings::default()
        };
        let harness = harness(settings, sender);

        harness.handler.handle(chat()).await;

        let sinks: Vec<_> = harness
            .log
            .failures()
            .iter()
            .map(|failure| failure.sink)
            .collect();
        assert_eq!(sinks, vec![SinkKind::Discord, SinkKind::Forward]);
        assert_eq!(std::fs::read_dir(dir.path()).expect("list dir").count(), 1);
        assert!(harness
            .log
            .history()
            .iter()
            .any(|line| line.message == "Message logged to txt file"));
    }
}
