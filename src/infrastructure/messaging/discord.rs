use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use reqwest::{
    Client, StatusCode,
    header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER},
};
use serde::Serialize;
use tracing::debug;

use crate::{
    application::services::webhook::{SendOutcome, WebhookSender},
    domain::{chunking::chunk_for_discord, errors::DeliveryError, models::SinkKind},
};

const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct DiscordClientConfig {
    /// Timeout of each individual POST.
    pub request_timeout: Duration,
    /// Deadline for delivering every chunk of one message.
    pub deadline: Duration,
}

impl Default for DiscordClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            deadline: Duration::from_secs(30),
        }
    }
}

pub struct DiscordWebhookClient {
    http: Client,
    deadline: Duration,
}

impl DiscordWebhookClient {
    pub fn new(config: DiscordClientConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent("chatlog-relay/discord")
            .timeout(config.request_timeout)
            .build()
            .context("failed to build discord client")?;

        Ok(Self {
            http,
            deadline: config.deadline,
        })
    }

    async fn post_chunks(
        &self,
        webhook_url: &str,
        chunks: &[String],
    ) -> Result<SendOutcome, DeliveryError> {
        for (index, chunk) in chunks.iter().enumerate() {
            let body = serde_json::to_vec(&WebhookPayload { content: chunk }).map_err(|source| {
                DeliveryError::Encode {
                    sink: SinkKind::Discord,
                    source,
                }
            })?;

            let response = self
                .http
                .post(webhook_url)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .map_err(|source| DeliveryError::Transport {
                    sink: SinkKind::Discord,
                    source,
                })?;

            let status = response.status();
            debug!(
                chunk = index + 1,
                total = chunks.len(),
                status = status.as_u16(),
                "discord chunk response"
            );

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Ok(SendOutcome::RateLimited {
                    retry_after: retry_after(response.headers()),
                });
            }

            if status != StatusCode::NO_CONTENT {
                return Err(DeliveryError::UnexpectedStatus {
                    sink: SinkKind::Discord,
                    status: status.as_u16(),
                });
            }
        }

        Ok(SendOutcome::Delivered)
    }
}

#[async_trait]
impl WebhookSender for DiscordWebhookClient {
    async fn send(
        &self,
        webhook_url: &str,
        sender: &str,
        message: &str,
    ) -> Result<SendOutcome, DeliveryError> {
        let header = format_header(sender, Local::now());
        let chunks = chunk_for_discord(&header, message);
        debug!(
            chunks = chunks.len(),
            message_len = message.chars().count(),
            "sending message to discord"
        );

        let outcome = tokio::time::timeout(self.deadline, self.post_chunks(webhook_url, &chunks))
            .await
            .map_err(|_| DeliveryError::Timeout {
                sink: SinkKind::Discord,
                timeout: self.deadline,
            })??;

        if outcome.is_rate_limited() {
            debug!(
                retry_after_ms = outcome.retry_after().as_millis() as u64,
                "discord throttled the webhook"
            );
        }
        Ok(outcome)
    }
}

/// Bold `[HH:MM:SS] sender:` line that starts every chunk.
pub fn format_header(sender: &str, sent_at: DateTime<Local>) -> String {
    format!("**[{}] {}:** \n", sent_at.format("%H:%M:%S"), sender)
}

/// Reads Discord's advisory wait, in fractional seconds, truncated to millis.
fn retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
        .map(|seconds| Duration::from_millis((seconds * 1000.0) as u64))
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}
