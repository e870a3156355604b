use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::Serialize;
use tracing::debug;

use crate::{
    application::services::sinks::ChatForwarder,
    domain::{
        errors::DeliveryError,
        models::{ChatMessage, SinkKind},
    },
};

/// Relays chat messages as JSON to an arbitrary HTTP endpoint.
pub struct HttpForwarder {
    http: Client,
}

impl HttpForwarder {
    pub fn new(request_timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent("chatlog-relay/forward")
            .timeout(request_timeout)
            .build()
            .context("failed to build forward client")?;

        Ok(Self { http })
    }
}

#[async_trait]
impl ChatForwarder for HttpForwarder {
    async fn forward(
        &self,
        url: &str,
        message: &ChatMessage,
        scene: &str,
    ) -> Result<(), DeliveryError> {
        let payload = ForwardPayload {
            sender: &message.sender,
            message: &message.message,
            scene,
        };
        let body = serde_json::to_vec(&payload).map_err(|source| DeliveryError::Encode {
            sink: SinkKind::Forward,
            source,
        })?;

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|source| DeliveryError::Transport {
                sink: SinkKind::Forward,
                source,
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "forward target response");
        if !status.is_success() {
            return Err(DeliveryError::UnexpectedStatus {
                sink: SinkKind::Forward,
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ForwardPayload<'a> {
    sender: &'a str,
    message: &'a str,
    scene: &'a str,
}
