use async_trait::async_trait;

use crate::domain::{
    errors::DeliveryError,
    models::{ChatMessage, FileFormat},
};

/// Local chat archive, one file per day under `dir`.
#[async_trait]
pub trait ChatArchive: Send + Sync {
    async fn archive(
        &self,
        dir: &str,
        format: FileFormat,
        message: &ChatMessage,
    ) -> Result<(), DeliveryError>;
}

/// Relays chat messages to a third-party HTTP endpoint.
#[async_trait]
pub trait ChatForwarder: Send + Sync {
    async fn forward(
        &self,
        url: &str,
        message: &ChatMessage,
        scene: &str,
    ) -> Result<(), DeliveryError>;
}
