use std::sync::Arc;

use poem_openapi::{OpenApi, param::Query, payload::Json};

use crate::{
    application::services::log_sink::LogSink,
    domain::models::{ChatMessage, LogLevel},
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        responses::ManifestResponseDto,
    },
};

#[derive(Clone)]
pub struct MessagesEndpoints {
    state: Arc<ApiState>,
}

impl MessagesEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }

    async fn ingest(
        &self,
        sender: Option<String>,
        message: Option<String>,
    ) -> Json<ManifestResponseDto> {
        match ChatMessage::from_params(sender, message) {
            Some(message) => self.state.dispatcher.handle(message).await,
            None => self
                .state
                .event_log
                .log(LogLevel::Debug, "Ignoring request without sender or message"),
        }

        Json(ManifestResponseDto::empty())
    }
}

/// The game client sends chat lines as query parameters and only accepts a
/// launcher manifest in reply, whatever happened to the message.
#[OpenApi]
impl MessagesEndpoints {
    #[oai(path = "/message", method = "get", tag = EndpointsTags::Ingestion)]
    pub async fn receive_message(
        &self,
        sender: Query<Option<String>>,
        message: Query<Option<String>>,
    ) -> Json<ManifestResponseDto> {
        self.ingest(sender.0, message.0).await
    }

    #[oai(path = "/message", method = "post", tag = EndpointsTags::Ingestion)]
    pub async fn post_message(
        &self,
        sender: Query<Option<String>>,
        message: Query<Option<String>>,
    ) -> Json<ManifestResponseDto> {
        self.ingest(sender.0, message.0).await
    }
}
