use std::sync::Arc;

use futures::{StreamExt, stream::BoxStream};
use poem_openapi::{
    OpenApi,
    payload::{EventStream, Json},
};
use tokio_stream::wrappers::BroadcastStream;

use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags},
    mappers::{map_failure, map_line},
    responses::{FailureDto, LogLineDto, QueueStatusDto},
};

#[derive(Clone)]
pub struct LogsEndpoints {
    state: Arc<ApiState>,
}

impl LogsEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl LogsEndpoints {
    /// Recent log lines, oldest first.
    #[oai(path = "/api/logs", method = "get", tag = EndpointsTags::Logs)]
    pub async fn list_logs(&self) -> Json<Vec<LogLineDto>> {
        Json(self.state.event_log.history().iter().map(map_line).collect())
    }

    /// Live log lines as server-sent events.
    #[oai(path = "/api/logs/stream", method = "get", tag = EndpointsTags::Logs)]
    pub async fn stream_logs(&self) -> EventStream<BoxStream<'static, LogLineDto>> {
        // Lagging subscribers skip what they missed.
        let stream = BroadcastStream::new(self.state.event_log.subscribe_lines())
            .filter_map(|line| async move { line.ok().map(|line| map_line(&line)) });
        EventStream::new(stream.boxed())
    }

    /// Recent delivery failures, oldest first.
    #[oai(path = "/api/failures", method = "get", tag = EndpointsTags::Logs)]
    pub async fn list_failures(&self) -> Json<Vec<FailureDto>> {
        Json(self.state.event_log.failures().iter().map(map_failure).collect())
    }

    #[oai(path = "/api/failures/stream", method = "get", tag = EndpointsTags::Logs)]
    pub async fn stream_failures(&self) -> EventStream<BoxStream<'static, FailureDto>> {
        let stream = BroadcastStream::new(self.state.event_log.subscribe_failures())
            .filter_map(|entry| async move { entry.ok().map(|entry| map_failure(&entry)) });
        EventStream::new(stream.boxed())
    }

    /// Messages waiting in the Discord retry queue.
    #[oai(path = "/api/queue", method = "get", tag = EndpointsTags::Logs)]
    pub async fn queue_status(&self) -> Json<QueueStatusDto> {
        Json(QueueStatusDto {
            pending: u32::try_from(self.state.queue.queue_size()).unwrap_or(u32::MAX),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{
        application::services::log_sink::LogSink,
        domain::models::{AppSettings, LogLevel, QueuedMessage, SinkKind},
        presentation::http::endpoints::root::testing::test_app,
    };

    #[tokio::test]
    async fn lists_history_and_failures() {
        let app = test_app(AppSettings::default());
        app.state.event_log.log(LogLevel::Info, "relay started");
        app.state
            .event_log
            .record_failure("Bob", "hello", SinkKind::Forward, "connection refused");

        let resp = app.client.get("/api/logs").send().await;
        resp.assert_status_is_ok();
        let lines: Value = resp.0.into_body().into_json().await.expect("json body");
        let last = lines
            .as_array()
            .and_then(|lines| lines.last())
            .expect("at least one line");
        assert_eq!(last["level"], "info");
        assert_eq!(last["message"], "relay started");

        let resp = app.client.get("/api/failures").send().await;
        resp.assert_status_is_ok();
        let failures: Value = resp.0.into_body().into_json().await.expect("json body");
        assert_eq!(failures[0]["sink"], "forward");
        assert_eq!(failures[0]["error"], "connection refused");
        assert!(
            failures[0]["text"]
                .as_str()
                .expect("rendered text")
                .ends_with("forward | Bob: hello | Error: connection refused")
        );
    }

    #[tokio::test]
    async fn reports_queue_size() {
        let app = test_app(AppSettings::default());
        app.state
            .queue
            .add(QueuedMessage::new("http://hook", "Bob", "hello"));

        let resp = app.client.get("/api/queue").send().await;
        resp.assert_status_is_ok();
        resp.assert_json(serde_json::json!({"pending": 1})).await;
    }

    #[tokio::test]
    async fn streams_are_event_streams() {
        let app = test_app(AppSettings::default());

        for uri in ["/api/logs/stream", "/api/failures/stream"] {
            let resp = app.client.get(uri).send().await;
            resp.assert_status_is_ok();
            resp.assert_content_type("text/event-stream");
        }
    }
}
