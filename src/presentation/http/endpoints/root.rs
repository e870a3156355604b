use std::sync::Arc;

use poem::Route;
use poem_openapi::{OpenApiService, Tags};

use crate::{
    application::{
        handlers::message_dispatcher::MessageDispatchHandler,
        services::{SharedSettings, delivery_queue::DiscordQueue},
        usecases::update_settings::UpdateSettingsUseCase,
    },
    infrastructure::logging::event_log::EventLog,
    presentation::http::endpoints::{
        health::HealthEndpoints, logs::LogsEndpoints, messages::MessagesEndpoints,
        settings::SettingsEndpoints,
    },
};

#[derive(Clone)]
pub struct ApiState {
    pub dispatcher: Arc<MessageDispatchHandler>,
    pub update_settings_usecase: Arc<UpdateSettingsUseCase>,
    pub settings: SharedSettings,
    pub event_log: Arc<EventLog>,
    pub queue: Arc<DiscordQueue>,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Ingestion,
    Logs,
    Settings,
}

/// Game-facing and operator routes plus the OpenAPI document and Swagger UI.
pub fn build_app(state: Arc<ApiState>, server_url: &str) -> Route {
    let api_service = OpenApiService::new(
        (
            HealthEndpoints,
            MessagesEndpoints::new(state.clone()),
            LogsEndpoints::new(state.clone()),
            SettingsEndpoints::new(state),
        ),
        "Chat Log Relay API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url);
    let ui = api_service.swagger_ui();
    let openapi_json = api_service.spec_endpoint();

    Route::new()
        .nest("/docs", ui)
        .at("/openapi.json", openapi_json)
        .nest("/", api_service)
}


#[cfg(test)]
mod tests {
    use super::testing::test_app;
    use crate::domain::models::AppSettings;

    #[tokio::test]
    async fn serves_the_openapi_document() {
        let app = test_app(AppSettings::default());

        let resp = app.client.get("/openapi.json").send().await;
        resp.assert_status_is_ok();
        let body: serde_json::Value = resp.0.into_body().into_json().await.expect("openapi document");
        assert!(body["paths"]["/message"].is_object());
        assert!(body["paths"]["/api/settings"].is_object());
    }
}
