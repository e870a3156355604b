use std::sync::Arc;

use poem::{Result as PoemResult, http::StatusCode};
use poem_openapi::{OpenApi, payload::Json};

use crate::{
    domain::errors::SettingsError,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        mappers::map_settings,
        requests::UpdateSettingsRequestDto,
        responses::SettingsDto,
    },
};

#[derive(Clone)]
pub struct SettingsEndpoints {
    state: Arc<ApiState>,
}

impl SettingsEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl SettingsEndpoints {
    #[oai(path = "/api/settings", method = "get", tag = EndpointsTags::Settings)]
    pub async fn get_settings(&self) -> Json<SettingsDto> {
        let settings = self.state.settings.read().await;
        Json(map_settings(&settings))
    }

    /// Replaces the settings. A new listen address applies after a restart.
    #[oai(path = "/api/settings", method = "put", tag = EndpointsTags::Settings)]
    pub async fn update_settings(
        &self,
        request: Json<UpdateSettingsRequestDto>,
    ) -> PoemResult<Json<SettingsDto>> {
        let settings = self
            .state
            .update_settings_usecase
            .execute(request.0.into())
            .await
            .map_err(settings_error)?;

        Ok(Json(map_settings(&settings)))
    }
}

fn settings_error(err: SettingsError) -> poem::Error {
    let status = match err {
        SettingsError::Invalid(_) => StatusCode::BAD_REQUEST,
        SettingsError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    poem::Error::from_string(err.to_string(), status)
}

#[cfg(test)]
mod tests {
    use poem::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        domain::models::{AppSettings, FileFormat},
        presentation::http::endpoints::root::testing::test_app,
    };

    #[tokio::test]
    async fn returns_live_settings_with_legacy_keys() {
        let app = test_app(AppSettings {
            webhook_url: "https://discord.com/api/webhooks/1/abc".into(),
            enable_discord: true,
            ..AppSettings::default()
        });

        let resp = app.client.get("/api/settings").send().await;
        resp.assert_status_is_ok();
        let body: Value = resp.0.into_body().into_json().await.expect("json body");
        assert_eq!(body["webhookURL"], "https://discord.com/api/webhooks/1/abc");
        assert_eq!(body["enableDiscord"], true);
        assert_eq!(body["fileFormat"], "txt");
        assert_eq!(body["listenAddr"], "localhost:3000");
    }

    #[tokio::test]
    async fn update_persists_and_applies() {
        let app = test_app(AppSettings::default());

        let resp = app
            .client
            .put("/api/settings")
            .body_json(&json!({
                "enableLocalSave": true,
                "path": "/var/log/chat",
                "fileFormat": "csv",
                "debugMode": true
            }))
            .send()
            .await;
        resp.assert_status_is_ok();

        let live = app.state.settings.read().await.clone();
        assert!(live.enable_local_save);
        assert_eq!(live.file_format, FileFormat::Csv);
        assert_eq!(live.listen_addr, "localhost:3000");
        assert!(app.state.event_log.debug_mode());

        let saved = std::fs::read_to_string(app.dir.path().join("config.json")).expect("saved");
        let saved: Value = serde_json::from_str(&saved).expect("json file");
        assert_eq!(saved["path"], "/var/log/chat");
        assert_eq!(saved["fileFormat"], "csv");
    }

    #[tokio::test]
    async fn invalid_update_is_rejected() {
        let app = test_app(AppSettings::default());

        let resp = app
            .client
            .put("/api/settings")
            .body_json(&json!({"enableDiscord": true, "webhookURL": ""}))
            .send()
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);

        assert_eq!(*app.state.settings.read().await, AppSettings::default());
        assert!(!app.dir.path().join("config.json").exists());
    }
}
