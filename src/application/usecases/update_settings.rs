use std::sync::Arc;

use reqwest::Url;

use crate::{
    application::services::{SharedSettings, log_sink::LogSink},
    domain::{
        errors::SettingsError,
        models::{AppSettings, LogLevel},
        repositories::SettingsRepository,
    },
};

pub struct UpdateSettingsUseCase {
    repo: Arc<dyn SettingsRepository>,
    live: SharedSettings,
    log: Arc<dyn LogSink>,
}

impl UpdateSettingsUseCase {
    pub fn new(
        repo: Arc<dyn SettingsRepository>,
        live: SharedSettings,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self { repo, live, log }
    }

    /// Validates, persists, then swaps the live settings. Nothing changes
    /// when validation or persistence fails.
    pub async fn execute(&self, settings: AppSettings) -> Result<AppSettings, SettingsError> {
        let settings = settings.normalized();
        validate(&settings)?;

        self.repo.save(&settings).await?;

        let previous = {
            let mut live = self.live.write().await;
            std::mem::replace(&mut *live, settings.clone())
        };

        self.log.set_debug_mode(settings.debug_mode);
        self.log.log(LogLevel::Info, "Settings saved");
        if previous.listen_addr != settings.listen_addr {
            self.log.log(
                LogLevel::Warning,
                &format!(
                    "Listen address changed to {}; restart to apply",
                    settings.listen_addr
                ),
            );
        }

        Ok(settings)
    }
}

fn validate(settings: &AppSettings) -> Result<(), SettingsError> {
    if settings.enable_discord {
        require_http_url("webhookURL", &settings.webhook_url)?;
    }
    if settings.enable_http_forward {
        require_http_url("forwardURL", &settings.forward_url)?;
    }
    if settings.enable_local_save && settings.path.trim().is_empty() {
        return Err(SettingsError::Invalid(
            "path is required when local save is enabled".into(),
        ));
    }
    Ok(())
}

fn require_http_url(field: &str, value: &str) -> Result<(), SettingsError> {
    let url = Url::parse(value.trim())
        .map_err(|err| SettingsError::Invalid(format!("{field} is not a valid URL: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SettingsError::Invalid(format!(
            "{field} must be an http or https URL"
        )));
    }
    Ok(())
}
