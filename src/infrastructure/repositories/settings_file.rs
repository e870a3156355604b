use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;
use tracing::{info, warn};

use crate::domain::{models::AppSettings, repositories::SettingsRepository};

/// Settings kept in a single pretty-printed JSON file.
pub struct JsonFileSettingsRepository {
    path: PathBuf,
}

impl JsonFileSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsRepository for JsonFileSettingsRepository {
    async fn load(&self) -> anyhow::Result<AppSettings> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no settings file, using defaults");
                return Ok(AppSettings::default());
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read settings from {}", self.path.display())
                });
            }
        };

        match serde_json::from_str::<AppSettings>(&raw) {
            Ok(settings) => Ok(settings.normalized()),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "unreadable settings file, using defaults");
                Ok(AppSettings::default())
            }
        }
    }

    async fn save(&self, settings: &AppSettings) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let body = serde_json::to_vec_pretty(settings).context("failed to encode settings")?;
        fs::write(&self.path, body)
            .await
            .with_context(|| format!("failed to write settings to {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::domain::models::FileFormat;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let repo = JsonFileSettingsRepository::new(dir.path().join("config.json"));

        let settings = repo.load().await.expect("load");
        assert_eq!(settings, AppSettings::default());
    }

    #[tokio::test]
    async fn garbage_file_yields_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("seed");

        let settings = JsonFileSettingsRepository::new(path)
            .load()
            .await
            .expect("load");
        assert_eq!(settings, AppSettings::default());
    }

    #[tokio::test]
    async fn save_creates_directories_and_round_trips() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("rp-chat-logger").join("config.json");
        let repo = JsonFileSettingsRepository::new(&path);

        let settings = AppSettings {
            webhook_url: "https://discord.com/api/webhooks/1/abc".into(),
            enable_discord: true,
            file_format: FileFormat::Json,
            debug_mode: true,
            ..AppSettings::default()
        };
        repo.save(&settings).await.expect("save");

        let raw = std::fs::read_to_string(&path).expect("written");
        assert!(raw.contains("\n  \"webhookURL\": \"https://discord.com/api/webhooks/1/abc\""));
        assert_eq!(repo.load().await.expect("load"), settings);
    }
}
