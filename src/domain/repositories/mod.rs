use async_trait::async_trait;

use crate::domain::models::AppSettings;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Returns the stored settings, or defaults when none are usable.
    async fn load(&self) -> anyhow::Result<AppSettings>;
    async fn save(&self, settings: &AppSettings) -> anyhow::Result<()>;
}
