use serde::{Deserialize, Serialize};

use super::sink::FileFormat;

pub const DEFAULT_LISTEN_ADDR: &str = "localhost:3000";

/// Persisted relay settings. Field names match the JSON written by earlier
/// releases so existing config files keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
    #[serde(rename = "enableDiscord")]
    pub enable_discord: bool,
    #[serde(rename = "enableLocalSave")]
    pub enable_local_save: bool,
    pub path: String,
    #[serde(rename = "fileFormat")]
    pub file_format: FileFormat,
    #[serde(rename = "listenAddr")]
    pub listen_addr: String,
    #[serde(rename = "debugMode")]
    pub debug_mode: bool,
    #[serde(rename = "enableHTTPForward")]
    pub enable_http_forward: bool,
    #[serde(rename = "forwardURL")]
    pub forward_url: String,
    #[serde(rename = "forwardScene")]
    pub forward_scene: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            enable_discord: false,
            enable_local_save: false,
            path: String::new(),
            file_format: FileFormat::Txt,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            debug_mode: false,
            enable_http_forward: false,
            forward_url: String::new(),
            forward_scene: String::new(),
        }
    }
}

impl AppSettings {
    /// Fills values an older or partial file may have left blank.
    pub fn normalized(mut self) -> Self {
        if self.listen_addr.trim().is_empty() {
            self.listen_addr = DEFAULT_LISTEN_ADDR.to_string();
        }
        self
    }
}
