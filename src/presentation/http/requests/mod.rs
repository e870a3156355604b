use poem_openapi::Object;

use crate::presentation::models::FileFormatKind;

/// Full replacement of the relay settings. Omitted fields take their defaults.
#[derive(Object)]
pub struct UpdateSettingsRequestDto {
    #[oai(rename = "webhookURL", default)]
    pub webhook_url: String,
    #[oai(rename = "enableDiscord", default)]
    pub enable_discord: bool,
    #[oai(rename = "enableLocalSave", default)]
    pub enable_local_save: bool,
    #[oai(default)]
    pub path: String,
    #[oai(rename = "fileFormat", default)]
    pub file_format: FileFormatKind,
    #[oai(rename = "listenAddr", default)]
    pub listen_addr: String,
    #[oai(rename = "debugMode", default)]
    pub debug_mode: bool,
    #[oai(rename = "enableHTTPForward", default)]
    pub enable_http_forward: bool,
    #[oai(rename = "forwardURL", default)]
    pub forward_url: String,
    #[oai(rename = "forwardScene", default)]
    pub forward_scene: String,
}
