use crate::{
    domain::models::{AppSettings, FailureEntry, LogLine},
    presentation::http::{
        requests::UpdateSettingsRequestDto,
        responses::{FailureDto, LogLineDto, SettingsDto},
    },
};

pub fn map_line(line: &LogLine) -> LogLineDto {
    LogLineDto {
        timestamp: line.timestamp.clone(),
        level: line.level.into(),
        message: line.message.clone(),
        text: line.to_string(),
    }
}

pub fn map_failure(entry: &FailureEntry) -> FailureDto {
    FailureDto {
        timestamp: entry.timestamp.clone(),
        sender: entry.sender.clone(),
        message: entry.message.clone(),
        sink: entry.sink.into(),
        error: entry.error.clone(),
        text: entry.to_string(),
    }
}

pub fn map_settings(settings: &AppSettings) -> SettingsDto {
    SettingsDto {
        webhook_url: settings.webhook_url.clone(),
        enable_discord: settings.enable_discord,
        enable_local_save: settings.enable_local_save,
        path: settings.path.clone(),
        file_format: settings.file_format.into(),
        listen_addr: settings.listen_addr.clone(),
        debug_mode: settings.debug_mode,
        enable_http_forward: settings.enable_http_forward,
        forward_url: settings.forward_url.clone(),
        forward_scene: settings.forward_scene.clone(),
    }
}

impl From<UpdateSettingsRequestDto> for AppSettings {
    fn from(value: UpdateSettingsRequestDto) -> Self {
        AppSettings {
            webhook_url: value.webhook_url,
            enable_discord: value.enable_discord,
            enable_local_save: value.enable_local_save,
            path: value.path,
            file_format: value.file_format.into(),
            listen_addr: value.listen_addr,
            debug_mode: value.debug_mode,
            enable_http_forward: value.enable_http_forward,
            forward_url: value.forward_url,
            forward_scene: value.forward_scene,
        }
    }
}
