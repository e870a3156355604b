use std::collections::HashMap;

use poem_openapi::Object;

use crate::presentation::models::{FileFormatKind, LogLevelKind, SinkKindDto};

/// Launcher manifest the game client expects back from every `/message` call.
#[derive(Object)]
pub struct ManifestResponseDto {
    #[oai(rename = "ManifestFileVersion")]
    pub manifest_file_version: String,
    #[oai(rename = "bIsFileData")]
    pub is_file_data: bool,
    #[oai(rename = "AppID")]
    pub app_id: String,
    #[oai(rename = "AppNameString")]
    pub app_name: String,
    #[oai(rename = "BuildVersionString")]
    pub build_version: String,
    #[oai(rename = "LaunchExeString")]
    pub launch_exe: String,
    #[oai(rename = "LaunchCommand")]
    pub launch_command: String,
    #[oai(rename = "PrereqIds")]
    pub prereq_ids: Vec<String>,
    #[oai(rename = "PrereqName")]
    pub prereq_name: String,
    #[oai(rename = "PrereqPath")]
    pub prereq_path: String,
    #[oai(rename = "PrereqArgs")]
    pub prereq_args: String,
    #[oai(rename = "FileManifestList")]
    pub file_manifest_list: Vec<String>,
    #[oai(rename = "ChunkHashList")]
    pub chunk_hash_list: HashMap<String, String>,
    #[oai(rename = "ChunkShaList")]
    pub chunk_sha_list: HashMap<String, String>,
    #[oai(rename = "DataGroupList")]
    pub data_group_list: HashMap<String, String>,
    #[oai(rename = "ChunkFilesizeList")]
    pub chunk_filesize_list: HashMap<String, String>,
    #[oai(rename = "CustomFields")]
    pub custom_fields: HashMap<String, String>,
}

impl ManifestResponseDto {
    pub fn empty() -> Self {
        Self {
            manifest_file_version: "000000000000".into(),
            is_file_data: false,
            app_id: "000000000000".into(),
            app_name: String::new(),
            build_version: String::new(),
            launch_exe: String::new(),
            launch_command: String::new(),
            prereq_ids: Vec::new(),
            prereq_name: String::new(),
            prereq_path: String::new(),
            prereq_args: String::new(),
            file_manifest_list: Vec::new(),
            chunk_hash_list: HashMap::new(),
            chunk_sha_list: HashMap::new(),
            data_group_list: HashMap::new(),
            chunk_filesize_list: HashMap::new(),
            custom_fields: HashMap::new(),
        }
    }
}

#[derive(Object, Clone)]
pub struct LogLineDto {
    pub timestamp: String,
    pub level: LogLevelKind,
    pub message: String,
    /// Rendered `[time] [LEVEL] message` line.
    pub text: String,
}

#[derive(Object, Clone)]
pub struct FailureDto {
    pub timestamp: String,
    pub sender: String,
    pub message: String,
    pub sink: SinkKindDto,
    pub error: String,
    pub text: String,
}

#[derive(Object)]
pub struct QueueStatusDto {
    pub pending: u32,
}

#[derive(Object)]
pub struct SettingsDto {
    #[oai(rename = "webhookURL")]
    pub webhook_url: String,
    #[oai(rename = "enableDiscord")]
    pub enable_discord: bool,
    #[oai(rename = "enableLocalSave")]
    pub enable_local_save: bool,
    pub path: String,
    #[oai(rename = "fileFormat")]
    pub file_format: FileFormatKind,
    #[oai(rename = "listenAddr")]
    pub listen_addr: String,
    #[oai(rename = "debugMode")]
    pub debug_mode: bool,
    #[oai(rename = "enableHTTPForward")]
    pub enable_http_forward: bool,
    #[oai(rename = "forwardURL")]
    pub forward_url: String,
    #[oai(rename = "forwardScene")]
    pub forward_scene: String,
}
