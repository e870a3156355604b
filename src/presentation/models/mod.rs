use poem_openapi::Enum;

use crate::domain::models::{FileFormat, LogLevel, SinkKind};

#[derive(Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FileFormatKind {
    #[default]
    #[oai(rename = "txt")]
    Txt,
    #[oai(rename = "csv")]
    Csv,
    #[oai(rename = "json")]
    Json,
    #[oai(rename = "docx")]
    Docx,
}

impl From<FileFormatKind> for FileFormat {
    fn from(value: FileFormatKind) -> Self {
        match value {
            FileFormatKind::Txt => FileFormat::Txt,
            FileFormatKind::Csv => FileFormat::Csv,
            FileFormatKind::Json => FileFormat::Json,
            FileFormatKind::Docx => FileFormat::Docx,
        }
    }
}

impl From<FileFormat> for FileFormatKind {
    fn from(value: FileFormat) -> Self {
        match value {
            FileFormat::Txt => FileFormatKind::Txt,
            FileFormat::Csv => FileFormatKind::Csv,
            FileFormat::Json => FileFormatKind::Json,
            FileFormat::Docx => FileFormatKind::Docx,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogLevelKind {
    #[oai(rename = "debug")]
    Debug,
    #[oai(rename = "info")]
    Info,
    #[oai(rename = "warning")]
    Warning,
    #[oai(rename = "error")]
    Error,
}

impl From<LogLevel> for LogLevelKind {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Debug => LogLevelKind::Debug,
            LogLevel::Info => LogLevelKind::Info,
            LogLevel::Warning => LogLevelKind::Warning,
            LogLevel::Error => LogLevelKind::Error,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum SinkKindDto {
    #[oai(rename = "discord")]
    Discord,
    #[oai(rename = "file")]
    File,
    #[oai(rename = "forward")]
    Forward,
}

impl From<SinkKind> for SinkKindDto {
    fn from(value: SinkKind) -> Self {
        match value {
            SinkKind::Discord => SinkKindDto::Discord,
            SinkKind::File => SinkKindDto::File,
            SinkKind::Forward => SinkKindDto::Forward,
        }
    }
}
