use std::fmt;

use serde::{Deserialize, Serialize};

/// Delivery destination a chat message can be fanned out to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    Discord,
    File,
    Forward,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Discord => "discord",
            SinkKind::File => "file",
            SinkKind::Forward => "forward",
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-disk layout of the local chat log.
///
/// Unknown names fall back to [`FileFormat::Txt`] so an old or hand-edited
/// settings file never prevents startup.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FileFormat {
    #[default]
    Txt,
    Csv,
    Json,
    Docx,
}

impl FileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Txt => "txt",
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
            FileFormat::Docx => "docx",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "txt" => Some(FileFormat::Txt),
            "csv" => Some(FileFormat::Csv),
            "json" => Some(FileFormat::Json),
            "docx" => Some(FileFormat::Docx),
            _ => None,
        }
    }
}

impl From<String> for FileFormat {
    fn from(value: String) -> Self {
        FileFormat::from_str(&value.to_ascii_lowercase()).unwrap_or_default()
    }
}
