use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    application::services::sinks::ChatArchive,
    domain::{
        errors::DeliveryError,
        models::{ChatMessage, FileFormat, SinkKind},
    },
};

const CSV_HEADER: [&str; 3] = ["Timestamp", "Sender", "Message"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLogEntry {
    pub timestamp: String,
    pub sender: String,
    pub message: String,
}

/// Appends chat lines to one log file per day.
#[derive(Default)]
pub struct FileLogSink {
    write_lock: Mutex<()>,
}

impl FileLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message` to today's file under `dir`. An empty `dir` is a no-op.
    pub async fn append(
        &self,
        dir: &str,
        format: FileFormat,
        message: &ChatMessage,
    ) -> Result<Option<PathBuf>, DeliveryError> {
        if dir.trim().is_empty() {
            return Ok(None);
        }

        let _guard = self.write_lock.lock().await;
        let dir = PathBuf::from(dir);
        let message = message.clone();
        let path = tokio::task::spawn_blocking(move || {
            write_entry(&dir, format, Local::now(), &message)
        })
        .await
        .map_err(|err| DeliveryError::Io(io::Error::other(err)))??;

        debug!(path = %path.display(), "chat line saved");
        Ok(Some(path))
    }
}

#[async_trait]
impl ChatArchive for FileLogSink {
    async fn archive(
        &self,
        dir: &str,
        format: FileFormat,
        message: &ChatMessage,
    ) -> Result<(), DeliveryError> {
        self.append(dir, format, message).await.map(|_| ())
    }
}

pub fn log_file_path(dir: &Path, format: FileFormat, now: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "ConanExiles_log_{}.{}",
        now.format("%Y-%m-%d"),
        format.as_str()
    ))
}

fn write_entry(
    dir: &Path,
    format: FileFormat,
    now: DateTime<Local>,
    message: &ChatMessage,
) -> Result<PathBuf, DeliveryError> {
    let path = log_file_path(dir, format, now);
    let entry = FileLogEntry {
        timestamp: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        sender: message.sender.clone(),
        message: message.message.clone(),
    };

    match format {
        FileFormat::Txt | FileFormat::Docx => append_line(&path, &entry)?,
        FileFormat::Csv => append_row(&path, &entry)?,
        FileFormat::Json => rewrite_array(&path, entry)?,
    }

    Ok(path)
}

fn append_line(path: &Path, entry: &FileLogEntry) -> Result<(), DeliveryError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "[{}] {}: {}", entry.timestamp, entry.sender, entry.message)?;
    Ok(())
}

fn append_row(path: &Path, entry: &FileLogEntry) -> Result<(), DeliveryError> {
    let is_new = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if is_new {
        writer.write_record(CSV_HEADER)?;
    }
    writer.write_record([&entry.timestamp, &entry.sender, &entry.message])?;
    writer.flush()?;
    Ok(())
}

fn rewrite_array(path: &Path, entry: FileLogEntry) -> Result<(), DeliveryError> {
    let mut entries: Vec<FileLogEntry> = match fs::read_to_string(path) {
        Ok(raw) if raw.trim().is_empty() => Vec::new(),
        Ok(raw) => serde_json::from_str(&raw).map_err(DeliveryError::CorruptLog)?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(err) => return Err(err.into()),
    };
    entries.push(entry);

    let mut body = serde_json::to_vec_pretty(&entries).map_err(|source| DeliveryError::Encode {
        sink: SinkKind::File,
        source,
    })?;
    body.push(b'\n');
    fs::write(path, body)?;
    Ok(())
}
