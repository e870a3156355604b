use std::time::Duration;

use thiserror::Error;

use crate::domain::models::SinkKind;

/// Failure of a single delivery attempt to one sink.
///
/// None of these are retried automatically; the only retryable outcome of a
/// Discord send is a rate limit, which is reported as a successful
/// [`SendOutcome`](crate::application::services::webhook::SendOutcome) instead.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("encoding {sink} payload: {source}")]
    Encode {
        sink: SinkKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("sending {sink} request: {source}")]
    Transport {
        sink: SinkKind,
        #[source]
        source: reqwest::Error,
    },
    #[error("{sink} target returned status code: {status}")]
    UnexpectedStatus { sink: SinkKind, status: u16 },
    #[error("{sink} delivery timed out after {timeout:?}")]
    Timeout { sink: SinkKind, timeout: Duration },
    #[error("writing log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("writing csv log file: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing existing json log file: {0}")]
    CorruptLog(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings: {0}")]
    Invalid(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
