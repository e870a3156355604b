use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::models::AppSettings;

pub mod delivery_queue;
pub mod log_sink;
pub mod sinks;
pub mod webhook;

/// Settings shared between the dispatcher and the operator API.
pub type SharedSettings = Arc<RwLock<AppSettings>>;
