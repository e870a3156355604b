pub mod log;
pub mod message;
pub mod settings;
pub mod sink;

pub use log::{FailureEntry, LogLevel, LogLine};
pub use message::{ChatMessage, QueuedMessage};
pub use settings::AppSettings;
pub use sink::{FileFormat, SinkKind};
