pub mod health;
pub mod logs;
pub mod messages;
pub mod root;
pub mod settings;
