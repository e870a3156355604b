pub mod discord;
pub mod forward;
