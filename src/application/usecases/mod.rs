pub mod update_settings;
