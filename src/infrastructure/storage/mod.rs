pub mod file_log;
