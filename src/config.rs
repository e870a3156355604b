use std::env::var;
use std::path::PathBuf;

use dotenvy::dotenv;

const SETTINGS_DIR: &str = "rp-chat-logger";
const SETTINGS_FILE: &str = "config.json";

/// Process-level configuration. Relay behaviour lives in the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub settings_path: PathBuf,
    /// Overrides the listen address stored in the settings file.
    pub listen_addr: Option<String>,
    pub json_logs: bool,
}

impl Config {
    pub fn try_parse() -> Result<Config, &'static str> {
        let _ = dotenv();
        Self::from_lookup(|key| var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, &'static str> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let settings_path = match non_empty("CONFIG_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_config_dir(&non_empty)
                .ok_or("Could not locate a config directory, set CONFIG_PATH")?
                .join(SETTINGS_DIR)
                .join(SETTINGS_FILE),
        };

        let json_logs = match non_empty("LOG_FORMAT").as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(_) => return Err("LOG_FORMAT must be either text or json"),
        };

        Ok(Config {
            settings_path,
            listen_addr: non_empty("LISTEN_ADDR"),
            json_logs,
        })
    }
}

fn default_config_dir(lookup: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| lookup("APPDATA").map(PathBuf::from))
        .or_else(|| lookup("HOME").map(|home| PathBuf::from(home).join(".config")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn parse(pairs: &[(&str, &str)]) -> Result<Config, &'static str> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn explicit_values_win() {
        let config = parse(&[
            ("CONFIG_PATH", "/etc/relay/settings.json"),
            ("LISTEN_ADDR", "0.0.0.0:8080"),
            ("LOG_FORMAT", "json"),
            ("HOME", "/home/bob"),
        ])
        .expect("valid");

        assert_eq!(config.settings_path, PathBuf::from("/etc/relay/settings.json"));
        assert_eq!(config.listen_addr.as_deref(), Some("0.0.0.0:8080"));
        assert!(config.json_logs);
    }

    #[test]
    fn settings_path_falls_back_to_the_user_config_dir() {
        let config = parse(&[("HOME", "/home/bob")]).expect("valid");
        assert_eq!(
            config.settings_path,
            PathBuf::from("/home/bob/.config/rp-chat-logger/config.json")
        );
        assert_eq!(config.listen_addr, None);
        assert!(!config.json_logs);

        let config = parse(&[("XDG_CONFIG_HOME", "/xdg"), ("HOME", "/home/bob")]).expect("valid");
        assert_eq!(
            config.settings_path,
            PathBuf::from("/xdg/rp-chat-logger/config.json")
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&[]).is_err());
        assert!(parse(&[("HOME", "/home/bob"), ("LOG_FORMAT", "yaml")]).is_err());
    }
}
