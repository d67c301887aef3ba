use std::{collections::HashMap, fs, path::Path, time::Duration};

use client_core::{dispatcher::DEFAULT_DISPATCH_CAPACITY, transport::DEFAULT_RPC_PATH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub rpc_path: String,
    pub request_timeout_secs: Option<u64>,
    pub dispatch_capacity: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            rpc_path: DEFAULT_RPC_PATH.into(),
            request_timeout_secs: None,
            dispatch_capacity: DEFAULT_DISPATCH_CAPACITY,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Applies a flat TOML document. Scalars may be quoted or bare; unknown
    /// keys, tables and arrays are ignored.
    pub fn apply_file(&mut self, raw: &str) {
        let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
            return;
        };
        for (key, value) in &file_cfg {
            let value = match value {
                toml::Value::String(v) => v.clone(),
                toml::Value::Integer(v) => v.to_string(),
                toml::Value::Float(v) => v.to_string(),
                toml::Value::Boolean(v) => v.to_string(),
                _ => continue,
            };
            self.apply(key, &value);
        }
    }

    pub fn apply_env(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        if let Some(v) = vars.get("PLATFORM_SERVER_URL") {
            self.server_url = v.clone();
        }
        for (key, value) in &vars {
            if let Some(key) = key.strip_prefix("APP__") {
                self.apply(&key.to_ascii_lowercase(), value);
            }
        }
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "server_url" => self.server_url = value.to_string(),
            "rpc_path" => self.rpc_path = value.to_string(),
            "request_timeout_secs" => {
                if let Ok(parsed) = value.parse::<u64>() {
                    self.request_timeout_secs = Some(parsed);
                }
            }
            "dispatch_capacity" => {
                if let Ok(parsed) = value.parse::<usize>() {
                    self.dispatch_capacity = parsed;
                }
            }
            "log_filter" => self.log_filter = value.to_string(),
            _ => {}
        }
    }
}

pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        settings.apply_file(&raw);
    }
    settings.apply_env(std::env::vars());

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
