use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use client_core::{ApiConfig, StaleResults, DEFAULT_API_BASE_URL};
use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "api_chain.toml";

/// Runtime settings. A timeout of zero disables it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub stale_results: StaleResults,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            stale_results: StaleResults::Retain,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
    stale_results: Option<StaleResults>,
}

/// Defaults, then the TOML file, then environment overrides.
pub fn load_settings(config_path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    let path = config_path.map_or_else(
        || PathBuf::from(DEFAULT_CONFIG_FILE),
        Path::to_path_buf,
    );
    if let Ok(raw) = fs::read_to_string(&path) {
        match settings.apply_toml(&raw) {
            Ok(()) => info!(path = %path.display(), "loaded settings file"),
            Err(err) => warn!(
                path = %path.display(),
                error = %err,
                "ignoring unreadable settings file"
            ),
        }
    }

    settings.apply_env(|key| std::env::var(key).ok());
    settings
}

impl Settings {
    fn apply_toml(&mut self, raw: &str) -> Result<(), toml::de::Error> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file_cfg.connect_timeout_secs {
            self.connect_timeout_secs = v;
        }
        if let Some(v) = file_cfg.stale_results {
            self.stale_results = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("APP__API_BASE_URL") {
            self.api_base_url = v;
        }

        if let Some(parsed) = lookup("APP__REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.request_timeout_secs = parsed;
        }
        if let Some(parsed) = lookup("APP__CONNECT_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.connect_timeout_secs = parsed;
        }

        if let Some(policy) = lookup("APP__STALE_RESULTS")
            .as_deref()
            .and_then(parse_stale_results)
        {
            self.stale_results = policy;
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_base_url.clone(),
            request_timeout: seconds(self.request_timeout_secs),
            connect_timeout: seconds(self.connect_timeout_secs),
        }
    }
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_stale_results(raw: &str) -> Option<StaleResults> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "retain" => Some(StaleResults::Retain),
        "clear" => Some(StaleResults::Clear),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_target_the_public_demo_api() {
        let config = Settings::default().api_config();
        assert_eq!(config.base_url, "https://jsonplaceholder.typicode.com");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn toml_overrides_defaults() {
        let mut settings = Settings::default();
        settings
            .apply_toml(
                r#"
                api_base_url = "http://localhost:3000"
                request_timeout_secs = 0
                stale_results = "clear"
                "#,
            )
            .expect("valid toml");

        assert_eq!(settings.api_base_url, "http://localhost:3000");
        assert_eq!(settings.stale_results, StaleResults::Clear);
        assert_eq!(settings.connect_timeout_secs, 10);
        assert_eq!(settings.api_config().request_timeout, None);
    }

    #[test]
    fn app_prefixed_env_wins_over_plain_env() {
        let mut settings = Settings::default();
        settings.apply_env(lookup_from(&[
            ("API_BASE_URL", "http://plain.example"),
            ("APP__API_BASE_URL", "http://app.example"),
            ("APP__REQUEST_TIMEOUT_SECS", "5"),
            ("APP__CONNECT_TIMEOUT_SECS", "not-a-number"),
            ("APP__STALE_RESULTS", " Clear "),
        ]));

        assert_eq!(settings.api_base_url, "http://app.example");
        assert_eq!(settings.request_timeout_secs, 5);
        assert_eq!(settings.connect_timeout_secs, 10);
        assert_eq!(settings.stale_results, StaleResults::Clear);
    }

    #[test]
    fn unknown_stale_results_value_is_ignored() {
        let mut settings = Settings::default();
        settings.apply_env(lookup_from(&[("APP__STALE_RESULTS", "forget")]));
        assert_eq!(settings.stale_results, StaleResults::Retain);
    }

    #[test]
    fn load_settings_reads_explicit_file() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("api_chain_settings_{suffix}.toml"));
        fs::write(&path, "connect_timeout_secs = 3\n").expect("write settings");

        let settings = load_settings(Some(&path));
        assert_eq!(settings.connect_timeout_secs, 3);

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn malformed_file_keeps_defaults() {
        let mut settings = Settings::default();
        assert!(settings.apply_toml("request_timeout_secs = \"soon\"").is_err());
        assert_eq!(settings, Settings::default());
    }
}
