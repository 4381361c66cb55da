use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Cross-process rate limit for lookups (`[rate]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateConfig {
    /// Maximum requests begun within one window, across all processes.
    pub request_per_window: usize,
    /// Sliding window length in seconds.
    pub window_secs: u64,
    /// Lower bound of the randomized backoff while waiting for the lock or a slot.
    pub backoff_min_ms: u64,
    /// Upper bound of the randomized backoff.
    pub backoff_max_ms: u64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            request_per_window: 5,
            window_secs: 60,
            backoff_min_ms: 1000,
            backoff_max_ms: 2000,
        }
    }
}

/// RDAP client invocation (`[rdap]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdapConfig {
    /// Program and leading arguments; `--raw --type domain <fqdn>` is appended.
    pub command: Vec<String>,
    /// Exit code the client uses for "object does not exist".
    pub not_found_code: i32,
    /// Exact stderr that must accompany `not_found_code` to count as "not found".
    pub not_found_stderr: String,
    /// Poll interval while the lookup process runs.
    pub idle_freq_ms: u64,
}

impl Default for RdapConfig {
    fn default() -> Self {
        Self {
            command: vec!["rdap".to_string()],
            not_found_code: 1,
            not_found_stderr: "# Error: RDAP server returned 404, object does not exist.\n"
                .to_string(),
            idle_freq_ms: 250,
        }
    }
}

impl RdapConfig {
    pub fn idle(&self) -> Duration {
        Duration::from_millis(self.idle_freq_ms)
    }
}

/// Global configuration loaded from `~/.config/zonebatch/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonebatchConfig {
    /// Default number of external processes run at once.
    pub core_total: usize,
    /// Seconds the task manager sleeps between polls.
    pub idle_freq_secs: f64,
    /// Seconds between progress lines; omit to disable progress reporting.
    #[serde(default)]
    pub track_freq_secs: Option<u64>,
    #[serde(default)]
    pub rate: RateConfig,
    #[serde(default)]
    pub rdap: RdapConfig,
}

impl Default for ZonebatchConfig {
    fn default() -> Self {
        Self {
            core_total: 4,
            idle_freq_secs: 5.0,
            track_freq_secs: Some(30),
            rate: RateConfig::default(),
            rdap: RdapConfig::default(),
        }
    }
}

impl ZonebatchConfig {
    /// Poll interval; negative or non-finite values fall back to one second.
    pub fn idle(&self) -> Duration {
        Duration::try_from_secs_f64(self.idle_freq_secs).unwrap_or(Duration::from_secs(1))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("zonebatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ZonebatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ZonebatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit path. A missing or malformed file is an error.
pub fn load_from_path(path: &Path) -> Result<ZonebatchConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ZonebatchConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ZonebatchConfig::default();
        assert_eq!(cfg.core_total, 4);
        assert_eq!(cfg.track_freq_secs, Some(30));
        assert_eq!(cfg.rate.request_per_window, 5);
        assert_eq!(cfg.rate.window_secs, 60);
        assert_eq!(cfg.rdap.command, ["rdap"]);
        assert_eq!(cfg.rdap.not_found_code, 1);
        assert_eq!(cfg.idle(), Duration::from_secs(5));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ZonebatchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ZonebatchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn sections_are_optional() {
        let toml = r#"
            core_total = 8
            idle_freq_secs = 0.5
        "#;
        let cfg: ZonebatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.core_total, 8);
        assert_eq!(cfg.idle(), Duration::from_millis(500));
        assert!(cfg.track_freq_secs.is_none());
        assert_eq!(cfg.rate, RateConfig::default());
        assert_eq!(cfg.rdap, RdapConfig::default());
    }

    #[test]
    fn config_toml_custom_sections() {
        let toml = r#"
            core_total = 2
            idle_freq_secs = 1.0
            track_freq_secs = 10

            [rate]
            request_per_window = 30
            window_secs = 60
            backoff_min_ms = 100
            backoff_max_ms = 200

            [rdap]
            command = ["rdap", "--server", "https://rdap.example"]
            not_found_code = 1
            not_found_stderr = "not found\n"
            idle_freq_ms = 50
        "#;
        let cfg: ZonebatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.rate.request_per_window, 30);
        assert_eq!(cfg.rate.backoff_max_ms, 200);
        assert_eq!(cfg.rdap.command.len(), 3);
        assert_eq!(cfg.rdap.not_found_stderr, "not found\n");
        assert_eq!(cfg.rdap.idle(), Duration::from_millis(50));
    }

    #[test]
    fn negative_idle_falls_back() {
        let cfg = ZonebatchConfig {
            idle_freq_secs: -2.0,
            ..ZonebatchConfig::default()
        };
        assert_eq!(cfg.idle(), Duration::from_secs(1));
    }

    #[test]
    fn load_from_path_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "core_total = \"many\"").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse config"));
    }
}
