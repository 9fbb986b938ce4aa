use crate::error::{AppError, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Endpoint returning a JSON array of readings
    pub url: String,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    60
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// IANA zone used for calendar-day and ISO-week bucketing
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Full-scale value of the live gauge
    #[serde(default = "default_gauge_max_va")]
    pub gauge_max_va: f64,
}

fn default_timezone() -> String {
    "UTC".into()
}

fn default_gauge_max_va() -> f64 {
    500.0
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            gauge_max_va: default_gauge_max_va(),
        }
    }
}

impl DashboardConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| AppError::Config(format!("invalid timezone '{}': {}", self.timezone, e)))
    }
}

impl Config {
    /// Load configuration from a YAML file with environment variable substitution.
    /// `METER_SOURCE_URL`, when set, overrides `source.url`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;

        let mut config: Config = serde_yaml::from_str(&expanded)?;

        if let Ok(url) = std::env::var("METER_SOURCE_URL") {
            config.source.url = url;
        }

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.source.url.trim().is_empty() {
            return Err(AppError::Config("Source url cannot be empty".to_string()));
        }

        if !self.source.url.starts_with("http://") && !self.source.url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Source url must be http(s): {}",
                self.source.url
            )));
        }

        if self.refresh.interval_secs == 0 {
            return Err(AppError::Config(
                "Refresh interval cannot be 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(AppError::Config("Server port cannot be 0".to_string()));
        }

        if !(self.dashboard.gauge_max_va.is_finite() && self.dashboard.gauge_max_va > 0.0) {
            return Err(AppError::Config(
                "Gauge maximum must be a positive number".to_string(),
            ));
        }

        self.dashboard.tz()?;

        Ok(())
    }
}

/// Expand environment variables in the format $(VAR_NAME)
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = content.to_string();

    let re = regex::Regex::new(r"\$\(([A-Z_][A-Z0-9_]*)\)")
        .map_err(|e| AppError::Internal(e.to_string()))?;

    for cap in re.captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];

        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(full_match, &value);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const MINIMAL: &str = r#"
source:
  url: "https://meter.example.com/readings"
server:
  host: "0.0.0.0"
  port: 8080
"#;

    #[test]
    #[serial]
    fn test_expand_env_vars() {
        std::env::set_var("METER_TEST_VAR", "test_value");

        let input = "url: $(METER_TEST_VAR)";
        let output = expand_env_vars(input).unwrap();

        assert_eq!(output, "url: test_value");

        std::env::remove_var("METER_TEST_VAR");
    }

    #[test]
    fn test_expand_env_vars_not_found() {
        let input = "url: $(METER_NONEXISTENT_VAR)";
        let output = expand_env_vars(input).unwrap();

        // Left unchanged when not set
        assert_eq!(output, "url: $(METER_NONEXISTENT_VAR)");
    }

    #[test]
    #[serial]
    fn test_defaults_applied() {
        std::env::remove_var("METER_SOURCE_URL");
        let config = Config::from_yaml(MINIMAL).unwrap();

        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.refresh.interval(), Duration::from_secs(60));
        assert_eq!(config.dashboard.timezone, "UTC");
        assert_eq!(config.dashboard.gauge_max_va, 500.0);
        assert_eq!(config.dashboard.tz().unwrap(), chrono_tz::UTC);
    }

    #[test]
    #[serial]
    fn test_rejects_bad_timezone() {
        std::env::remove_var("METER_SOURCE_URL");
        let yaml = format!("{MINIMAL}dashboard:\n  timezone: \"Mars/Olympus\"\n");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    #[serial]
    fn test_rejects_zero_interval() {
        std::env::remove_var("METER_SOURCE_URL");
        let yaml = format!("{MINIMAL}refresh:\n  interval_secs: 0\n");
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    #[serial]
    fn test_rejects_non_http_url() {
        std::env::remove_var("METER_SOURCE_URL");
        let yaml = MINIMAL.replace("https://meter.example.com/readings", "ftp://meter");
        assert!(Config::from_yaml(&yaml).is_err());
    }
}
