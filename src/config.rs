//! Centralized configuration management for healthcare-plus

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON fixture document replacing the built-in mock data (optional)
    pub fixtures_path: Option<PathBuf>,
    /// Log file written by the binary
    pub log_file: PathBuf,
    /// Simulated round-trip delays
    pub delays: Delays,
    /// Position reported to the emergency form
    pub geolocation: GeoConfig,
    /// Terminal UI settings
    pub ui: UiConfig,
}

/// Delays of the simulated network round trips
#[derive(Debug, Clone)]
pub struct Delays {
    /// Delay before the login credentials are checked (milliseconds)
    pub login_delay_ms: u64,
    /// Delay before a video consultation reports connected (milliseconds)
    pub video_connect_delay_ms: u64,
}

/// Host position source; both values unset means geolocation is unsupported
#[derive(Debug, Clone, Default)]
pub struct GeoConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Event poll interval (milliseconds)
    pub tick_ms: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            login_delay_ms: 1500,
            video_connect_delay_ms: 2000,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_ms: 100 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixtures_path: None,
            log_file: "./healthcare_plus.log".into(),
            delays: Delays::default(),
            geolocation: GeoConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let fixtures_path = std::env::var("HEALTHCARE_FIXTURES_PATH").ok().map(PathBuf::from);

        let log_file = std::env::var("HEALTHCARE_LOG_FILE")
            .unwrap_or_else(|_| "./healthcare_plus.log".to_string())
            .into();

        let delays = Delays {
            login_delay_ms: parse_env_var("HEALTHCARE_LOGIN_DELAY_MS")?.unwrap_or(1500),
            video_connect_delay_ms: parse_env_var("HEALTHCARE_VIDEO_CONNECT_DELAY_MS")?.unwrap_or(2000),
        };

        let geolocation = GeoConfig {
            latitude: parse_env_var("HEALTHCARE_GEO_LATITUDE")?,
            longitude: parse_env_var("HEALTHCARE_GEO_LONGITUDE")?,
        };

        let ui = UiConfig {
            tick_ms: parse_env_var("HEALTHCARE_TICK_MS")?.unwrap_or(100),
        };

        Ok(Config {
            fixtures_path,
            log_file,
            delays,
            geolocation,
            ui,
        })
    }

    /// Get login delay as Duration
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.delays.login_delay_ms)
    }

    /// Get video connect delay as Duration
    pub fn video_connect_delay(&self) -> Duration {
        Duration::from_millis(self.delays.video_connect_delay_ms)
    }

    /// Get event poll interval as Duration
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.fixtures_path {
            if !path.is_file() {
                return Err(anyhow::anyhow!(
                    "Fixture file does not exist: {}",
                    path.display()
                ));
            }
        }

        if let Some(parent) = self.log_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(anyhow::anyhow!(
                    "Log directory does not exist: {}",
                    parent.display()
                ));
            }
        }

        if self.geolocation.latitude.is_some() != self.geolocation.longitude.is_some() {
            return Err(anyhow::anyhow!(
                "HEALTHCARE_GEO_LATITUDE and HEALTHCARE_GEO_LONGITUDE must be set together"
            ));
        }

        if self.ui.tick_ms == 0 {
            return Err(anyhow::anyhow!("HEALTHCARE_TICK_MS must be greater than zero"));
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(config.fixtures_path.is_none());
        assert_eq!(config.login_delay(), Duration::from_millis(1500));
        assert_eq!(config.video_connect_delay(), Duration::from_millis(2000));
        assert_eq!(config.tick(), Duration::from_millis(100));
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_fixture_file_fails_validation() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            fixtures_path: Some(dir.path().join("absent.json")),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_half_configured_geolocation_fails_validation() {
        let config = Config {
            geolocation: GeoConfig {
                latitude: Some(40.0),
                longitude: None,
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_env_var_reports_bad_values() {
        std::env::set_var("HEALTHCARE_TEST_BAD_NUMBER", "soon");
        let parsed: Result<Option<u64>> = parse_env_var("HEALTHCARE_TEST_BAD_NUMBER");
        assert!(parsed.is_err());
        assert_eq!(parse_env_var::<u64>("HEALTHCARE_TEST_UNSET_NUMBER").unwrap(), None);
    }
}
