use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_path: PathBuf,

    // Web Server
    pub web_host: String,
    pub web_port: u16,

    // Sessions
    pub session_cookie_secure: bool,
    pub session_cleanup_interval: Duration,

    // Feed
    pub search_debounce: Duration,

    // Mobile shell packaging
    pub app_id: String,
    pub app_name: String,
    pub splash_background_color: String,
    pub splash_duration: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Database
            database_path: PathBuf::from(env_or_default("DATABASE_PATH", "./data/swing.sqlite")),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,

            // Sessions
            session_cookie_secure: parse_env_bool("SESSION_COOKIE_SECURE", true)?,
            session_cleanup_interval: Duration::from_secs(parse_env_u64(
                "SESSION_CLEANUP_INTERVAL_SECS",
                3600,
            )?),

            // Feed
            search_debounce: Duration::from_millis(parse_env_u64("SEARCH_DEBOUNCE_MS", 300)?),

            // Mobile shell packaging
            app_id: env_or_default("APP_ID", "app.swing.mobile"),
            app_name: env_or_default("APP_NAME", "Swing"),
            splash_background_color: env_or_default("SPLASH_BACKGROUND_COLOR", "#ffffffff"),
            splash_duration: Duration::from_millis(parse_env_u64("SPLASH_DURATION_MS", 3000)?),
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.web_port == 0 {
            return Err(ConfigError::InvalidValue {
                name: "WEB_PORT".to_string(),
                message: "must be between 1 and 65535".to_string(),
            });
        }
        let debounce_ms = self.search_debounce.as_millis();
        if debounce_ms == 0 || debounce_ms > 5000 {
            return Err(ConfigError::InvalidValue {
                name: "SEARCH_DEBOUNCE_MS".to_string(),
                message: format!("must be between 1 and 5000, got {debounce_ms}"),
            });
        }
        if self.session_cleanup_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_CLEANUP_INTERVAL_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.app_id.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "APP_ID".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.app_name.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "APP_NAME".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if !is_hex_color(&self.splash_background_color) {
            return Err(ConfigError::InvalidValue {
                name: "SPLASH_BACKGROUND_COLOR".to_string(),
                message: format!(
                    "must be #RRGGBB or #RRGGBBAA, got '{}'",
                    self.splash_background_color
                ),
            });
        }
        Ok(())
    }

    /// Search debounce delay in whole milliseconds, as handed to the browser.
    #[must_use]
    pub fn search_debounce_ms(&self) -> u64 {
        u64::try_from(self.search_debounce.as_millis()).unwrap_or(u64::MAX)
    }
}

fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_bool() {
        assert!(parse_env_bool("SWING_NONEXISTENT_VAR", true).unwrap());
        assert!(!parse_env_bool("SWING_NONEXISTENT_VAR", false).unwrap());
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#ffffff"));
        assert!(is_hex_color("#FFFFFFFF"));
        assert!(is_hex_color("#1a2B3c"));
        assert!(!is_hex_color("ffffff"));
        assert!(!is_hex_color("#fff"));
        assert!(!is_hex_color("#gggggg"));
    }

    #[test]
    #[serial]
    fn test_defaults() {
        std::env::remove_var("SEARCH_DEBOUNCE_MS");
        std::env::remove_var("WEB_PORT");
        let config = Config::from_env().unwrap();
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.search_debounce_ms(), 300);
        assert_eq!(config.web_port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_invalid_integer_is_reported() {
        std::env::set_var("WEB_PORT", "eighty");
        let result = Config::from_env();
        std::env::remove_var("WEB_PORT");
        assert!(matches!(result, Err(ConfigError::ParseInt { name, .. }) if name == "WEB_PORT"));
    }

    #[test]
    #[serial]
    fn test_validate_rejects_bad_values() {
        std::env::remove_var("SEARCH_DEBOUNCE_MS");
        let mut config = Config::from_env().unwrap();
        config.search_debounce = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = Config::from_env().unwrap();
        config.splash_background_color = "white".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::from_env().unwrap();
        config.app_name = String::new();
        assert!(config.validate().is_err());
    }
}
