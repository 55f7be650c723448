#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::http::base_url::BaseUrlSettings;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use crate::utils::error::Result;
use std::time::Duration;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

/// Fully merged settings used to bootstrap the client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: BaseUrlSettings,
    pub timeout: Duration,
    pub suppress_patterns: Vec<String>,
    pub verbose: bool,
    pub json_logs: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::from_file_config(&TomlConfig::default())
    }
}

impl ClientSettings {
    pub fn from_file_config(config: &TomlConfig) -> Self {
        Self {
            base_url: config.base_url_settings(),
            timeout: Duration::from_secs(config.timeout_seconds()),
            suppress_patterns: config.suppress_patterns(),
            verbose: config.verbose(),
            json_logs: config.json_logs(),
        }
    }

    pub fn resolved_base_url(&self) -> String {
        self.base_url.resolve()
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.resolved_base_url())?;
        validate_positive_number("timeout_seconds", self.timeout.as_secs(), 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::base_url::BuildMode;

    #[test]
    fn test_default_settings() {
        let settings = ClientSettings::default();
        assert_eq!(settings.resolved_base_url(), "http://localhost:8010/api");
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let settings = ClientSettings {
            timeout: Duration::from_millis(500),
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let dev = ClientSettings {
            base_url: BaseUrlSettings {
                mode: BuildMode::Development,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(dev.resolved_base_url(), "http://localhost:8080/api");
        assert!(dev.validate().is_ok());
    }
}
