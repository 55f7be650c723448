use crate::http::base_url::{BaseUrlSettings, BuildMode, DEV_SERVER_ORIGIN};
use crate::utils::error::{ClientError, Result};
use crate::utils::noise::DEFAULT_NOISE_PATTERN;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    pub mode: Option<BuildMode>,
    pub hostname: Option<String>,
    pub base_url: Option<String>,
    pub internal_url: Option<String>,
    pub dev_server_origin: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotificationConfig {
    pub suppress_patterns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ClientError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ClientError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PDQ_INTERNAL_URL})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ClientError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_url_settings(&self) -> BaseUrlSettings {
        let defaults = BaseUrlSettings::default();
        BaseUrlSettings {
            mode: self.server.mode.unwrap_or(defaults.mode),
            hostname: self.server.hostname.clone().unwrap_or(defaults.hostname),
            internal_url: self.server.internal_url.clone(),
            dev_server_origin: self
                .server
                .dev_server_origin
                .clone()
                .unwrap_or_else(|| DEV_SERVER_ORIGIN.to_string()),
            override_url: self.server.base_url.clone(),
        }
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.server.timeout_seconds.unwrap_or(60)
    }

    pub fn suppress_patterns(&self) -> Vec<String> {
        self.notifications
            .suppress_patterns
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_NOISE_PATTERN.to_string()])
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(hostname) = &self.server.hostname {
            validate_non_empty_string("server.hostname", hostname)?;
        }
        if let Some(url) = &self.server.base_url {
            validate_url("server.base_url", url)?;
        }
        if let Some(url) = &self.server.internal_url {
            validate_url("server.internal_url", url)?;
        }
        if let Some(origin) = &self.server.dev_server_origin {
            validate_url("server.dev_server_origin", origin)?;
        }
        validate_positive_number("server.timeout_seconds", self.timeout_seconds(), 1)?;
        Ok(())
    }
}
