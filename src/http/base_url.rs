use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEV_PROXY_PATH: &str = "/api";
pub const LOCAL_API_URL: &str = "http://localhost:8010/api";
pub const INTERNAL_API_URL: &str = "http://10.3.35.21:8010/api";
pub const DEV_SERVER_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    #[default]
    Production,
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(BuildMode::Development),
            "production" | "prod" => Ok(BuildMode::Production),
            other => Err(format!("unknown build mode: {}", other)),
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Development => f.write_str("development"),
            BuildMode::Production => f.write_str("production"),
        }
    }
}

/// 依建置模式與主機名稱選擇 API 位址（純函式）
pub fn resolve_base_url(mode: BuildMode, hostname: &str) -> &'static str {
    if mode == BuildMode::Development {
        return DEV_PROXY_PATH;
    }
    if is_local_host(hostname) {
        LOCAL_API_URL
    } else {
        INTERNAL_API_URL
    }
}

pub fn is_local_host(hostname: &str) -> bool {
    hostname == "localhost" || hostname == "127.0.0.1"
}

/// Everything needed to turn a [`BuildMode`] and hostname into an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrlSettings {
    pub mode: BuildMode,
    pub hostname: String,
    /// Replaces [`INTERNAL_API_URL`] for non-local hosts
    pub internal_url: Option<String>,
    /// Origin the development proxy path is served from
    pub dev_server_origin: String,
    /// Skips resolution entirely
    pub override_url: Option<String>,
}

impl Default for BaseUrlSettings {
    fn default() -> Self {
        Self {
            mode: BuildMode::Production,
            hostname: "localhost".to_string(),
            internal_url: None,
            dev_server_origin: DEV_SERVER_ORIGIN.to_string(),
            override_url: None,
        }
    }
}

impl BaseUrlSettings {
    pub fn resolve(&self) -> String {
        if let Some(url) = &self.override_url {
            return url.clone();
        }

        let selected = resolve_base_url(self.mode, &self.hostname);
        match selected {
            DEV_PROXY_PATH => format!(
                "{}{}",
                self.dev_server_origin.trim_end_matches('/'),
                DEV_PROXY_PATH
            ),
            INTERNAL_API_URL => self
                .internal_url
                .clone()
                .unwrap_or_else(|| INTERNAL_API_URL.to_string()),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_table() {
        assert_eq!(resolve_base_url(BuildMode::Development, "localhost"), "/api");
        assert_eq!(resolve_base_url(BuildMode::Development, "example.org"), "/api");
        assert_eq!(
            resolve_base_url(BuildMode::Production, "localhost"),
            "http://localhost:8010/api"
        );
        assert_eq!(
            resolve_base_url(BuildMode::Production, "127.0.0.1"),
            "http://localhost:8010/api"
        );
        assert_eq!(
            resolve_base_url(BuildMode::Production, "intranet.local"),
            "http://10.3.35.21:8010/api"
        );
    }

    #[test]
    fn test_settings_join_dev_origin() {
        let settings = BaseUrlSettings {
            mode: BuildMode::Development,
            dev_server_origin: "http://127.0.0.1:8080/".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.resolve(), "http://127.0.0.1:8080/api");
    }

    #[test]
    fn test_internal_url_override() {
        let settings = BaseUrlSettings {
            hostname: "10.0.0.5".to_string(),
            internal_url: Some("http://data.corp:9000/api".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.resolve(), "http://data.corp:9000/api");

        // 本機不受影響
        let local = BaseUrlSettings {
            internal_url: Some("http://data.corp:9000/api".to_string()),
            ..Default::default()
        };
        assert_eq!(local.resolve(), LOCAL_API_URL);
    }

    #[test]
    fn test_explicit_override_wins() {
        let settings = BaseUrlSettings {
            mode: BuildMode::Development,
            override_url: Some("http://127.0.0.1:5555/api".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.resolve(), "http://127.0.0.1:5555/api");
    }

    #[test]
    fn test_build_mode_parsing() {
        assert_eq!("dev".parse::<BuildMode>().unwrap(), BuildMode::Development);
        assert_eq!("Production".parse::<BuildMode>().unwrap(), BuildMode::Production);
        assert!("staging".parse::<BuildMode>().is_err());
    }
}
