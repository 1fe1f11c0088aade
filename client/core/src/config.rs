//! Client configuration

use crate::error::{AdminError, AdminResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default API base URL (the Next.js frontend proxies `/api` to the backend)
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Persisted admin client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// API base URL, without the `/api` prefix
    pub api_url: String,
    /// Bearer token forwarded with every request
    pub api_token: Option<String>,
    /// Output format used by the CLI when none is given
    pub default_format: Option<String>,
    /// Page size for list requests
    pub page_size: u32,
    /// Backend search debounce
    pub search_debounce_ms: u64,
    /// Logging level (overridden by RUST_LOG)
    pub log_level: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            api_token: None,
            default_format: None,
            page_size: 50,
            search_debounce_ms: 300,
            log_level: "warn".into(),
        }
    }
}

impl AdminConfig {
    /// Load the config for `profile`, falling back to defaults when the file is absent
    pub fn load(profile: Option<&str>) -> AdminResult<Self> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> AdminResult<Self> {
        toml::from_str(content).map_err(|e| AdminError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> AdminResult<String> {
        toml::to_string_pretty(self).map_err(|e| AdminError::Config(e.to_string()))
    }

    pub fn save(&self, profile: Option<&str>) -> AdminResult<PathBuf> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.to_toml()?)?;
        Ok(path)
    }

    /// Read a single key as a string, `None` if the key is unset
    pub fn get(&self, key: &str) -> AdminResult<Option<String>> {
        let value = match key {
            "api_url" => Some(self.api_url.clone()),
            "api_token" => self.api_token.clone(),
            "default_format" => self.default_format.clone(),
            "page_size" => Some(self.page_size.to_string()),
            "search_debounce_ms" => Some(self.search_debounce_ms.to_string()),
            "log_level" => Some(self.log_level.clone()),
            other => return Err(AdminError::Config(format!("unknown key: {}", other))),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> AdminResult<()> {
        let parse_err = |e: std::num::ParseIntError| AdminError::Config(format!("{}: {}", key, e));
        match key {
            "api_url" => self.api_url = value.trim_end_matches('/').to_string(),
            "api_token" => self.api_token = Some(value.to_string()),
            "default_format" => self.default_format = Some(value.to_string()),
            "page_size" => self.page_size = value.parse().map_err(parse_err)?,
            "search_debounce_ms" => self.search_debounce_ms = value.parse().map_err(parse_err)?,
            "log_level" => self.log_level = value.to_string(),
            other => return Err(AdminError::Config(format!("unknown key: {}", other))),
        }
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &[
            "api_url",
            "api_token",
            "default_format",
            "page_size",
            "search_debounce_ms",
            "log_level",
        ]
    }

    fn config_path(profile: Option<&str>) -> AdminResult<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AdminError::Config("cannot find home directory".into()))?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".campus-admin").join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AdminConfig::from_toml("api_url = \"https://ogs.example.org\"").unwrap();
        assert_eq!(config.api_url, "https://ogs.example.org");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.search_debounce_ms, 300);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut config = AdminConfig::default();
        config.set("page_size", "25").unwrap();
        config.set("api_url", "https://ogs.example.org/").unwrap();
        assert_eq!(config.get("page_size").unwrap().as_deref(), Some("25"));
        assert_eq!(config.get("api_url").unwrap().as_deref(), Some("https://ogs.example.org"));
        assert!(config.set("page_size", "many").is_err());
        assert!(config.get("colour").is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = AdminConfig::default();
        config.api_token = Some("secret".into());
        let text = config.to_toml().unwrap();
        let parsed = AdminConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
