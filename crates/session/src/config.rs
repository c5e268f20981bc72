//! Session routing and storage configuration.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where unauthenticated visitors are sent.
    pub login_path: String,

    /// Landing view for authenticated visitors who lack a role or permission.
    pub default_authenticated_path: String,

    /// Prepended to the `token` and `user` storage slots.
    pub storage_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            default_authenticated_path: "/dashboard".to_string(),
            storage_prefix: String::new(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be an absolute path starting with '/', got '{value}'")]
    RelativePath { field: &'static str, value: String },
}

impl SessionConfig {
    /// Read overrides from `TIMEPORTAL_LOGIN_PATH`, `TIMEPORTAL_HOME_PATH` and
    /// `TIMEPORTAL_STORAGE_PREFIX`, falling back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            login_path: std::env::var("TIMEPORTAL_LOGIN_PATH").unwrap_or(defaults.login_path),
            default_authenticated_path: std::env::var("TIMEPORTAL_HOME_PATH")
                .unwrap_or(defaults.default_authenticated_path),
            storage_prefix: std::env::var("TIMEPORTAL_STORAGE_PREFIX")
                .unwrap_or(defaults.storage_prefix),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_absolute("login_path", &self.login_path)?;
        ensure_absolute("default_authenticated_path", &self.default_authenticated_path)?;
        Ok(())
    }

    pub fn token_key(&self) -> String {
        format!("{}token", self.storage_prefix)
    }

    pub fn user_key(&self) -> String {
        format!("{}user", self.storage_prefix)
    }
}

fn ensure_absolute(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with('/') {
        Ok(())
    } else {
        Err(ConfigError::RelativePath {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_portal_keys() {
        let config = SessionConfig::default();
        config.validate().unwrap();
        assert_eq!(config.token_key(), "token");
        assert_eq!(config.user_key(), "user");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "storage_prefix": "tp." }"#).unwrap();
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.token_key(), "tp.token");
    }

    #[test]
    fn rejects_relative_paths() {
        let config = SessionConfig {
            default_authenticated_path: "dashboard".to_string(),
            ..SessionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::RelativePath {
                field: "default_authenticated_path",
                value: "dashboard".to_string(),
            })
        );
    }
}
