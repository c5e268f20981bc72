//! Frontend configuration.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use timeportal_session::SessionConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("page origin '{origin}' is not an absolute URL: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("login endpoint '{endpoint}' cannot be resolved: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// Paths the router registers. Login and landing views come from the
/// session config so guard redirects always land on a registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalRoutes {
    pub login: String,
    pub home: String,
    pub users: &'static str,
    pub settings: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub session: SessionConfig,

    /// URL the login form posts credentials to. A relative path is resolved
    /// against the page origin.
    pub login_endpoint: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            login_endpoint: "/api/auth/login".to_string(),
        }
    }
}

impl WebConfig {
    pub fn routes(&self) -> PortalRoutes {
        PortalRoutes {
            login: self.session.login_path.clone(),
            home: self.session.default_authenticated_path.clone(),
            users: "/users",
            settings: "/settings",
        }
    }

    /// Absolute login URL for a page served from `origin`.
    ///
    /// An absolute `login_endpoint` is returned unchanged.
    pub fn login_url(&self, origin: &str) -> Result<Url, EndpointError> {
        let base = Url::parse(origin).map_err(|err| EndpointError::InvalidOrigin {
            origin: origin.to_string(),
            reason: err.to_string(),
        })?;
        base.join(&self.login_endpoint)
            .map_err(|err| EndpointError::InvalidEndpoint {
                endpoint: self.login_endpoint.clone(),
                reason: err.to_string(),
            })
    }

    /// Configuration baked in at build time.
    ///
    /// The browser has no process environment, so overrides are read with
    /// `option_env!` when the bundle is compiled.
    pub fn from_build_env() -> Self {
        let defaults = Self::default();
        Self {
            session: SessionConfig {
                login_path: option_env!("TIMEPORTAL_LOGIN_PATH")
                    .map(str::to_string)
                    .unwrap_or(defaults.session.login_path),
                default_authenticated_path: option_env!("TIMEPORTAL_HOME_PATH")
                    .map(str::to_string)
                    .unwrap_or(defaults.session.default_authenticated_path),
                storage_prefix: option_env!("TIMEPORTAL_STORAGE_PREFIX")
                    .map(str::to_string)
                    .unwrap_or(defaults.session.storage_prefix),
            },
            login_endpoint: option_env!("TIMEPORTAL_LOGIN_ENDPOINT")
                .map(str::to_string)
                .unwrap_or(defaults.login_endpoint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_session_section() {
        let config: WebConfig = serde_json::from_str(
            r#"{ "login_endpoint": "https://api.example.com/login",
                 "session": { "default_authenticated_path": "/entries" } }"#,
        )
        .unwrap();

        assert_eq!(config.login_endpoint, "https://api.example.com/login");
        assert_eq!(config.session.default_authenticated_path, "/entries");
        assert_eq!(config.session.login_path, "/login");
    }

    #[test]
    fn default_endpoint_resolves_against_origin() {
        let url = WebConfig::default()
            .login_url("https://portal.example.com")
            .unwrap();
        assert_eq!(url.as_str(), "https://portal.example.com/api/auth/login");
        assert!(!url.cannot_be_a_base());
    }

    #[test]
    fn absolute_endpoint_ignores_origin() {
        let config = WebConfig {
            login_endpoint: "https://auth.example.com/login".to_string(),
            ..WebConfig::default()
        };
        let url = config.login_url("http://localhost:8080").unwrap();
        assert_eq!(url.as_str(), "https://auth.example.com/login");
    }

    #[test]
    fn relative_origin_is_rejected() {
        let err = WebConfig::default().login_url("/dashboard").unwrap_err();
        assert!(matches!(err, EndpointError::InvalidOrigin { .. }));
    }

    #[test]
    fn landing_route_follows_home_override() {
        let config = WebConfig {
            session: SessionConfig {
                default_authenticated_path: "/entries".to_string(),
                ..SessionConfig::default()
            },
            ..WebConfig::default()
        };

        let routes = config.routes();
        assert_eq!(routes.home, "/entries");
        assert_eq!(routes.login, "/login");
    }

    #[test]
    fn build_env_config_is_valid() {
        WebConfig::from_build_env().session.validate().unwrap();
    }
}
