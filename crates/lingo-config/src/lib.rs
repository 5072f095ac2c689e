//! Layered configuration for the lingo CLI.
//!
//! Values resolve from built-in defaults, then configuration files, then
//! `LINGO_*` environment variables, then command-line flags. The crate also
//! owns the per-environment credentials store kept in the configuration home.

mod auth;
mod defaults;
mod endpoint;
mod environment;
mod logging;

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{
    AUTH_FILE_NAME, AUTH_TEMPLATE, AuthError, AuthKey, AuthStore, create_auth_file_in_dir,
};
pub use defaults::{
    CONFIG_HOME_DIR, DEFAULT_LOG_FILTER, DEFAULT_SERVICE_HOST, DEFAULT_SERVICE_PORT,
    default_config_home, default_log_filter, default_log_filter_string, default_log_format,
    default_service_endpoint,
};
pub use endpoint::{EndpointParseError, ServiceEndpoint};
pub use environment::{Environment, EnvironmentParseError};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "LINGO")]
pub struct Config {
    /// Where the flow service listens.
    #[ortho_config(default = default_service_endpoint())]
    pub service_endpoint: ServiceEndpoint,
    /// Deployment environment selecting the credentials section.
    #[ortho_config(default = Environment::default())]
    pub environment: Environment,
    /// Directory holding the auth store; defaults to `~/.codelingo/configs`.
    pub config_home: Option<Utf8PathBuf>,
    /// `tracing` filter directive for diagnostics.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Diagnostic line format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Upper bound on a search, in seconds. Zero waits indefinitely.
    #[ortho_config(default = 0)]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_endpoint: default_service_endpoint(),
            environment: Environment::default(),
            config_home: None,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            request_timeout_secs: 0,
        }
    }
}

impl Config {
    /// Endpoint of the flow service.
    #[must_use]
    pub const fn service_endpoint(&self) -> &ServiceEndpoint {
        &self.service_endpoint
    }

    /// Active deployment environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Filter directive for diagnostics.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Format of diagnostic lines.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Deadline for a search, or `None` when searches may wait indefinitely.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Directory holding the auth store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigHomeError::Unresolved`] when no directory was
    /// configured and the user's home directory cannot be determined.
    pub fn config_home(&self) -> Result<Utf8PathBuf, ConfigHomeError> {
        match &self.config_home {
            Some(path) => Ok(path.clone()),
            None => default_config_home().ok_or(ConfigHomeError::Unresolved),
        }
    }
}

/// Errors raised while locating the configuration home.
#[derive(Debug, Error)]
pub enum ConfigHomeError {
    /// No explicit directory and no usable home directory.
    #[error("cannot determine the configuration home; set --config-home or LINGO_CONFIG_HOME")]
    Unresolved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_means_unbounded() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn positive_timeout_becomes_duration() {
        let config = Config {
            request_timeout_secs: 30,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn explicit_config_home_wins() {
        let config = Config {
            config_home: Some(Utf8PathBuf::from("/srv/lingo")),
            ..Config::default()
        };
        let home = config.config_home().expect("explicit home resolves");
        assert_eq!(home, Utf8PathBuf::from("/srv/lingo"));
    }
}
