use camino::Utf8PathBuf;

use crate::endpoint::ServiceEndpoint;
use crate::logging::LogFormat;

/// Default host of the flow service.
pub const DEFAULT_SERVICE_HOST: &str = "127.0.0.1";

/// Default TCP port of the flow service.
pub const DEFAULT_SERVICE_PORT: u16 = 8001;

/// Default log filter expression; the CLI stays quiet unless asked.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Directory below the user's home holding lingo configuration.
pub const CONFIG_HOME_DIR: &str = ".codelingo/configs";

/// Default log filter expression used by the CLI.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the CLI.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Endpoint used when no configuration layer names one.
#[must_use]
pub fn default_service_endpoint() -> ServiceEndpoint {
    ServiceEndpoint::tcp(DEFAULT_SERVICE_HOST, DEFAULT_SERVICE_PORT)
}

/// Resolves `~/.codelingo/configs`, when a home directory is known and valid
/// UTF-8.
#[must_use]
pub fn default_config_home() -> Option<Utf8PathBuf> {
    let home = dirs::home_dir()?;
    let home = Utf8PathBuf::from_path_buf(home).ok()?;
    Some(home.join(CONFIG_HOME_DIR))
}
