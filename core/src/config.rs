//! Client configuration.
//!
//! # Design
//! Settings are fixed when a `Client` is constructed and read by every call
//! it makes. There is no process-wide mutable state; two clients with
//! different settings can coexist.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default time allowed to establish a connection.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default time allowed for a whole exchange, body included.
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Transport settings shared by every call of one `Client`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Default `User-Agent`. A per-call `User-Agent` header takes precedence.
    pub user_agent: Option<String>,
    pub connection_timeout: Duration,
    pub completion_timeout: Duration,
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
            use_system_proxy: true,
        }
    }
}

impl ClientConfig {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    /// Connect directly, ignoring proxy settings in the environment.
    pub fn without_system_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }

    /// Load settings from TOML. Missing keys keep their defaults.
    ///
    /// ```toml
    /// user_agent = "my-app/1.0"
    /// connection_timeout_secs = 5
    /// completion_timeout_secs = 12.5
    /// use_system_proxy = false
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.into_config()
    }
}

/// On-disk shape of `ClientConfig`, with timeouts in (fractional) seconds.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    user_agent: Option<String>,
    connection_timeout_secs: f64,
    completion_timeout_secs: f64,
    use_system_proxy: bool,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let defaults = ClientConfig::default();
        Self {
            user_agent: defaults.user_agent,
            connection_timeout_secs: defaults.connection_timeout.as_secs_f64(),
            completion_timeout_secs: defaults.completion_timeout.as_secs_f64(),
            use_system_proxy: defaults.use_system_proxy,
        }
    }
}

impl ConfigFile {
    fn into_config(self) -> Result<ClientConfig, ConfigError> {
        Ok(ClientConfig {
            user_agent: self.user_agent,
            connection_timeout: timeout_from_secs("connection_timeout_secs", self.connection_timeout_secs)?,
            completion_timeout: timeout_from_secs("completion_timeout_secs", self.completion_timeout_secs)?,
            use_system_proxy: self.use_system_proxy,
        })
    }
}

fn timeout_from_secs(field: &str, secs: f64) -> Result<Duration, ConfigError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{field} must be a positive number of seconds, got {secs}"
        )));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::Invalid(format!("{field}: {e}")))
}
