//! Portal configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::fmt;

pub const DEFAULT_BASE_URL: &str = "http://85.198.90.80:8000";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {var}={value:?}: {reason}")]
    Parse { var: &'static str, value: String, reason: &'static str },
}

/// Where user-facing failure messages come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageSource {
    /// A fixed per-call message; the server body is discarded.
    #[default]
    Fixed,
    /// The server's error detail when it sends one, else the fixed message.
    Server,
}

impl fmt::Display for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fixed => "fixed",
            Self::Server => "server",
        })
    }
}

/// Transport timeouts. `request_secs = None` waits indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: None, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub base_url: String,
    pub messages: MessageSource,
    pub timeouts: Timeouts,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            messages: MessageSource::default(),
            timeouts: Timeouts::default(),
        }
    }
}

impl PortalConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORTAL_BASE_URL`: API origin, default [`DEFAULT_BASE_URL`]
    /// - `PORTAL_ERROR_MESSAGES`: `fixed` (default) or `server`
    /// - `PORTAL_REQUEST_TIMEOUT_SECS`: unset means no request timeout
    /// - `PORTAL_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `PORTAL_ERROR_MESSAGES` is not a known source or a
    /// timeout is not a whole number of seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PortalConfig::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`PortalConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("PORTAL_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let messages = parse_message_source(lookup("PORTAL_ERROR_MESSAGES").as_deref())?;
        let timeouts = Timeouts {
            request_secs: parse_secs("PORTAL_REQUEST_TIMEOUT_SECS", lookup("PORTAL_REQUEST_TIMEOUT_SECS").as_deref())?,
            connect_secs: parse_secs("PORTAL_CONNECT_TIMEOUT_SECS", lookup("PORTAL_CONNECT_TIMEOUT_SECS").as_deref())?
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self::default().with_base_url(&base_url).with_messages(messages).with_timeouts(timeouts))
    }

    /// Replace the origin, dropping trailing slashes.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        base_url.trim().trim_end_matches('/').clone_into(&mut self.base_url);
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: MessageSource) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

/// Parse a message source name; `None` means the default.
///
/// # Errors
///
/// Returns an error for anything other than `fixed` or `server`.
pub fn parse_message_source(raw: Option<&str>) -> Result<MessageSource, ConfigError> {
    match raw.map(str::trim).unwrap_or("fixed") {
        "fixed" | "" => Ok(MessageSource::Fixed),
        "server" => Ok(MessageSource::Server),
        other => Err(ConfigError::Parse {
            var: "PORTAL_ERROR_MESSAGES",
            value: other.to_owned(),
            reason: "expected `fixed` or `server`",
        }),
    }
}

/// Unset or blank means "not configured".
fn parse_secs(var: &'static str, raw: Option<&str>) -> Result<Option<u64>, ConfigError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<u64>().map(Some).map_err(|_| ConfigError::Parse {
        var,
        value: trimmed.to_owned(),
        reason: "expected whole seconds",
    })
}
