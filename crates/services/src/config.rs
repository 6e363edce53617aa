use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API base url `{value}`: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
    #[error("{name} must be a non-negative integer, got `{value}`")]
    InvalidNumber { name: &'static str, value: String },
}

/// Where the backend lives and how the client talks to it.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
    sync_debounce: Option<Duration>,
}

impl ClientConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` unless `base_url` is an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: DEFAULT_HTTP_TIMEOUT,
            sync_debounce: None,
        })
    }

    /// Reads `CODEBLUE_API_BASE_URL`, `CODEBLUE_HTTP_TIMEOUT_SECS` and
    /// `CODEBLUE_SYNC_DEBOUNCE_MS`, falling back to defaults for unset values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("CODEBLUE_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let mut config = Self::new(&base_url)?;

        if let Some(secs) = env_number("CODEBLUE_HTTP_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(ms) = env_number("CODEBLUE_SYNC_DEBOUNCE_MS")? {
            config.sync_debounce = (ms > 0).then(|| Duration::from_millis(ms));
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` for an unusable URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_sync_debounce(mut self, debounce: Option<Duration>) -> Self {
        self.sync_debounce = debounce;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn sync_debounce(&self) -> Option<Duration> {
        self.sync_debounce
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    #[must_use]
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        value: value.to_owned(),
        reason,
    };
    let url = Url::parse(value.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base url".to_owned()));
    }
    Ok(url)
}

fn env_number(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_encoded_segments() {
        let config = ClientConfig::new("http://10.0.0.5:8000/api/").unwrap();
        let url = config.endpoint(&["enrollments", "-Nx 1", "progress"]);
        assert_eq!(
            url.as_str(),
            "http://10.0.0.5:8000/api/enrollments/-Nx%201/progress"
        );
    }

    #[test]
    fn endpoint_without_trailing_slash() {
        let config = ClientConfig::new(DEFAULT_API_BASE_URL).unwrap();
        assert_eq!(
            config.endpoint(&["trials", "available"]).as_str(),
            "http://127.0.0.1:8000/api/trials/available"
        );
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(ClientConfig::new("ftp://example.org").is_err());
        assert!(ClientConfig::new("not a url").is_err());
        assert!(ClientConfig::new("mailto:a@b.c").is_err());
    }
}
