use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use hyper::Uri;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_TOTAL_REQUESTS: usize = 5000;
pub const DEFAULT_CONCURRENCY: usize = 20;
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// One layer of run settings, as read from a JSON file or from the command line.
/// Unset fields fall through to the next layer and finally to the defaults.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub total_requests: Option<usize>,

    #[serde(default)]
    pub concurrency: Option<usize>,

    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl PartialRunConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fields set in `overrides` win over the ones in `self`.
    pub fn merge(self, overrides: PartialRunConfig) -> PartialRunConfig {
        PartialRunConfig {
            target: overrides.target.or(self.target),
            total_requests: overrides.total_requests.or(self.total_requests),
            concurrency: overrides.concurrency.or(self.concurrency),
            timeout_ms: overrides.timeout_ms.or(self.timeout_ms),
        }
    }

    pub fn resolve(self) -> Result<RunConfig, ConfigError> {
        let target = self.target.ok_or(ConfigError::MissingTarget)?;

        Ok(RunConfig {
            target,
            total_requests: self.total_requests.unwrap_or(DEFAULT_TOTAL_REQUESTS),
            concurrency: self.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
            timeout: Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
        })
    }
}

/// Immutable description of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub target: String,
    pub total_requests: usize,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl RunConfig {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            total_requests: DEFAULT_TOTAL_REQUESTS,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_total_requests(mut self, total_requests: usize) -> Self {
        self.total_requests = total_requests;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks every setting and returns the request URI the workers will hit.
    pub fn validate(&self) -> Result<Uri, ConfigError> {
        let url = Url::parse(&self.target).map_err(|source| ConfigError::InvalidUrl {
            url: self.target.clone(),
            source,
        })?;

        if url.scheme() != "http" {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        url.as_str()
            .parse::<Uri>()
            .map_err(|source| ConfigError::InvalidUri {
                url: self.target.clone(),
                source,
            })
    }
}
