use std::path::PathBuf;

use thiserror::Error;

/// Problems detected before any request is dispatched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no target URL given; pass --url or set `target` in the config file")]
    MissingTarget,

    #[error("invalid target URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("unsupported URL scheme `{0}`; this tool only speaks plain HTTP over TCP, https is not supported")]
    UnsupportedScheme(String),

    #[error("target URL `{url}` is not a valid request URI: {source}")]
    InvalidUri {
        url: String,
        source: hyper::http::uri::InvalidUri,
    },

    #[error("worker concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("per-request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("cannot hold results for {0} requests; lower the request count")]
    TooManyRequests(usize),

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("load worker panicked: {0}")]
    WorkerPanicked(#[from] tokio::task::JoinError),

    #[error("request {index} finished without recording an outcome")]
    MissingOutcome { index: usize },
}
