use std::fmt;

use thiserror::Error;

/// Why a single exchange did not produce a status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("connection refused or host unreachable: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("connection closed unexpectedly")]
    Closed,

    #[error("request failed: {0}")]
    Other(String),
}

impl RequestError {
    pub fn from_hyper(err: &hyper::Error) -> Self {
        if err.is_connect() {
            RequestError::Connect(err.to_string())
        } else if err.is_timeout() {
            RequestError::Timeout
        } else if err.is_closed() || err.is_incomplete_message() {
            RequestError::Closed
        } else {
            RequestError::Other(err.to_string())
        }
    }

    /// Short label used as the breakdown key.
    pub fn kind(&self) -> &'static str {
        match self {
            RequestError::Connect(_) => "CONNECT_ERROR",
            RequestError::Timeout => "TIMEOUT",
            RequestError::Closed => "CONNECTION_CLOSED",
            RequestError::Other(_) => "REQUEST_ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The server answered; any status code counts as completed.
    Completed { status: u16 },
    Failed { reason: RequestError },
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Completed { status: 200 })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RequestOutcome::Failed { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RequestOutcome::Completed { status } => Some(*status),
            RequestOutcome::Failed { .. } => None,
        }
    }
}

impl fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestOutcome::Completed { status } => write!(f, "{}", status),
            RequestOutcome::Failed { reason } => f.write_str(reason.kind()),
        }
    }
}

impl From<Result<u16, RequestError>> for RequestOutcome {
    fn from(result: Result<u16, RequestError>) -> Self {
        match result {
            Ok(status) => RequestOutcome::Completed { status },
            Err(reason) => RequestOutcome::Failed { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_status_200_is_success() {
        assert!(RequestOutcome::Completed { status: 200 }.is_success());
        assert!(!RequestOutcome::Completed { status: 201 }.is_success());
        assert!(!RequestOutcome::Completed { status: 500 }.is_success());
        assert!(!RequestOutcome::Failed {
            reason: RequestError::Timeout
        }
        .is_success());
    }

    #[test]
    fn non_200_is_still_completed() {
        let outcome = RequestOutcome::from(Ok(404));
        assert!(!outcome.is_failed());
        assert_eq!(outcome.status(), Some(404));
        assert_eq!(outcome.to_string(), "404");
    }

    #[test]
    fn failures_render_their_kind() {
        let outcome = RequestOutcome::from(Err(RequestError::Connect("refused".into())));
        assert!(outcome.is_failed());
        assert_eq!(outcome.status(), None);
        assert_eq!(outcome.to_string(), "CONNECT_ERROR");
        assert_eq!(RequestError::Closed.kind(), "CONNECTION_CLOSED");
        assert_eq!(RequestError::Other("x".into()).kind(), "REQUEST_ERROR");
    }
}
