use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: connection refused, DNS, timeout, or a
    /// body that did not parse as the expected shape.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status. `message` carries the
    /// server's own `error` string verbatim when the body had one, or a
    /// generic fallback otherwise.
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    pub(crate) fn from_status(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| format!("server returned HTTP {status}"));
        ApiError::Server { status, message }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Server { status: 401, .. })
    }

    /// True for failures that suggest the server is down or unreachable
    /// rather than rejecting the request.
    pub fn is_unreachable(&self) -> bool {
        match self {
            ApiError::Http(e) => e.is_connect() || e.is_timeout(),
            ApiError::Server { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
