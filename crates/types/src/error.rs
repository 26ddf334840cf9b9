//! Unified error type for the feegate workspace.

use thiserror::Error;

/// Enumerates all error kinds that can occur across feegate crates.
#[derive(Debug, Error)]
pub enum GateError {
    /// Network failure before any response arrived (DNS, connection refused,
    /// timeout). Never retried by the gateway itself.
    #[error("transport error: {0}")]
    Transport(String),

    /// Authentication failure: a 401 whose refresh attempt failed, or a
    /// refresh token absent when a refresh is required.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The request was aborted before it settled.
    ///
    /// `auto == true` means the request was superseded by a newer one under
    /// the same cancellation key; `auto == false` means an external
    /// `cancel(key)` call.
    #[error("request cancelled: key={key}, auto={auto}")]
    Cancelled { key: String, auto: bool },

    /// Any non-2xx response that the gateway does not recover from,
    /// propagated with status code and raw body.
    #[error("http error: status={status}, body={body}")]
    Http { status: u16, body: String },

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session store read/write error.
    #[error("session store error: {0}")]
    Store(String),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),
}

// ── Feature-gated From impls ──────────────────────────────────────────────────

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for GateError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl GateError {
    /// Returns `true` if the request was aborted (for any reason).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Returns `true` if the request was superseded by a newer one under the
    /// same cancellation key. Callers typically ignore these silently.
    #[must_use]
    pub fn is_auto_cancel(&self) -> bool {
        matches!(self, Self::Cancelled { auto: true, .. })
    }

    /// Returns `true` if the error is likely transient and worth retrying.
    ///
    /// Used by caller-level retry policies only; the gateway never retries on
    /// its own beyond the single 401 refresh-and-retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 408 | 429 | 500 | 502 | 503 | 504),
            Self::Transport(_) => true, // transport errors are retryable
            _ => false,
        }
    }
}
