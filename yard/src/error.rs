use thiserror::Error;

/// Error taxonomy for upstream calls.
///
/// Display strings double as the wire-level `error` messages the kiosk
/// client shows, so they stay short and free of upstream detail.
#[derive(Debug, Error)]
pub enum YardError {
    /// A required input was missing or empty after normalization.
    #[error("Missing data")]
    InvalidInput,

    /// Token exchange failed. Deliberately generic: upstream auth errors
    /// are never surfaced to the caller.
    #[error("Auth failed")]
    AuthFailed,

    /// Network-level failure: connect, timeout, TLS, or unreadable body.
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status on a call that surfaces it.
    #[error("{0}")]
    UpstreamRejected(String),
}
