use thiserror::Error;

/// Top-level error type for the `espanel-api` crate.
///
/// Covers every failure mode of the device's REST surface: transport,
/// non-success HTTP status, malformed payloads, and exhausted button
/// identifier fallbacks. `espanel-core` maps these into user-facing
/// diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Device address could not be parsed into a URL.
    #[error("Invalid device address: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Device API ──────────────────────────────────────────────────
    /// Non-success HTTP status from the device.
    #[error("Device returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Button dispatch ─────────────────────────────────────────────
    /// Every candidate identifier for a button press was rejected.
    /// `tried` lists the identifiers in attempt order.
    #[error("Button not found on device (tried: {})", tried.join(", "))]
    ButtonNotFound { tried: Vec<String> },
}

impl Error {
    /// Returns `true` if the device rejected the entity identifier.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Http { status, .. } => *status == 404,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying manually.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
