use thiserror::Error;

/// Top-level error type for the `mistly-api` crate.
///
/// Only hard failures land here: token exchange problems, transport errors
/// and unreadable success bodies. A controller answering with a failure
/// status is *not* an error at this layer; the verbs report it as "no data"
/// (`Ok(None)` / `Ok(false)`) after logging the status and body.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The master token was rejected or the token endpoint misbehaved.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// An ephemeral token was needed (or revoked) but none is held.
    #[error("No ephemeral API token has been acquired")]
    TokenNotAcquired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Region name that maps to neither cloud.
    #[error("Unknown Mist cloud region '{0}' (expected 'global' or 'eu')")]
    UnknownRegion(String),

    /// TLS setup error (unreadable or invalid CA bundle).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the master credential is the likely culprit.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::TokenNotAcquired)
    }

    /// Returns `true` for network-level failures (unreachable, timeout).
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// First 200 bytes of a body, cut on a char boundary, for log lines.
pub(crate) fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
