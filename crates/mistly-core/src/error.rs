// ── Core error types ──
//
// Hard failures of the reconcilers. Soft remote failures of a mutating call
// never show up here: they are logged and surface as `Rejected` outcomes or
// `false`. A refused existence listing is hard (`ListingRefused`), since
// acting on it could duplicate a remote entity. The `From<mistly_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("No {field} configured (set {env} or '{field}' in the configuration document)")]
    NoCredentials { field: String, env: String },

    // ── Entity state errors ──────────────────────────────────────────
    #[error("{kind} '{key}' does not exist on the Mist cloud")]
    NotFound { kind: String, key: String },

    #[error("AP {mac} does not belong to a site")]
    NotAssigned { mac: String },

    /// The listing that decides existence came back empty-handed, so
    /// whether the entity exists is unknown.
    #[error("Could not look up {kind} '{key}': the Mist cloud refused the listing")]
    ListingRefused { kind: String, key: String },

    #[error("{kind} '{key}' was deleted; this handle can no longer be used")]
    HandleRetired { kind: String, key: String },

    // ── Remote errors (wrapped, not exposed raw) ─────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot reach the Mist cloud at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("API error: {message}")]
    Api { message: String },
}

impl CoreError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Whether this error comes from local configuration rather than the cloud.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::Validation { .. } | Self::NoCredentials { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mistly_api::Error> for CoreError {
    fn from(err: mistly_api::Error) -> Self {
        match err {
            mistly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            mistly_api::Error::TokenNotAcquired => CoreError::AuthenticationFailed {
                message: "no ephemeral API token has been acquired".into(),
            },
            mistly_api::Error::Transport(ref e) if e.is_timeout() || e.is_connect() => {
                CoreError::ConnectionFailed {
                    url: e
                        .url()
                        .map_or_else(|| "<unknown>".into(), ToString::to_string),
                    reason: e.to_string(),
                }
            }
            mistly_api::Error::UnknownRegion(region) => CoreError::Validation {
                field: "cloud".into(),
                reason: format!("unknown region '{region}'"),
            },
            other => CoreError::Api {
                message: other.to_string(),
            },
        }
    }
}
