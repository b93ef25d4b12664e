// API token lifecycle
//
// The long-lived master token is only ever used for two calls: minting an
// ephemeral token at startup and deleting it at shutdown. Everything in
// between authenticates with the ephemeral key.

use std::fmt;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::cloud::ApiPath;
use crate::error::{Error, preview};
use crate::models::ApiTokenRecord;

/// A short-lived API token minted from the master token.
#[derive(Clone)]
pub struct EphemeralToken {
    id: String,
    key: SecretString,
}

impl EphemeralToken {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn key(&self) -> &SecretString {
        &self.key
    }
}

impl fmt::Debug for EphemeralToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralToken")
            .field("id", &self.id)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Holds the master credential and, once acquired, the ephemeral one.
///
/// Revocation is one-shot: after [`revoke`](Self::revoke) succeeds the
/// manager holds no ephemeral token again, so a second revoke fails with
/// [`Error::TokenNotAcquired`] just like a revoke before any acquire.
#[derive(Debug)]
pub struct TokenManager {
    master: SecretString,
    ephemeral: Option<EphemeralToken>,
}

impl TokenManager {
    pub fn new(master: SecretString) -> Self {
        Self {
            master,
            ephemeral: None,
        }
    }

    /// The ephemeral token, if one is currently held.
    pub fn ephemeral(&self) -> Option<&EphemeralToken> {
        self.ephemeral.as_ref()
    }

    /// `Authorization` header value for regular calls.
    pub(crate) fn bearer(&self) -> Result<HeaderValue, Error> {
        let token = self.ephemeral.as_ref().ok_or(Error::TokenNotAcquired)?;
        token_header(&token.key)
    }

    /// Exchange the master token for an ephemeral one.
    ///
    /// `POST /api/v1/self/apitokens`. Anything but HTTP 200 is a hard
    /// failure: without a token no later call can succeed.
    pub async fn acquire(&mut self, http: &reqwest::Client, base: &Url) -> Result<(), Error> {
        let url = ApiPath::from("self/apitokens").resolve(base)?;
        debug!("requesting ephemeral API token at {url}");

        let resp = http
            .post(url)
            .header(AUTHORIZATION, token_header(&self.master)?)
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({}))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(Error::Authentication {
                message: format!("token request failed (HTTP {status}): {}", preview(&body)),
            });
        }

        let record: ApiTokenRecord =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            })?;

        debug!(token_id = %record.id, "ephemeral API token created");
        self.ephemeral = Some(EphemeralToken {
            id: record.id,
            key: SecretString::from(record.key),
        });
        Ok(())
    }

    /// Delete the ephemeral token.
    ///
    /// `DELETE /api/v1/self/apitokens/{id}`. Fails with
    /// [`Error::TokenNotAcquired`] when no token is held. The local token is
    /// dropped only once the controller confirms the deletion.
    pub async fn revoke(&mut self, http: &reqwest::Client, base: &Url) -> Result<(), Error> {
        let token = self.ephemeral.as_ref().ok_or(Error::TokenNotAcquired)?;
        let url = ApiPath::from(format!("self/apitokens/{}", token.id)).resolve(base)?;
        debug!("revoking ephemeral API token at {url}");

        let resp = http
            .delete(url)
            .header(AUTHORIZATION, token_header(&self.master)?)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("token revocation failed (HTTP {status}): {}", preview(&body)),
            });
        }

        debug!(token_id = %token.id, "ephemeral API token deleted");
        self.ephemeral = None;
        Ok(())
    }
}

fn token_header(secret: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Token {}", secret.expose_secret())).map_err(
        |e| Error::Authentication {
            message: format!("invalid API token header value: {e}"),
        },
    )?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bearer_requires_an_acquired_token() {
        let manager = TokenManager::new(SecretString::from("master".to_owned()));
        assert!(matches!(manager.bearer(), Err(Error::TokenNotAcquired)));
    }

    #[test]
    fn token_header_uses_token_scheme() {
        let header = token_header(&SecretString::from("abc123".to_owned())).unwrap();
        assert_eq!(header.to_str().unwrap(), "Token abc123");
        assert!(header.is_sensitive());
    }

    #[test]
    fn debug_output_redacts_key() {
        let token = EphemeralToken {
            id: "t1".into(),
            key: SecretString::from("super-secret".to_owned()),
        };
        let rendered = format!("{token:?}");
        assert!(rendered.contains("t1"));
        assert!(!rendered.contains("super-secret"));
    }
}
