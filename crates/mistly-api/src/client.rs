// Mist API HTTP client
//
// Wraps `reqwest::Client` with region-aware URL construction, per-call
// token injection and response normalization. Resource endpoints (sites,
// wlans, devices, inventory) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use crate::auth::TokenManager;
use crate::cloud::{ApiPath, Cloud, normalize_base};
use crate::error::{Error, preview};
use crate::transport::TransportConfig;

/// Everything needed to open a session against the Mist cloud.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub cloud: Cloud,
    /// Organization every org-scoped call targets. Fixed for the client's lifetime.
    pub org_id: String,
    /// Long-lived master token, used only to mint and revoke the ephemeral one.
    pub master_token: SecretString,
    pub transport: TransportConfig,
}

/// HTTP client for the Mist cloud API.
///
/// Owns one connection pool and one ephemeral API token for its whole
/// lifetime. Calls are meant to be awaited one after another: the
/// reconcilers built on top probe then act without any locking, so two
/// reconciliations of the same entity must never run concurrently.
///
/// Verb contract:
/// - [`get`](Self::get), [`post`](Self::post), [`put`](Self::put) return
///   `Ok(Some(body))` on success and `Ok(None)` on a failure status (>= 400),
///   after logging status and body.
/// - [`delete`](Self::delete) returns `Ok(true)` only for HTTP 200 exactly.
/// - Transport failures and unparseable success bodies are `Err`.
pub struct MistClient {
    http: reqwest::Client,
    base_url: Url,
    cloud: Option<Cloud>,
    org_id: String,
    tokens: TokenManager,
}

impl MistClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Open a session against the region selected in `settings`.
    pub async fn connect(settings: &ClientSettings) -> Result<Self, Error> {
        let base_url = Url::parse(settings.cloud.base_url())?;
        let mut client = Self::connect_at(base_url, settings).await?;
        client.cloud = Some(settings.cloud);
        Ok(client)
    }

    /// Open a session against an explicit root URL (mock servers, private
    /// deployments). `settings.cloud` is ignored.
    pub async fn connect_at(base_url: Url, settings: &ClientSettings) -> Result<Self, Error> {
        let http = settings.transport.build_client()?;
        Self::connect_with(http, base_url, settings).await
    }

    /// Open a session with a pre-built `reqwest::Client`.
    pub async fn connect_with(
        http: reqwest::Client,
        base_url: Url,
        settings: &ClientSettings,
    ) -> Result<Self, Error> {
        debug!("initializing connection to the Mist API");
        let base_url = normalize_base(base_url);
        let mut tokens = TokenManager::new(settings.master_token.clone());
        tokens.acquire(&http, &base_url).await?;

        Ok(Self {
            http,
            base_url,
            cloud: None,
            org_id: settings.org_id.clone(),
            tokens,
        })
    }

    /// Revoke the ephemeral token and drop the connection pool.
    ///
    /// Consumes the client: nothing can be issued with a revoked token.
    pub async fn close(mut self) -> Result<(), Error> {
        self.tokens.revoke(&self.http, &self.base_url).await?;
        debug!("connection to the Mist API closed");
        Ok(())
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The organization this client is bound to.
    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// The root URL every path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The region, when the client was opened with [`connect`](Self::connect).
    pub fn cloud(&self) -> Option<Cloud> {
        self.cloud
    }

    /// The token manager (for inspecting the ephemeral token id).
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn prepare(
        &self,
        method: reqwest::Method,
        path: &ApiPath,
    ) -> Result<reqwest::RequestBuilder, Error> {
        let url = path.resolve(&self.base_url)?;
        debug!("Sending API {method} CALL: {url}");
        Ok(self
            .http
            .request(method, url)
            .header(AUTHORIZATION, self.tokens.bearer()?)
            .header(CONTENT_TYPE, "application/json"))
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    /// `GET` a path; `Ok(None)` when the controller answers with a failure status.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: impl Into<ApiPath>,
    ) -> Result<Option<T>, Error> {
        let path = path.into();
        let resp = self.prepare(reqwest::Method::GET, &path)?.send().await?;
        verify_response(&path, resp).await
    }

    /// `POST` a JSON body; `Ok(None)` on a failure status.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: impl Into<ApiPath>,
        body: &B,
    ) -> Result<Option<T>, Error> {
        let path = path.into();
        let resp = self
            .prepare(reqwest::Method::POST, &path)?
            .json(body)
            .send()
            .await?;
        verify_response(&path, resp).await
    }

    /// `PUT` a JSON body; `Ok(None)` on a failure status.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: impl Into<ApiPath>,
        body: &B,
    ) -> Result<Option<T>, Error> {
        let path = path.into();
        let resp = self
            .prepare(reqwest::Method::PUT, &path)?
            .json(body)
            .send()
            .await?;
        verify_response(&path, resp).await
    }

    /// `DELETE` a path; `Ok(true)` only when the controller answers HTTP 200.
    pub async fn delete(&self, path: impl Into<ApiPath>) -> Result<bool, Error> {
        let path = path.into();
        let resp = self.prepare(reqwest::Method::DELETE, &path)?.send().await?;

        let status = resp.status();
        debug!(status = status.as_u16(), "API CALL Status Code");
        if status == reqwest::StatusCode::OK {
            return Ok(true);
        }

        let body = resp.text().await.unwrap_or_default();
        error!(
            status = status.as_u16(),
            path = %path,
            body = preview(&body),
            "API Call error {status}"
        );
        Ok(false)
    }
}

/// Parse a success body, or log and swallow a failure status.
async fn verify_response<T: DeserializeOwned>(
    path: &ApiPath,
    resp: reqwest::Response,
) -> Result<Option<T>, Error> {
    let status = resp.status();
    let body = resp.text().await?;
    debug!(status = status.as_u16(), "API CALL Status Code");

    if status.as_u16() >= 400 {
        error!(
            status = status.as_u16(),
            path = %path,
            body = preview(&body),
            "API Call error {status}"
        );
        return Ok(None);
    }

    let raw = if body.trim().is_empty() { "null" } else { body.as_str() };
    serde_json::from_str(raw)
        .map(Some)
        .map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
}
