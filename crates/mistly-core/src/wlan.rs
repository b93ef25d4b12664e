// ── WLAN reconciler ──
//
// WLANs are keyed by SSID within a site. The auth block is validated when
// the handle is built, before the site's WLAN list is fetched.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};
use tracing::{error, warn};

use mistly_api::MistClient;
use mistly_api::models::WlanRecord;

use crate::config::{AuthSettings, WlanSettings};
use crate::error::CoreError;
use crate::reconcile::{self, CreateOutcome, HandleState, RemoteEntity, insert_opt};

/// Shortest passphrase the controller treats as acceptable.
const MIN_PSK_LEN: usize = 8;

/// Authentication mode of a WLAN.
#[derive(Clone)]
pub enum AuthMode {
    Open,
    Psk { passphrase: SecretString },
    /// 802.1X; the RADIUS servers live in the WLAN's `auth_servers`.
    Eap,
    /// Any other `type` the controller knows about, kept verbatim.
    Other(String),
}

impl AuthMode {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Psk { .. } => "psk",
            Self::Eap => "eap",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Psk { .. } => f.write_str("Psk { passphrase: [REDACTED] }"),
            other => f.write_str(other.type_name()),
        }
    }
}

/// The `auth` block: a mode plus any extra keys (`pairwise`, ...).
#[derive(Debug, Clone)]
pub struct WlanAuth {
    pub mode: AuthMode,
    pub options: Map<String, Value>,
}

impl WlanAuth {
    /// Validate a configured auth block against the WLAN's server list.
    pub fn from_settings(
        ssid: &str,
        settings: &AuthSettings,
        auth_servers: Option<&[Value]>,
    ) -> Result<Self, CoreError> {
        let mode = match settings.kind.as_str() {
            "open" => AuthMode::Open,
            "psk" => {
                let Some(passphrase) = settings.psk.clone() else {
                    error!(ssid, "WLAN {ssid} rejected: PSK authentication without a passphrase");
                    return Err(CoreError::missing(format!("wlans[{ssid}].auth.psk")));
                };
                if passphrase.expose_secret().len() < MIN_PSK_LEN {
                    warn!(
                        ssid,
                        "WLAN {ssid}: PSK passphrase is shorter than {MIN_PSK_LEN} characters, \
                         this is a weak configuration"
                    );
                }
                AuthMode::Psk { passphrase }
            }
            "eap" => {
                if auth_servers.is_none_or(<[Value]>::is_empty) {
                    error!(ssid, "WLAN {ssid} rejected: EAP authentication without RADIUS servers");
                    return Err(CoreError::Validation {
                        field: format!("wlans[{ssid}].auth_servers"),
                        reason: "EAP authentication needs at least one RADIUS server".into(),
                    });
                }
                AuthMode::Eap
            }
            other => AuthMode::Other(other.to_owned()),
        };
        Ok(Self {
            mode,
            options: settings.options.clone(),
        })
    }

    /// Read an auth block back from the controller. Never fails: unknown or
    /// malformed blocks are kept as `Other`.
    pub fn from_remote(value: &Value) -> Self {
        let mut options = value.as_object().cloned().unwrap_or_default();
        let kind = options
            .remove("type")
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        let psk = options.remove("psk");

        let mode = match kind.as_str() {
            "open" => AuthMode::Open,
            "eap" => AuthMode::Eap,
            "psk" => AuthMode::Psk {
                passphrase: SecretString::from(
                    psk.as_ref().and_then(Value::as_str).unwrap_or_default().to_owned(),
                ),
            },
            _ => {
                if let Some(psk) = psk {
                    options.insert("psk".into(), psk);
                }
                AuthMode::Other(kind)
            }
        };
        Self { mode, options }
    }

    /// Wire form, with the passphrase exposed.
    pub fn to_wire(&self) -> Value {
        let mut body = Map::new();
        body.insert("type".into(), json!(self.mode.type_name()));
        if let AuthMode::Psk { passphrase } = &self.mode {
            body.insert("psk".into(), json!(passphrase.expose_secret()));
        }
        for (key, value) in &self.options {
            body.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(body)
    }
}

/// Remote-observable WLAN attributes.
#[derive(Debug, Clone, Default)]
pub struct WlanAttributes {
    pub enabled: Option<bool>,
    pub band: Option<String>,
    pub interface: Option<String>,
    pub hostname_ie: Option<bool>,
    pub roam_mode: Option<String>,
    pub auth: Option<WlanAuth>,
    pub auth_servers: Option<Vec<Value>>,
    pub rateset: Option<Value>,
}

/// A WLAN, matched against its site by SSID.
pub struct Wlan<'c> {
    client: &'c MistClient,
    site_id: String,
    ssid: String,
    state: HandleState,
    attrs: WlanAttributes,
}

impl fmt::Debug for Wlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wlan")
            .field("site_id", &self.site_id)
            .field("ssid", &self.ssid)
            .field("state", &self.state)
            .field("attrs", &self.attrs)
            .finish_non_exhaustive()
    }
}

impl<'c> Wlan<'c> {
    /// Validate `settings`, then probe site `site_id` for its SSID.
    ///
    /// Invalid auth configuration fails here without any network call.
    pub async fn lookup_or_build_pending(
        client: &'c MistClient,
        site_id: impl Into<String>,
        settings: &WlanSettings,
    ) -> Result<Self, CoreError> {
        if settings.ssid.is_empty() {
            return Err(CoreError::missing("wlans[].ssid"));
        }
        let auth = settings
            .auth
            .as_ref()
            .map(|a| WlanAuth::from_settings(&settings.ssid, a, settings.auth_servers.as_deref()))
            .transpose()?;

        let mut wlan = Self {
            client,
            site_id: site_id.into(),
            ssid: settings.ssid.clone(),
            state: HandleState::Pending,
            attrs: WlanAttributes {
                enabled: None,
                band: settings.band.clone(),
                interface: settings.interface.clone(),
                hostname_ie: settings.hostname_ie,
                roam_mode: settings.roam_mode.clone(),
                auth,
                auth_servers: settings.auth_servers.clone(),
                rateset: settings.rateset.clone(),
            },
        };
        reconcile::probe(&mut wlan).await?;
        Ok(wlan)
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.state.remote_id()
    }

    pub fn state(&self) -> &HandleState {
        &self.state
    }

    pub fn attributes(&self) -> &WlanAttributes {
        &self.attrs
    }

    pub async fn probe(&mut self) -> Result<bool, CoreError> {
        reconcile::probe(self).await
    }

    pub async fn create(&mut self) -> Result<CreateOutcome<WlanRecord>, CoreError> {
        reconcile::create(self).await
    }

    pub async fn delete(&mut self) -> Result<bool, CoreError> {
        reconcile::delete(self).await
    }
}

impl RemoteEntity for Wlan<'_> {
    type Record = WlanRecord;

    const KIND: &'static str = "WLAN";

    fn key(&self) -> &str {
        &self.ssid
    }

    fn record_key(record: &WlanRecord) -> &str {
        &record.ssid
    }

    fn record_id(record: &WlanRecord) -> &str {
        &record.id
    }

    fn state(&self) -> &HandleState {
        &self.state
    }

    fn set_state(&mut self, state: HandleState) {
        self.state = state;
    }

    fn adopt(&mut self, record: WlanRecord) {
        self.attrs = WlanAttributes {
            enabled: record.enabled,
            band: record.band,
            interface: record.interface,
            hostname_ie: record.hostname_ie,
            roam_mode: record.roam_mode,
            auth: record.auth.as_ref().map(WlanAuth::from_remote),
            auth_servers: record.auth_servers,
            rateset: record.rateset,
        };
    }

    fn creation_body(&self) -> Value {
        let a = &self.attrs;
        let mut body = Map::new();
        body.insert("enabled".into(), json!(true));
        body.insert("ssid".into(), json!(self.ssid));
        insert_opt(&mut body, "band", a.band.as_ref());
        insert_opt(&mut body, "interface", a.interface.as_ref());
        insert_opt(&mut body, "hostname_ie", a.hostname_ie.as_ref());
        insert_opt(&mut body, "roam_mode", a.roam_mode.as_ref());
        insert_opt(&mut body, "auth", a.auth.as_ref().map(WlanAuth::to_wire).as_ref());
        insert_opt(&mut body, "auth_servers", a.auth_servers.as_ref());
        insert_opt(&mut body, "rateset", a.rateset.as_ref());
        Value::Object(body)
    }

    async fn list_remote(&self) -> Result<Option<Vec<WlanRecord>>, mistly_api::Error> {
        self.client.list_wlans(&self.site_id).await
    }

    async fn create_remote(&self, body: &Value) -> Result<Option<WlanRecord>, mistly_api::Error> {
        self.client.create_wlan(&self.site_id, body).await
    }

    async fn delete_remote(&self, id: &str) -> Result<bool, mistly_api::Error> {
        self.client.delete_wlan(&self.site_id, id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn auth(kind: &str, psk: Option<&str>) -> AuthSettings {
        AuthSettings {
            kind: kind.into(),
            psk: psk.map(|p| SecretString::from(p.to_owned())),
            options: Map::new(),
        }
    }

    #[test]
    fn psk_without_passphrase_is_missing_field() {
        let err = WlanAuth::from_settings("Corp", &auth("psk", None), None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingField { ref field } if field.ends_with("auth.psk")
        ));
    }

    #[test]
    fn eap_without_servers_is_rejected() {
        let empty: Vec<Value> = Vec::new();
        for servers in [None, Some(empty.as_slice())] {
            let err = WlanAuth::from_settings("Corp", &auth("eap", None), servers).unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation { ref field, .. } if field.ends_with("auth_servers")
            ));
        }
    }

    #[test]
    fn eap_with_server_is_accepted() {
        let servers = vec![json!({ "host": "10.0.0.5", "port": 1812, "secret": "s" })];
        let auth = WlanAuth::from_settings("Corp", &auth("eap", None), Some(&servers)).unwrap();
        assert!(matches!(auth.mode, AuthMode::Eap));
    }

    #[test]
    fn psk_wire_form_carries_passphrase_and_options() {
        let mut settings = auth("psk", Some("hunter2222"));
        settings.options.insert("pairwise".into(), json!(["wpa2-ccmp"]));
        let auth = WlanAuth::from_settings("Corp", &settings, None).unwrap();
        assert_eq!(
            auth.to_wire(),
            json!({ "type": "psk", "psk": "hunter2222", "pairwise": ["wpa2-ccmp"] })
        );
    }

    #[test]
    fn remote_unknown_type_is_preserved() {
        let auth = WlanAuth::from_remote(&json!({ "type": "wep", "keys": ["k1"] }));
        assert_eq!(auth.mode.type_name(), "wep");
        assert_eq!(auth.to_wire(), json!({ "type": "wep", "keys": ["k1"] }));
    }

    #[test]
    fn debug_redacts_passphrase() {
        let auth = WlanAuth::from_settings("Corp", &auth("psk", Some("hunter2222")), None).unwrap();
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("hunter2222"));
    }
}
