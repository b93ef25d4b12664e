// ── Deployment document ──
//
// The parsed configuration document the reconcilers are driven from.
// Every field is optional: an absent value stays `None` and is omitted from
// payloads, never replaced by a default. Loading from disk lives in
// `mistly-config`; this module never touches files or the process
// environment directly.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use mistly_api::{ClientSettings, Cloud, TransportConfig};

use crate::error::CoreError;

/// Environment variable that overrides the document's `token`.
pub const TOKEN_ENV: &str = "MIST_TOKEN";
/// Environment variable that overrides the document's `org_id`.
pub const ORG_ENV: &str = "MIST_ORG";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub org_id: Option<String>,
    /// Master API token.
    #[serde(default, deserialize_with = "secret_opt")]
    pub token: Option<SecretString>,
    #[serde(default)]
    pub cloud: Option<Cloud>,
    #[serde(default)]
    pub site: Option<SiteSettings>,
    #[serde(default)]
    pub ap: Option<ApSettings>,
    #[serde(default)]
    pub wlans: Vec<WlanSettings>,
}

/// The `site` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SiteSettings {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub rftemplate_id: Option<String>,
    #[serde(default)]
    pub sitegroup_ids: Option<Vec<String>>,
}

/// One entry of the `wlans` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WlanSettings {
    pub ssid: String,
    #[serde(default)]
    pub band: Option<String>,
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub hostname_ie: Option<bool>,
    #[serde(default)]
    pub roam_mode: Option<String>,
    #[serde(default)]
    pub auth: Option<AuthSettings>,
    #[serde(default)]
    pub auth_servers: Option<Vec<Value>>,
    #[serde(default)]
    pub rateset: Option<Value>,
}

/// The `auth` block of a WLAN entry. Keys other than `type` and `psk`
/// (`pairwise`, `enable_mac_auth`, ...) are forwarded untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSettings {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "secret_opt")]
    pub psk: Option<SecretString>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// The `ap` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApSettings {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub claim_code: Option<String>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub orientation: Option<i32>,
    #[serde(default)]
    pub map_id: Option<String>,
    #[serde(rename = "24", default)]
    pub band_24: Option<BandSettings>,
    #[serde(rename = "5", default)]
    pub band_5: Option<BandSettings>,
}

/// Radio settings for one band. `bandwidth` only applies to 5 GHz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BandSettings {
    #[serde(default)]
    pub power: Option<i32>,
    #[serde(default)]
    pub channel: Option<u32>,
    #[serde(default)]
    pub bandwidth: Option<u32>,
}

fn secret_opt<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

// ── Credential resolution ────────────────────────────────────────────

/// Master token and organization, resolved from environment then document.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub master_token: SecretString,
    pub org_id: String,
}

impl Credentials {
    /// Combine with region and transport tuning into client settings.
    pub fn into_client_settings(self, cloud: Cloud, transport: TransportConfig) -> ClientSettings {
        ClientSettings {
            cloud,
            org_id: self.org_id,
            master_token: self.master_token,
            transport,
        }
    }
}

impl DeploymentConfig {
    /// Resolve the master token and organization id.
    ///
    /// `env` looks up an environment variable; [`TOKEN_ENV`] and [`ORG_ENV`]
    /// take priority over the document's `token` and `org_id`. Empty values
    /// count as unset. Fails before any network call when either value has
    /// no source.
    pub fn resolve_credentials<F>(&self, env: F) -> Result<Credentials, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |name: &str| env(name).filter(|v| !v.is_empty());

        let master_token = env_value(TOKEN_ENV)
            .map(SecretString::from)
            .or_else(|| {
                self.token
                    .clone()
                    .filter(|t| !t.expose_secret().is_empty())
            })
            .ok_or_else(|| CoreError::NoCredentials {
                field: "token".into(),
                env: TOKEN_ENV.into(),
            })?;

        let org_id = env_value(ORG_ENV)
            .or_else(|| self.org_id.clone().filter(|v| !v.is_empty()))
            .ok_or_else(|| CoreError::NoCredentials {
                field: "org_id".into(),
                env: ORG_ENV.into(),
            })?;

        Ok(Credentials {
            master_token,
            org_id,
        })
    }

    /// Region to connect to; global when the document names none.
    pub fn cloud(&self) -> Cloud {
        self.cloud.unwrap_or_default()
    }

    /// The `wlans` entry for `ssid`, if any.
    pub fn wlan(&self, ssid: &str) -> Option<&WlanSettings> {
        self.wlans.iter().find(|w| w.ssid == ssid)
    }
}

/// Environment lookup backed by the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
