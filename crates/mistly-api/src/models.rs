// Mist API wire types
//
// Records as the controller returns them. Only the fields the reconcilers
// read are modelled explicitly; the controller adds fields freely, so
// everything else lands in a flattened `extra` map. Optional fields use
// `#[serde(default)]` because the API omits and nulls them interchangeably.

use serde::{Deserialize, Serialize};

// ── Tokens ───────────────────────────────────────────────────────────

/// Body of `POST /api/v1/self/apitokens`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiTokenRecord {
    pub id: String,
    pub key: String,
}

// ── Sites ────────────────────────────────────────────────────────────

/// Geographic position of a site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A site from `GET /orgs/{org}/sites` (and the create/update responses).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latlng: Option<LatLng>,
    #[serde(default)]
    pub rftemplate_id: Option<String>,
    #[serde(default)]
    pub secpolicy_id: Option<String>,
    #[serde(default)]
    pub alarmtemplate_id: Option<String>,
    #[serde(default)]
    pub sitegroup_ids: Option<Vec<String>>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── WLANs ────────────────────────────────────────────────────────────

/// A WLAN from `GET /sites/{site}/wlans`.
///
/// `auth`, `auth_servers` and `rateset` are kept as raw JSON: their shape
/// depends on the auth type and firmware generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WlanRecord {
    pub id: String,
    pub ssid: String,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub band: Option<String>,
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub hostname_ie: Option<bool>,
    #[serde(default)]
    pub roam_mode: Option<String>,
    #[serde(default)]
    pub auth: Option<serde_json::Value>,
    #[serde(default)]
    pub auth_servers: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub rateset: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Per-band radio settings as sent to and returned by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioBand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u32>,
}

/// The `radio_config` block of an access point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_24: Option<RadioBand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_5: Option<RadioBand>,
}

/// A device from `GET /sites/{site}/devices` (also the body returned when
/// provisioning or updating a device).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDevice {
    pub id: String,
    pub mac: String,
    #[serde(rename = "type", default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub map_id: Option<String>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub orientation: Option<i32>,
    #[serde(default)]
    pub radio_config: Option<RadioConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SiteDevice {
    pub fn is_ap(&self) -> bool {
        self.device_type.as_deref() == Some("ap")
    }
}

// ── Inventory ────────────────────────────────────────────────────────

/// A device from the organization inventory (`GET /installer/orgs/{org}/devices`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryDevice {
    pub mac: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One device added to the inventory by a claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimedDevice {
    #[serde(default)]
    pub id: Option<String>,
    pub mac: String,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(rename = "type", default)]
    pub device_type: Option<String>,
}

/// Response of `POST /orgs/{org}/inventory` (claim by claim code).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimResponse {
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub duplicated: Vec<String>,
    #[serde(default)]
    pub error: Vec<String>,
    #[serde(default)]
    pub inventory_added: Vec<ClaimedDevice>,
}

/// Bulk inventory operation names accepted by `PUT /orgs/{org}/inventory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InventoryOp {
    /// Detach from the current site, keep in the organization.
    Unassign,
    /// Remove from the organization inventory.
    Delete,
}

/// Body of a bulk inventory operation.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryOpRequest<'a> {
    pub op: InventoryOp,
    pub macs: &'a [&'a str],
}

/// Response of a bulk inventory operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryOpResponse {
    #[serde(default)]
    pub op: Option<String>,
    #[serde(default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub error: Vec<String>,
    #[serde(default)]
    pub reason: Vec<String>,
}

impl InventoryOpResponse {
    /// Whether the controller confirmed the operation for `mac`.
    ///
    /// Batches are single-MAC, so only the first entry of `success` counts.
    pub fn confirms(&self, mac: &str) -> bool {
        self.success.first().is_some_and(|m| m.eq_ignore_ascii_case(mac))
    }
}
