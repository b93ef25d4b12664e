// ── Access point lifecycle ──
//
// An AP has two independent existence dimensions: membership in the
// organization inventory (claimed) and assignment to a site. Each is probed
// on its own, and every lifecycle call re-probes the dimension it depends on.
//
//   claim      inventory  <- claim code
//   provision  site       <- name, map, placement
//   radios     site device radio_config
//   unassign   site       -> inventory only
//   release    inventory  -> gone

use std::fmt;

use serde_json::{Map, Value, json};
use tracing::{debug, error, info, warn};

use mistly_api::MistClient;
use mistly_api::models::{InventoryOp, RadioBand, RadioConfig, SiteDevice};

use crate::config::{ApSettings, BandSettings};
use crate::error::CoreError;
use crate::model::MacAddress;
use crate::reconcile::insert_opt;

/// Inventory membership and site assignment, as last probed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApState {
    pub claimed: bool,
    pub assigned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    AlreadyClaimed,
    /// The controller refused the claim code (already logged).
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Provisioned,
    /// Already on a site; the existing assignment is left alone.
    AlreadyAssigned,
    Rejected,
}

/// Identity details learned from the controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApIdentity {
    pub remote_id: Option<String>,
    pub name: Option<String>,
    pub serial: Option<String>,
    pub model: Option<String>,
    pub map_id: Option<String>,
}

/// An access point, keyed by MAC.
pub struct Ap<'c> {
    client: &'c MistClient,
    mac: MacAddress,
    site_id: Option<String>,
    settings: ApSettings,
    identity: ApIdentity,
    state: ApState,
}

impl fmt::Debug for Ap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ap")
            .field("mac", &self.mac)
            .field("site_id", &self.site_id)
            .field("identity", &self.identity)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'c> Ap<'c> {
    /// Probe the client's organization inventory and, when `site_id` is
    /// given, that site's device list for `mac`.
    pub async fn lookup_or_build_pending(
        client: &'c MistClient,
        mac: MacAddress,
        site_id: Option<String>,
        settings: ApSettings,
    ) -> Result<Self, CoreError> {
        if !mac.is_well_formed() {
            return Err(CoreError::Validation {
                field: "mac".into(),
                reason: format!("'{mac}' is not a 12-digit hardware address"),
            });
        }

        let mut ap = Self {
            client,
            mac,
            site_id,
            identity: ApIdentity {
                name: settings.name.clone(),
                map_id: settings.map_id.clone(),
                ..ApIdentity::default()
            },
            settings,
            state: ApState::default(),
        };
        let org_id = client.org_id().to_owned();
        ap.probe_inventory(&org_id).await?;
        ap.probe_site().await?;
        Ok(ap)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn mac(&self) -> &MacAddress {
        &self.mac
    }

    pub fn site_id(&self) -> Option<&str> {
        self.site_id.as_deref()
    }

    pub fn state(&self) -> ApState {
        self.state
    }

    pub fn identity(&self) -> &ApIdentity {
        &self.identity
    }

    // ── Probes ───────────────────────────────────────────────────────

    /// Is the MAC in the organization inventory?
    pub async fn probe_inventory(&mut self, org_id: &str) -> Result<bool, CoreError> {
        let Some(devices) = self.client.list_installer_devices(org_id).await? else {
            return Err(self.listing_refused("organization inventory"));
        };
        let found = devices.into_iter().find(|d| self.mac.matches(&d.mac));

        self.state.claimed = found.is_some();
        if let Some(device) = found {
            debug!(mac = %self.mac, org_id, "AP found in organization inventory");
            self.identity.remote_id = device.id.or(self.identity.remote_id.take());
            self.identity.serial = device.serial.or(self.identity.serial.take());
            self.identity.model = device.model.or(self.identity.model.take());
        } else {
            debug!(mac = %self.mac, org_id, "AP not in organization inventory");
        }
        Ok(self.state.claimed)
    }

    /// Is the MAC an AP on this handle's site?
    pub async fn probe_site(&mut self) -> Result<bool, CoreError> {
        let Some(site_id) = self.site_id.clone() else {
            self.state.assigned = false;
            return Ok(false);
        };
        let Some(devices) = self.client.list_site_devices(&site_id).await? else {
            return Err(self.listing_refused("site device list"));
        };
        let found = devices
            .into_iter()
            .find(|d| d.is_ap() && self.mac.matches(&d.mac));

        self.state.assigned = found.is_some();
        match found {
            Some(device) => {
                debug!(mac = %self.mac, site_id = %site_id, "AP found on site");
                self.adopt_device(device);
            }
            None => debug!(mac = %self.mac, site_id = %site_id, "AP not on site"),
        }
        Ok(self.state.assigned)
    }

    /// Existence is unknown when a listing is refused: log it and fail
    /// rather than claim, provision or release on a guess.
    fn listing_refused(&self, listing: &str) -> CoreError {
        error!(mac = %self.mac, "AP {} could not be looked up: {listing} refused", self.mac);
        CoreError::ListingRefused {
            kind: "AP".into(),
            key: self.mac.to_string(),
        }
    }

    fn adopt_device(&mut self, device: SiteDevice) {
        self.identity.remote_id = Some(device.id);
        self.identity.name = device.name.or(self.identity.name.take());
        self.identity.serial = device.serial.or(self.identity.serial.take());
        self.identity.model = device.model.or(self.identity.model.take());
        self.identity.map_id = device.map_id.or(self.identity.map_id.take());
        if device.site_id.is_some() {
            self.site_id = device.site_id;
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Claim the AP into `org_id` with the configured claim code.
    ///
    /// The code is only required when the AP is not already in the inventory.
    pub async fn claim(&mut self, org_id: &str) -> Result<ClaimOutcome, CoreError> {
        info!(mac = %self.mac, org_id, "Claiming AP {} to organization {org_id}", self.mac);
        if self.probe_inventory(org_id).await? {
            info!(mac = %self.mac, org_id, "AP {} is already claimed", self.mac);
            return Ok(ClaimOutcome::AlreadyClaimed);
        }

        let Some(code) = self.settings.claim_code.clone().filter(|c| !c.trim().is_empty()) else {
            error!(mac = %self.mac, "AP {} was NOT claimed: no claim code configured", self.mac);
            return Err(CoreError::missing("ap.claim_code"));
        };

        let Some(resp) = self.client.claim_inventory(org_id, &[code.as_str()]).await? else {
            error!(mac = %self.mac, "AP {} was NOT claimed", self.mac);
            return Ok(ClaimOutcome::Rejected);
        };

        let Some(device) = resp.inventory_added.into_iter().next() else {
            error!(
                mac = %self.mac,
                errors = ?resp.error,
                duplicated = ?resp.duplicated,
                "AP {} was NOT claimed: claim code not accepted",
                self.mac
            );
            return Ok(ClaimOutcome::Rejected);
        };

        if !self.mac.matches(&device.mac) {
            warn!(
                mac = %self.mac,
                claimed_mac = %device.mac,
                "claim code belongs to a different AP"
            );
        }
        self.identity.remote_id = device.id;
        self.identity.serial = device.serial;
        self.identity.model = device.model;
        self.state.claimed = true;
        info!(
            mac = %self.mac,
            serial = self.identity.serial.as_deref().unwrap_or("-"),
            model = self.identity.model.as_deref().unwrap_or("-"),
            "AP {} claimed",
            self.mac
        );
        Ok(ClaimOutcome::Claimed)
    }

    /// Assign the AP to its site under `name` with the configured placement.
    pub async fn provision(&mut self, name: &str) -> Result<ProvisionOutcome, CoreError> {
        let site_id = self
            .site_id
            .clone()
            .ok_or_else(|| CoreError::missing("site_id"))?;
        info!(mac = %self.mac, site_id = %site_id, "Provisioning AP {} as {name}", self.mac);

        if self.probe_site().await? {
            info!(
                mac = %self.mac,
                site_id = %site_id,
                "AP {} already belongs to the site",
                self.mac
            );
            return Ok(ProvisionOutcome::AlreadyAssigned);
        }

        let mut body = Map::new();
        body.insert("name".into(), json!(name));
        body.insert("site_id".into(), json!(site_id));
        insert_opt(&mut body, "map_id", self.settings.map_id.as_ref());
        insert_opt(&mut body, "height", self.settings.height.as_ref());
        insert_opt(&mut body, "orientation", self.settings.orientation.as_ref());

        let org_id = self.client.org_id().to_owned();
        match self
            .client
            .provision_device(&org_id, self.mac.as_str(), &Value::Object(body))
            .await?
        {
            Some(device) => {
                self.adopt_device(device);
                self.identity.name = Some(name.to_owned());
                self.state.assigned = true;
                info!(mac = %self.mac, site_id = %site_id, "AP {} provisioned as {name}", self.mac);
                Ok(ProvisionOutcome::Provisioned)
            }
            None => {
                error!(mac = %self.mac, site_id = %site_id, "AP {} was NOT provisioned", self.mac);
                Ok(ProvisionOutcome::Rejected)
            }
        }
    }

    /// Push the configured 2.4 GHz and 5 GHz radio settings.
    ///
    /// Fails when the AP is not on its site or either band is unconfigured.
    pub async fn configure_radios(&mut self) -> Result<Option<RadioConfig>, CoreError> {
        if !self.probe_site().await? {
            error!(
                mac = %self.mac,
                "AP {} does not belong to a site, cannot configure radios",
                self.mac
            );
            return Err(CoreError::NotAssigned {
                mac: self.mac.to_string(),
            });
        }
        let radio = self.radio_config()?;
        let (Some(site_id), Some(device_id)) =
            (self.site_id.clone(), self.identity.remote_id.clone())
        else {
            return Err(CoreError::NotAssigned {
                mac: self.mac.to_string(),
            });
        };

        info!(mac = %self.mac, "Configuring radios on AP {}", self.mac);
        let body = json!({ "radio_config": radio });
        let Some(device) = self
            .client
            .update_site_device(&site_id, &device_id, &body)
            .await?
        else {
            error!(mac = %self.mac, "Radio settings were NOT applied to AP {}", self.mac);
            return Ok(None);
        };

        let applied = device.radio_config.unwrap_or(radio);
        for (band, settings) in [("2.4GHz", &applied.band_24), ("5GHz", &applied.band_5)] {
            if let Some(settings) = settings {
                info!(
                    mac = %self.mac,
                    band,
                    channel = ?settings.channel,
                    power = ?settings.power,
                    "AP {} {band} radio configured",
                    self.mac
                );
            }
        }
        Ok(Some(applied))
    }

    /// Detach the AP from its site, keeping it in the inventory.
    pub async fn unassign(&mut self, org_id: &str) -> Result<bool, CoreError> {
        info!(mac = %self.mac, "Unassigning AP {} from its site", self.mac);
        if !self.probe_site().await? {
            info!(mac = %self.mac, "AP {} is not assigned to any site", self.mac);
            return Ok(false);
        }

        if self.inventory_op(org_id, InventoryOp::Unassign).await? {
            self.site_id = None;
            self.state.assigned = false;
            info!(mac = %self.mac, "AP {} unassigned", self.mac);
            Ok(true)
        } else {
            error!(mac = %self.mac, "AP {} was NOT unassigned", self.mac);
            Ok(false)
        }
    }

    /// Remove the AP from the organization inventory.
    pub async fn release(&mut self, org_id: &str) -> Result<bool, CoreError> {
        info!(mac = %self.mac, org_id, "Releasing AP {} from organization {org_id}", self.mac);
        if !self.probe_inventory(org_id).await? {
            info!(mac = %self.mac, org_id, "AP {} is not part of the organization", self.mac);
            return Ok(false);
        }

        if self.inventory_op(org_id, InventoryOp::Delete).await? {
            self.site_id = None;
            self.identity.remote_id = None;
            self.state = ApState::default();
            info!(mac = %self.mac, org_id, "AP {} released", self.mac);
            Ok(true)
        } else {
            error!(mac = %self.mac, org_id, "AP {} was NOT released", self.mac);
            Ok(false)
        }
    }

    async fn inventory_op(&self, org_id: &str, op: InventoryOp) -> Result<bool, CoreError> {
        let resp = self
            .client
            .inventory_op(org_id, op, &[self.mac.as_str()])
            .await?;
        Ok(resp.is_some_and(|r| r.confirms(self.mac.as_str())))
    }

    fn radio_config(&self) -> Result<RadioConfig, CoreError> {
        let (Some(band_24), Some(band_5)) = (self.settings.band_24, self.settings.band_5) else {
            let field = if self.settings.band_24.is_none() { "ap.24" } else { "ap.5" };
            error!(
                mac = %self.mac,
                field,
                "AP {} radios were NOT configured: {field} is not configured",
                self.mac
            );
            return Err(CoreError::missing(field));
        };
        Ok(RadioConfig {
            band_24: Some(RadioBand {
                bandwidth: None,
                ..radio_band(band_24)
            }),
            band_5: Some(radio_band(band_5)),
        })
    }
}

fn radio_band(settings: BandSettings) -> RadioBand {
    RadioBand {
        power: settings.power,
        channel: settings.channel,
        bandwidth: settings.bandwidth,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn radio_band_copies_settings() {
        let band = radio_band(BandSettings {
            power: Some(15),
            channel: Some(36),
            bandwidth: Some(40),
        });
        assert_eq!(
            serde_json::to_value(band).unwrap(),
            json!({ "power": 15, "channel": 36, "bandwidth": 40 })
        );
    }

    #[test]
    fn unset_band_fields_are_omitted() {
        let band = radio_band(BandSettings {
            channel: Some(6),
            ..BandSettings::default()
        });
        assert_eq!(serde_json::to_value(band).unwrap(), json!({ "channel": 6 }));
    }
}
