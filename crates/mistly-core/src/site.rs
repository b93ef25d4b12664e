// ── Site reconciler ──
//
// Sites are keyed by name within the client's organization.

use std::fmt;

use serde_json::{Map, Value, json};
use tracing::{error, info, warn};

use mistly_api::MistClient;
use mistly_api::models::{LatLng, SiteRecord};

use crate::config::{DeploymentConfig, SiteSettings};
use crate::error::CoreError;
use crate::reconcile::{self, CreateOutcome, HandleState, RemoteEntity, insert_opt};

/// Address data resolved by an external geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    pub address: String,
    pub latlng: LatLng,
    pub timezone: Option<String>,
    pub country_code: Option<String>,
}

/// Where a pending site's attributes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteSource {
    /// The `site` section of the configuration document, taken as written.
    ConfigFields(SiteSettings),
    /// A geocoded address; only location fields are set.
    Geocoded(GeocodedAddress),
}

/// Remote-observable site attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteAttributes {
    pub timezone: Option<String>,
    pub country_code: Option<String>,
    pub address: Option<String>,
    pub latlng: Option<LatLng>,
    pub rftemplate_id: Option<String>,
    pub secpolicy_id: Option<String>,
    pub alarmtemplate_id: Option<String>,
    pub sitegroup_ids: Option<Vec<String>>,
    /// Lives in the site setting document, so it is only known after
    /// `configure_persistence`.
    pub persist_config_on_device: Option<bool>,
}

impl SiteAttributes {
    fn from_source(source: SiteSource) -> Self {
        match source {
            SiteSource::ConfigFields(settings) => {
                let latlng = match (settings.lat, settings.lng) {
                    (Some(lat), Some(lng)) => Some(LatLng { lat, lng }),
                    (None, None) => None,
                    _ => {
                        warn!("site coordinates need both lat and lng, ignoring the partial pair");
                        None
                    }
                };
                Self {
                    timezone: settings.timezone,
                    country_code: settings.country_code,
                    address: settings.address,
                    latlng,
                    rftemplate_id: settings.rftemplate_id,
                    sitegroup_ids: settings.sitegroup_ids,
                    ..Self::default()
                }
            }
            SiteSource::Geocoded(geo) => Self {
                timezone: geo.timezone,
                country_code: geo.country_code,
                address: Some(geo.address),
                latlng: Some(geo.latlng),
                ..Self::default()
            },
        }
    }
}

/// A site, matched against the controller by name.
pub struct Site<'c> {
    client: &'c MistClient,
    org_id: String,
    name: String,
    state: HandleState,
    attrs: SiteAttributes,
}

impl fmt::Debug for Site<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Site")
            .field("org_id", &self.org_id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("attrs", &self.attrs)
            .finish_non_exhaustive()
    }
}

impl<'c> Site<'c> {
    /// Probe the client's organization for `name`. When found the handle
    /// carries the remote record, otherwise it is pending with the
    /// attributes from `source`.
    pub async fn lookup_or_build_pending(
        client: &'c MistClient,
        name: impl Into<String>,
        source: SiteSource,
    ) -> Result<Self, CoreError> {
        let mut site = Self {
            client,
            org_id: client.org_id().to_owned(),
            name: name.into(),
            state: HandleState::Pending,
            attrs: SiteAttributes::from_source(source),
        };
        reconcile::probe(&mut site).await?;
        Ok(site)
    }

    /// Build from the document's `site` section. `site.name` is required.
    pub async fn from_config(
        client: &'c MistClient,
        config: &DeploymentConfig,
    ) -> Result<Self, CoreError> {
        let settings = config
            .site
            .clone()
            .ok_or_else(|| CoreError::missing("site"))?;
        let name = settings
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CoreError::missing("site.name"))?;
        Self::lookup_or_build_pending(client, name, SiteSource::ConfigFields(settings)).await
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.state.remote_id()
    }

    pub fn state(&self) -> &HandleState {
        &self.state
    }

    pub fn attributes(&self) -> &SiteAttributes {
        &self.attrs
    }

    // ── Reconcile ────────────────────────────────────────────────────

    /// Look the site up again, adopting the remote record when present.
    pub async fn probe(&mut self) -> Result<bool, CoreError> {
        reconcile::probe(self).await
    }

    pub async fn create(&mut self) -> Result<CreateOutcome<SiteRecord>, CoreError> {
        reconcile::create(self).await
    }

    pub async fn delete(&mut self) -> Result<bool, CoreError> {
        reconcile::delete(self).await
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Toggle whether devices keep their configuration across reboots
    /// without cloud connectivity.
    ///
    /// `PUT /api/v1/sites/{id}/setting`
    pub async fn configure_persistence(
        &mut self,
        enabled: bool,
    ) -> Result<Option<Value>, CoreError> {
        let id = reconcile::require_live(self).await?;
        info!(site = %self.name, enabled, "Configuring configuration persistence");

        let body = json!({ "persist_config_on_device": enabled });
        match self.client.update_site_setting(&id, &body).await? {
            Some(resp) => {
                self.attrs.persist_config_on_device = Some(enabled);
                info!(site = %self.name, enabled, "Configuration persistence updated");
                Ok(Some(resp))
            }
            None => {
                error!(site = %self.name, "Configuration persistence was NOT updated");
                Ok(None)
            }
        }
    }

    /// Attach an RF template to the site.
    pub async fn assign_rf_template(
        &mut self,
        template_id: &str,
    ) -> Result<Option<SiteRecord>, CoreError> {
        let id = reconcile::require_live(self).await?;
        info!(site = %self.name, template_id, "Assigning RF template");

        let body = json!({ "rftemplate_id": template_id });
        self.apply_update(&id, &body, "RF template").await
    }

    /// Replace the site's group membership.
    pub async fn assign_sitegroups(
        &mut self,
        sitegroup_ids: &[String],
    ) -> Result<Option<SiteRecord>, CoreError> {
        let id = reconcile::require_live(self).await?;
        info!(site = %self.name, ?sitegroup_ids, "Assigning site groups");

        let body = json!({ "sitegroup_ids": sitegroup_ids });
        self.apply_update(&id, &body, "site groups").await
    }

    async fn apply_update(
        &mut self,
        id: &str,
        body: &Value,
        what: &str,
    ) -> Result<Option<SiteRecord>, CoreError> {
        match self.client.update_site(id, body).await? {
            Some(record) => {
                info!(site = %self.name, "Site {what} updated");
                self.adopt(record.clone());
                Ok(Some(record))
            }
            None => {
                error!(site = %self.name, "Site {what} was NOT updated");
                Ok(None)
            }
        }
    }
}

impl RemoteEntity for Site<'_> {
    type Record = SiteRecord;

    const KIND: &'static str = "Site";

    fn key(&self) -> &str {
        &self.name
    }

    fn record_key(record: &SiteRecord) -> &str {
        &record.name
    }

    fn record_id(record: &SiteRecord) -> &str {
        &record.id
    }

    fn state(&self) -> &HandleState {
        &self.state
    }

    fn set_state(&mut self, state: HandleState) {
        self.state = state;
    }

    fn adopt(&mut self, record: SiteRecord) {
        self.attrs = SiteAttributes {
            timezone: record.timezone,
            country_code: record.country_code,
            address: record.address,
            latlng: record.latlng,
            rftemplate_id: record.rftemplate_id,
            secpolicy_id: record.secpolicy_id,
            alarmtemplate_id: record.alarmtemplate_id,
            sitegroup_ids: record.sitegroup_ids,
            persist_config_on_device: self.attrs.persist_config_on_device,
        };
    }

    fn creation_body(&self) -> Value {
        let a = &self.attrs;
        let mut body = Map::new();
        body.insert("name".into(), json!(self.name));
        insert_opt(&mut body, "timezone", a.timezone.as_ref());
        insert_opt(&mut body, "country_code", a.country_code.as_ref());
        insert_opt(&mut body, "address", a.address.as_ref());
        insert_opt(&mut body, "latlng", a.latlng.as_ref());
        insert_opt(&mut body, "rftemplate_id", a.rftemplate_id.as_ref());
        insert_opt(&mut body, "sitegroup_ids", a.sitegroup_ids.as_ref());
        Value::Object(body)
    }

    async fn list_remote(&self) -> Result<Option<Vec<SiteRecord>>, mistly_api::Error> {
        self.client.list_sites(&self.org_id).await
    }

    async fn create_remote(&self, body: &Value) -> Result<Option<SiteRecord>, mistly_api::Error> {
        self.client.create_site(&self.org_id, body).await
    }

    async fn delete_remote(&self, id: &str) -> Result<bool, mistly_api::Error> {
        self.client.delete_site(id).await
    }
}
