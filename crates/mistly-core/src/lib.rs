// mistly-core: Reconcilers that bring Mist sites, WLANs and APs to a declared state.

pub mod ap;
pub mod config;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod site;
pub mod wlan;

// ── Primary re-exports ──────────────────────────────────────────────
pub use ap::{Ap, ApIdentity, ApState, ClaimOutcome, ProvisionOutcome};
pub use config::{
    ApSettings, AuthSettings, BandSettings, Credentials, DeploymentConfig, SiteSettings,
    WlanSettings, process_env,
};
pub use error::CoreError;
pub use model::MacAddress;
pub use reconcile::{CreateOutcome, HandleState};
pub use site::{GeocodedAddress, Site, SiteAttributes, SiteSource};
pub use wlan::{AuthMode, Wlan, WlanAttributes, WlanAuth};
