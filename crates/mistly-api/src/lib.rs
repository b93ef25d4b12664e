// mistly-api: Async Rust client for the Juniper Mist cloud API

pub mod auth;
pub mod client;
pub mod cloud;
pub mod devices;
pub mod error;
pub mod inventory;
pub mod models;
pub mod sites;
pub mod transport;
pub mod wlans;

pub use auth::{EphemeralToken, TokenManager};
pub use client::{ClientSettings, MistClient};
pub use cloud::{ApiPath, Cloud};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
