//! Document loading and client session setup.
//!
//! Core never reads files or the process environment itself: the CLI
//! loads the document here and hands core an env-lookup function.

use std::time::Duration;

use tracing::debug;

use mistly_api::{Cloud, MistClient, TlsMode, TransportConfig};
use mistly_core::{DeploymentConfig, process_env};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load the document named by `--config`, or the default one if present.
pub fn load_document(global: &GlobalOpts) -> Result<DeploymentConfig, CliError> {
    if let Some(path) = &global.config {
        debug!(path = %path.display(), "loading deployment document");
        return Ok(mistly_config::load_document(path)?);
    }
    let path = mistly_config::default_document_path();
    debug!(path = %path.display(), "loading default deployment document");
    Ok(mistly_config::load_document_or_default(&path)?)
}

/// Resolve credentials and open a session (acquires the ephemeral token).
pub async fn connect(global: &GlobalOpts, doc: &DeploymentConfig) -> Result<MistClient, CliError> {
    let credentials = doc.resolve_credentials(process_env)?;
    let cloud = global.cloud.map_or_else(|| doc.cloud(), Cloud::from);

    let mut transport =
        TransportConfig::default().with_timeout(Duration::from_secs(global.timeout));
    if let Some(ca) = &global.ca_cert {
        transport.tls = TlsMode::CustomCa(ca.clone());
    }

    let settings = credentials.into_client_settings(cloud, transport);
    let client = match &global.base_url {
        Some(url) => MistClient::connect_at(url.clone(), &settings).await?,
        None => MistClient::connect(&settings).await?,
    };
    debug!(org_id = client.org_id(), base_url = %client.base_url(), "session open");
    Ok(client)
}
