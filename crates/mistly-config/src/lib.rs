//! Deployment document loading for mistly.
//!
//! The document is a JSON or TOML file (picked by extension) with
//! `MISTLY_`-prefixed environment variables merged on top. Nested keys are
//! separated by a double underscore: `MISTLY_SITE__TIMEZONE=EST` sets
//! `site.timezone`. Credential overrides (`MIST_TOKEN`, `MIST_ORG`) are not
//! handled here; see `mistly_core::DeploymentConfig::resolve_credentials`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml},
};
use thiserror::Error;

use mistly_core::DeploymentConfig;

/// Prefix of environment variables merged over the document.
pub const ENV_PREFIX: &str = "MISTLY_";

/// `MISTLY_*` variables that configure the CLI itself, not the document.
const CLI_ONLY_KEYS: &[&str] = &["config", "base_url", "timeout"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration document not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("unsupported configuration format for {} (expected .json or .toml)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Document path ───────────────────────────────────────────────────

/// Default document location via XDG / platform conventions.
pub fn default_document_path() -> PathBuf {
    ProjectDirs::from("com", "semfionetworks", "mistly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.json");
            p
        },
        |dirs| dirs.config_dir().join("config.json"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("mistly");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the document at `path` with the environment merged on top.
pub fn load_document(path: &Path) -> Result<DeploymentConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    extract(Some(path))
}

/// Like [`load_document`], but a missing file yields a document built from
/// the environment alone. Parse errors in an existing file still fail.
pub fn load_document_or_default(path: &Path) -> Result<DeploymentConfig, ConfigError> {
    extract(path.is_file().then_some(path))
}

fn extract(path: Option<&Path>) -> Result<DeploymentConfig, ConfigError> {
    let mut figment = Figment::new();
    if let Some(path) = path {
        figment = match extension(path).as_deref() {
            Some("json") => figment.merge(Json::file(path)),
            Some("toml") => figment.merge(Toml::file(path)),
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };
    }
    let figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(CLI_ONLY_KEYS).split("__"));
    Ok(figment.extract()?)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}
