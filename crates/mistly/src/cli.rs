//! Clap derive structures for the `mistly` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

use mistly_api::Cloud;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mistly -- bring Mist sites, WLANs and access points to the state
/// described in a configuration document
#[derive(Debug, Parser)]
#[command(
    name = "mistly",
    version,
    about = "Provision Mist sites, WLANs and access points from a configuration document",
    long_about = "Reads a JSON or TOML deployment document and reconciles it against the\n\
        Mist cloud: entities are created when absent and reused when present.\n\n\
        The master API token and organization id come from MIST_TOKEN / MIST_ORG\n\
        or from the document's `token` / `org_id` fields.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Deployment document (JSON or TOML)
    #[arg(long, env = "MISTLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Mist cloud region (overrides the document)
    #[arg(long, env = "MISTLY_CLOUD", global = true)]
    pub cloud: Option<CloudArg>,

    /// API root URL, for private or mocked deployments (overrides --cloud)
    #[arg(long, env = "MISTLY_BASE_URL", global = true, hide = true)]
    pub base_url: Option<Url>,

    /// Additional CA certificate (PEM) to trust
    #[arg(long, global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "MISTLY_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CloudArg {
    /// api.mist.com
    Global,
    /// api.eu.mist.com
    Eu,
}

impl From<CloudArg> for Cloud {
    fn from(arg: CloudArg) -> Self {
        match arg {
            CloudArg::Global => Cloud::Global,
            CloudArg::Eu => Cloud::Eu,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the site and every configured WLAN, then optionally bring up an AP
    Apply(ApplyArgs),

    /// Manage the configured site
    Site(SiteArgs),

    /// Manage WLANs of the configured site
    #[command(alias = "w")]
    Wlan(WlanArgs),

    /// Access point lifecycle
    Ap(ApArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Apply ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Also claim, provision and configure the AP with this MAC
    #[arg(long)]
    pub ap: Option<String>,
}

// ── Site ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SiteArgs {
    #[command(subcommand)]
    pub command: SiteCommand,
}

#[derive(Debug, Subcommand)]
pub enum SiteCommand {
    /// Create the site unless it already exists
    Create,

    /// Delete the site
    Delete,

    /// Keep device configuration across reboots without cloud access
    Persist {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// Attach an RF template
    RfTemplate {
        /// RF template id
        id: String,
    },

    /// Replace the site's group membership
    Sitegroups {
        /// Site group ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

// ── WLAN ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WlanArgs {
    #[command(subcommand)]
    pub command: WlanCommand,
}

#[derive(Debug, Subcommand)]
pub enum WlanCommand {
    /// Create a WLAN from its `wlans` entry
    Create {
        /// SSID of the entry in the document
        ssid: String,
    },

    /// Delete a WLAN
    Delete {
        ssid: String,
    },
}

// ── AP ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ApArgs {
    #[command(subcommand)]
    pub command: ApCommand,
}

#[derive(Debug, Subcommand)]
pub enum ApCommand {
    /// Claim into the organization with the configured claim code
    Claim { mac: String },

    /// Assign to the configured site
    Provision {
        mac: String,
        /// Device name (defaults to `ap.name`)
        #[arg(long)]
        name: Option<String>,
    },

    /// Push the configured 2.4 GHz and 5 GHz radio settings
    Radios { mac: String },

    /// Detach from its site, keeping it in the organization
    Unassign { mac: String },

    /// Remove from the organization inventory
    Release { mac: String },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
