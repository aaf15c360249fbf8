//! Command-line interface.
//!
//! Ansible invokes dynamic inventory scripts in two ways:
//!
//! ```bash
//! foreman-inventory --list          # every group plus _meta.hostvars
//! foreman-inventory --host NAME     # variables of one host
//! ```
//!
//! `--refresh-cache` skips the cache validity check and queries Foreman.
//! Only JSON is written to stdout; logs and errors go to stderr.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::api::ForemanClient;
use crate::cache::CacheStore;
use crate::config::Settings;
use crate::inventory::InventorySession;
use crate::output;

/// Produce an Ansible inventory from Foreman hosts grouped by `openshift-role`.
#[derive(Parser, Debug)]
#[command(name = "foreman-inventory", version, about, long_about = None)]
pub struct Cli {
    /// List all groups and host variables (default)
    #[arg(long, default_value_t = true)]
    list: bool,

    /// Print the cached record of a single host
    #[arg(long, value_name = "NAME")]
    host: Option<String>,

    /// Query Foreman even if the cache is still valid
    #[arg(long)]
    refresh_cache: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Additional settings file, applied after the standard locations
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Installs the stderr log subscriber. `RUST_LOG` takes precedence.
    pub fn init_logging(&self) {
        let default_level = if self.verbose { "debug" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Runs the pipeline and returns the JSON document to print.
    pub async fn execute(self) -> Result<String> {
        debug!(list = self.list, host = ?self.host, refresh = self.refresh_cache, "Starting");
        let settings = Settings::load(self.config.as_deref())?;
        let client = ForemanClient::new(&settings.foreman)?;
        let store = CacheStore::from_settings(&settings.cache);

        let mut session = InventorySession::new(client, store);
        session.prepare(self.refresh_cache).await?;

        match self.host.as_deref() {
            Some(name) => output::render_host(session.host(name).await?),
            None => output::render_all(session.document()),
        }
    }
}
