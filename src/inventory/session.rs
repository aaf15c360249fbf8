use anyhow::Result;
use tracing::{debug, info};

use super::InventoryBuilder;
use crate::api::{Host, HostSource};
use crate::cache::{CacheDocument, CacheStore};

/// State of one invocation: where hosts come from, where they are cached, and
/// the generation currently in memory.
///
/// Nothing else holds inventory state; each run creates one session and
/// drives it to completion.
pub struct InventorySession<S> {
    source: S,
    store: CacheStore,
    document: CacheDocument,
}

impl<S: HostSource> InventorySession<S> {
    /// A session with an empty in-memory generation.
    pub fn new(source: S, store: CacheStore) -> Self {
        Self {
            source,
            store,
            document: CacheDocument::default(),
        }
    }

    /// Makes a generation available: rebuilt when forced or when the cache is
    /// not valid, otherwise loaded from the store.
    pub async fn prepare(&mut self, force_refresh: bool) -> Result<()> {
        if force_refresh {
            debug!("Cache refresh requested");
            return self.refresh().await;
        }

        if self.store.is_valid() {
            self.document = self.store.load()?;
            Ok(())
        } else {
            self.refresh().await
        }
    }

    /// Rebuilds the generation from the source, replacing the in-memory one.
    pub async fn refresh(&mut self) -> Result<()> {
        self.document = InventoryBuilder::new(&self.source, &self.store).build().await?;
        Ok(())
    }

    /// The in-memory generation.
    pub fn document(&self) -> &CacheDocument {
        &self.document
    }

    /// Looks up a host by DNS name.
    ///
    /// An empty in-memory host map is first reloaded from the store. A name
    /// that is still unknown triggers one refresh; `None` after that means
    /// the host no longer exists (or has no role).
    pub async fn host(&mut self, name: &str) -> Result<Option<&Host>> {
        if self.document.hosts.is_empty() {
            self.document.hosts = self.store.load_hosts()?;
        }

        if !self.document.hosts.contains_key(name) {
            info!(host = name, "Host not in cache, refreshing");
            self.refresh().await?;
        }

        Ok(self.document.hosts.get(name))
    }
}
