use anyhow::Result;
use tracing::{debug, info};

use super::roles_for;
use crate::api::HostSource;
use crate::cache::{CacheDocument, CacheStore};
use crate::params;

/// Builds a fresh generation from a host source.
///
/// The generation is written to the store after every host that joins the
/// inventory, so an interrupted run still leaves a usable (if incomplete)
/// cache behind.
pub struct InventoryBuilder<'a, S: ?Sized> {
    source: &'a S,
    store: &'a CacheStore,
}

impl<'a, S> InventoryBuilder<'a, S>
where
    S: HostSource + ?Sized,
{
    pub fn new(source: &'a S, store: &'a CacheStore) -> Self {
        Self { source, store }
    }

    /// Fetches every host, resolves its parameters and groups it by role.
    ///
    /// Hosts without a usable `openshift-role` parameter are fetched and
    /// resolved but recorded nowhere. If no host qualifies, an empty generation
    /// is still written so the store holds a complete set of documents.
    pub async fn build(&self) -> Result<CacheDocument> {
        let hosts = self.source.fetch_hosts().await?;
        let total = hosts.len();
        let mut document = CacheDocument::default();

        for host in hosts {
            let params = params::resolve(self.source, &host).await?;

            let Some(roles) = roles_for(&params) else {
                debug!(host = %host.name, "No role parameter, skipping host");
                continue;
            };

            for role in roles {
                document.inventory.push(role, host.name.clone());
            }
            document.params.insert(host.name.clone(), params);
            document.hosts.insert(host.name.clone(), host);

            self.store.save(&document)?;
        }

        if document.is_empty() {
            self.store.save(&document)?;
        }

        info!(
            fetched = total,
            recorded = document.hosts.len(),
            groups = document.inventory.len(),
            "Inventory refreshed"
        );
        Ok(document)
    }
}
