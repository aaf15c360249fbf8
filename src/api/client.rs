//! HTTP client for the Foreman v2 REST API.
//!
//! Collections are paginated with `page`/`per_page` query parameters and
//! report the collection size in `total`. [`ForemanClient::get_collection`]
//! keeps requesting pages until it has `total` records, or until a page comes
//! back empty (hosts deleted between two page requests).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{Host, HostDetail, HostId, Page};
use super::HostSource;
use crate::config::ForemanSettings;
use crate::constants::{HOSTS_PATH, PER_PAGE};
use crate::core::InventoryError;
use crate::params::Parameter;

/// Authenticated client for one Foreman instance.
#[derive(Clone)]
pub struct ForemanClient {
    http: Client,
    base_url: String,
    user: String,
    password: String,
}

impl ForemanClient {
    /// Builds a client from the `[foreman]` settings.
    ///
    /// `ssl_verify = false` disables certificate validation.
    pub fn new(settings: &ForemanSettings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("foreman-inventory/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!settings.ssl_verify)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
            user: settings.user.clone(),
            password: settings.password.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, url: &str, page: Option<u32>) -> Result<Response> {
        let mut request = self.http.get(url).basic_auth(&self.user, Some(&self.password));
        if let Some(page) = page {
            request = request.query(&[("page", page), ("per_page", PER_PAGE)]);
        }

        debug!(url, ?page, "GET");
        let response = request.send().await.map_err(|e| InventoryError::NetworkError {
            operation: format!("GET {url}"),
            reason: e.to_string(),
        })?;
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.json::<T>().await.map_err(|e| InventoryError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(body)
    }

    /// Fetches every record of a paginated collection.
    ///
    /// Any non-success status aborts the whole listing. A page without
    /// records before `total` is reached ends the listing early with a
    /// warning and whatever was collected so far.
    pub async fn get_collection<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = self.endpoint(path);
        let mut results: Vec<T> = Vec::new();
        let mut page = 1;

        loop {
            let response = self.send(&url, Some(page)).await?;
            let body: Page<T> = Self::decode(&url, response).await?;
            let received = body.results.len();
            results.extend(body.results);

            if results.len() as u64 >= body.total {
                break;
            }
            if received == 0 {
                warn!(
                    url = %url,
                    expected = body.total,
                    got = results.len(),
                    "Did not make any progress during pagination, returning partial results"
                );
                break;
            }
            page += 1;
        }

        debug!(url = %url, count = results.len(), pages = page, "Collection fetched");
        Ok(results)
    }

    /// Fetches a single resource. `404 Not Found` yields `None`.
    pub async fn get_resource<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.endpoint(path);
        let response = self.send(&url, None).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(url = %url, "Resource not found, treating as empty");
            return Ok(None);
        }

        Self::decode(&url, response).await.map(Some)
    }
}

#[async_trait]
impl HostSource for ForemanClient {
    async fn fetch_hosts(&self) -> Result<Vec<Host>> {
        self.get_collection(HOSTS_PATH).await.context("Failed to list Foreman hosts")
    }

    async fn fetch_host_parameters(&self, id: &HostId) -> Result<Vec<Parameter>> {
        let path = format!("{HOSTS_PATH}/{id}");
        let detail: HostDetail = self
            .get_resource(&path)
            .await
            .with_context(|| format!("Failed to fetch parameters of host {id}"))?
            .unwrap_or_default();

        Ok(detail.all_parameters.into_iter().map(Parameter::from).collect())
    }
}
