//! HTTP transport against an ARM-style management endpoint.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, info};
use vaultkeep_core::{Job, RestoreRequestResource, RestoreTarget};

use crate::{RawRestorableEntry, RestorableCatalog, RestoreTransport, TransportError};

pub const RECOVERY_SERVICES_API_VERSION: &str = "2016-12-01";
pub const DOCUMENT_DB_API_VERSION: &str = "2021-04-01-preview";

const HEADER_ASYNC_OPERATION: &str = "azure-asyncoperation";
const HEADER_REQUEST_ID: &str = "x-ms-request-id";
const MAX_LIST_PAGES: usize = 1000;

#[derive(Debug, Clone)]
pub struct HttpPlaneConfig {
    /// e.g. `https://management.azure.com`.
    pub endpoint: String,
    pub subscription_id: String,
    pub access_token: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Deserialize)]
struct ListPage {
    #[serde(default)]
    value: Vec<RawRestorableEntry>,
    #[serde(rename = "nextLink", default)]
    next_link: Option<String>,
}

pub struct HttpPlane {
    client: Client,
    base_url: Url,
    subscription_id: String,
    access_token: Option<String>,
}

impl HttpPlane {
    pub fn new(config: HttpPlaneConfig) -> Result<Self, TransportError> {
        let endpoint = config.endpoint.trim_end_matches('/');
        let base_url = Url::parse(endpoint)
            .map_err(|e| TransportError::Other(format!("invalid endpoint {endpoint:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::Other(format!(
                "endpoint {endpoint:?} cannot carry a resource path"
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            subscription_id: config.subscription_id,
            access_token: config.access_token,
        })
    }

    fn url(&self, segments: &[&str], api_version: &str) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::Other("endpoint cannot carry a resource path".into()))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET `first` and every `nextLink` after it, concatenating `value`.
    ///
    /// A `nextLink` must stay on the endpoint's origin and must not revisit a
    /// page; either violation fails the listing before the request is sent.
    async fn list_all(&self, first: Url) -> Result<Vec<RawRestorableEntry>, TransportError> {
        let mut entries = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(first);
        while let Some(url) = next.take() {
            if visited.len() >= MAX_LIST_PAGES {
                return Err(TransportError::Other(format!(
                    "listing exceeded {MAX_LIST_PAGES} pages"
                )));
            }
            if !visited.insert(url.clone()) {
                return Err(TransportError::Other(format!("listing revisits page {url}")));
            }
            debug!(url = %url, page = visited.len(), "fetching listing page");
            let resp = self.authorize(self.client.get(url)).send().await?;
            let page: ListPage = ensure_success(resp).await?.json().await?;
            entries.extend(page.value);
            next = match page.next_link.filter(|link| !link.is_empty()) {
                Some(link) => Some(self.next_page(&link)?),
                None => None,
            };
        }
        Ok(entries)
    }

    fn next_page(&self, link: &str) -> Result<Url, TransportError> {
        let url = Url::parse(link)
            .map_err(|e| TransportError::Other(format!("invalid nextLink {link:?}: {e}")))?;
        if url.origin() != self.base_url.origin() {
            return Err(TransportError::Other(format!(
                "nextLink {link:?} leaves the endpoint origin"
            )));
        }
        Ok(url)
    }
}

async fn ensure_success(resp: Response) -> Result<Response, TransportError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(TransportError::Server {
        status: status.as_u16(),
        body,
    })
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl RestoreTransport for HttpPlane {
    async fn trigger_restore(
        &self,
        target: &RestoreTarget,
        request: &RestoreRequestResource,
    ) -> Result<Job, TransportError> {
        let url = self.url(
            &[
                "subscriptions",
                &target.subscription_id,
                "resourceGroups",
                &target.resource_group_name,
                "providers",
                "Microsoft.RecoveryServices",
                "vaults",
                &target.vault_name,
                "backupFabrics",
                &target.fabric_name,
                "protectionContainers",
                &target.container,
                "protectedItems",
                &target.protected_item,
                "recoveryPoints",
                &target.recovery_point_id,
                "restore",
            ],
            RECOVERY_SERVICES_API_VERSION,
        )?;

        info!(url = %url, "posting restore trigger");
        let resp = self
            .authorize(self.client.post(url).json(request))
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        let headers = resp.headers();
        let job = Job {
            status: resp.status().as_u16(),
            location: header(headers, reqwest::header::LOCATION.as_str()),
            async_operation: header(headers, HEADER_ASYNC_OPERATION),
            request_id: header(headers, HEADER_REQUEST_ID),
        };
        Ok(job)
    }
}

#[async_trait]
impl RestorableCatalog for HttpPlane {
    async fn list_restorable_sql_databases(
        &self,
        location: &str,
        account_instance_id: &str,
    ) -> Result<Vec<RawRestorableEntry>, TransportError> {
        let url = self.url(
            &[
                "subscriptions",
                &self.subscription_id,
                "providers",
                "Microsoft.DocumentDB",
                "locations",
                location,
                "restorableDatabaseAccounts",
                account_instance_id,
                "restorableSqlDatabases",
            ],
            DOCUMENT_DB_API_VERSION,
        )?;
        self.list_all(url).await
    }

    async fn list_restorable_sql_containers(
        &self,
        location: &str,
        account_instance_id: &str,
        database_rid: &str,
    ) -> Result<Vec<RawRestorableEntry>, TransportError> {
        let mut url = self.url(
            &[
                "subscriptions",
                &self.subscription_id,
                "providers",
                "Microsoft.DocumentDB",
                "locations",
                location,
                "restorableDatabaseAccounts",
                account_instance_id,
                "restorableSqlContainers",
            ],
            DOCUMENT_DB_API_VERSION,
        )?;
        url.query_pairs_mut()
            .append_pair("restorableSqlDatabaseRid", database_rid);
        self.list_all(url).await
    }
}
