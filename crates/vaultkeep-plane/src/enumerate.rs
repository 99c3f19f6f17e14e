//! Restorable-resource listings projected into [`RestorableResource`].

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;
use vaultkeep_core::{RestorableDatabaseId, RestorableResource, RestoreError};

use crate::cancel::run_cancellable;
use crate::{PlaneError, RawRestorableEntry, RestorableCatalog};

/// Parameters for listing restorable containers under one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerQuery {
    pub location: String,
    pub account_instance_id: String,
    /// `_rid` of the owning database.
    pub database_rid: String,
}

impl ContainerQuery {
    pub fn new(
        location: impl Into<String>,
        account_instance_id: impl Into<String>,
        database_rid: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            account_instance_id: account_instance_id.into(),
            database_rid: database_rid.into(),
        }
    }

    /// Derive the query from a restorable database returned by an earlier
    /// listing: location and account instance come from its id, the database
    /// rid is its owner resource id.
    pub fn from_parent(parent: &RestorableResource) -> Result<Self, RestoreError> {
        let id = RestorableDatabaseId::parse(&parent.id)?;
        Ok(Self {
            location: id.location().to_string(),
            account_instance_id: id.account_instance_id().to_string(),
            database_rid: parent.owner_resource_id.clone(),
        })
    }
}

/// One-shot sequence of projected records, in server order.
///
/// Entries are projected as they are pulled. Consumed by value; listing
/// again means issuing a fresh request.
#[derive(Debug)]
pub struct Restorables {
    entries: std::vec::IntoIter<RawRestorableEntry>,
}

impl Restorables {
    fn new(entries: Vec<RawRestorableEntry>) -> Self {
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl Iterator for Restorables {
    type Item = RestorableResource;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(RestorableResource::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for Restorables {}

pub struct Enumerator<C> {
    catalog: C,
    timeout: Option<Duration>,
}

impl<C: RestorableCatalog> Enumerator<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn restorable_databases(
        &self,
        location: &str,
        account_instance_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Restorables, PlaneError> {
        let entries = run_cancellable(
            cancel,
            self.timeout,
            self.catalog
                .list_restorable_sql_databases(location, account_instance_id),
        )
        .await?;
        info!(count = entries.len(), location, account_instance_id, "listed restorable databases");
        Ok(Restorables::new(entries))
    }

    pub async fn restorable_containers(
        &self,
        query: &ContainerQuery,
        cancel: &CancellationToken,
    ) -> Result<Restorables, PlaneError> {
        let entries = run_cancellable(
            cancel,
            self.timeout,
            self.catalog.list_restorable_sql_containers(
                &query.location,
                &query.account_instance_id,
                &query.database_rid,
            ),
        )
        .await?;
        info!(
            count = entries.len(),
            location = %query.location,
            database_rid = %query.database_rid,
            "listed restorable containers"
        );
        Ok(Restorables::new(entries))
    }

    /// List containers under `parent`, a record from
    /// [`restorable_databases`](Self::restorable_databases).
    pub async fn restorable_containers_of(
        &self,
        parent: &RestorableResource,
        cancel: &CancellationToken,
    ) -> Result<Restorables, PlaneError> {
        let query = ContainerQuery::from_parent(parent)?;
        self.restorable_containers(&query, cancel).await
    }
}
