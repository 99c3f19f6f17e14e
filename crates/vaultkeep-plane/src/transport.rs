//! Traits the management-plane transports implement.

use async_trait::async_trait;
use vaultkeep_core::{Job, RestoreRequestResource, RestoreTarget};

use crate::{RawRestorableEntry, TransportError};

/// Accepts a built restore request and returns the job the plane queued.
#[async_trait]
pub trait RestoreTransport: Send + Sync {
    async fn trigger_restore(
        &self,
        target: &RestoreTarget,
        request: &RestoreRequestResource,
    ) -> Result<Job, TransportError>;
}

/// Lists restorable resources. Implementations return the complete listing,
/// following any server-side continuation, in server order.
#[async_trait]
pub trait RestorableCatalog: Send + Sync {
    async fn list_restorable_sql_databases(
        &self,
        location: &str,
        account_instance_id: &str,
    ) -> Result<Vec<RawRestorableEntry>, TransportError>;

    async fn list_restorable_sql_containers(
        &self,
        location: &str,
        account_instance_id: &str,
        database_rid: &str,
    ) -> Result<Vec<RawRestorableEntry>, TransportError>;
}

#[async_trait]
impl<T: RestoreTransport + ?Sized> RestoreTransport for &T {
    async fn trigger_restore(
        &self,
        target: &RestoreTarget,
        request: &RestoreRequestResource,
    ) -> Result<Job, TransportError> {
        (**self).trigger_restore(target, request).await
    }
}

#[async_trait]
impl<T: RestorableCatalog + ?Sized> RestorableCatalog for &T {
    async fn list_restorable_sql_databases(
        &self,
        location: &str,
        account_instance_id: &str,
    ) -> Result<Vec<RawRestorableEntry>, TransportError> {
        (**self)
            .list_restorable_sql_databases(location, account_instance_id)
            .await
    }

    async fn list_restorable_sql_containers(
        &self,
        location: &str,
        account_instance_id: &str,
        database_rid: &str,
    ) -> Result<Vec<RawRestorableEntry>, TransportError> {
        (**self)
            .list_restorable_sql_containers(location, account_instance_id, database_rid)
            .await
    }
}
