//! Domain types shared by the restore engine, the transports, and the CLI.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point-in-time backup of a protected virtual machine.
///
/// Supplied by the caller (usually deserialized from a previous listing);
/// read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPoint {
    /// Full recovery-services id; see [`RecoveryPointPath`](crate::RecoveryPointPath).
    pub id: String,
    pub recovery_point_id: String,
    pub source_resource_id: String,
    #[serde(default, alias = "originalSAEnabled")]
    pub original_storage_account_enabled: bool,
    #[serde(default)]
    pub is_managed_virtual_machine: bool,
}

/// Coarse storage family. Anything that is not the classic marker is compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageCategory {
    Classic,
    Compute,
}

impl fmt::Display for StorageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classic => f.write_str("Classic"),
            Self::Compute => f.write_str("Compute"),
        }
    }
}

/// Fabric that owns IaaS VM protected items.
pub const DEFAULT_FABRIC_NAME: &str = "Azure";

/// Explicit defaults an operation falls back on when the caller leaves a
/// vault field unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultContext {
    pub subscription_id: String,
    pub vault_name: String,
    pub resource_group_name: String,
    pub vault_location: String,
    pub fabric_name: String,
}

/// Caller intent for a disk restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreOptions {
    pub storage_account_id: String,
    pub storage_account_location: String,
    /// ARM resource type of the target account, e.g.
    /// `Microsoft.Storage/storageAccounts`.
    pub storage_account_type: String,
    pub target_resource_group_name: Option<String>,
    pub use_original_storage_account: bool,
    pub vault_name: Option<String>,
    pub resource_group_name: Option<String>,
    pub vault_location: Option<String>,
}

/// Vault coordinates after applying [`VaultContext`] defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVault {
    pub subscription_id: String,
    pub vault_name: String,
    pub resource_group_name: String,
    pub vault_location: String,
    pub fabric_name: String,
}

impl RestoreOptions {
    pub fn resolve_vault(&self, ctx: &VaultContext) -> ResolvedVault {
        ResolvedVault {
            subscription_id: ctx.subscription_id.clone(),
            vault_name: self
                .vault_name
                .clone()
                .unwrap_or_else(|| ctx.vault_name.clone()),
            resource_group_name: self
                .resource_group_name
                .clone()
                .unwrap_or_else(|| ctx.resource_group_name.clone()),
            vault_location: self
                .vault_location
                .clone()
                .unwrap_or_else(|| ctx.vault_location.clone()),
            fabric_name: ctx.fabric_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryType {
    RestoreDisks,
}

/// Canonical IaaS VM restore request.
///
/// Built only by [`RestoreRequestBuilder`](crate::RestoreRequestBuilder);
/// fields are read through accessors so the request cannot change between
/// validation and submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreRequest {
    pub(crate) object_type: &'static str,
    pub(crate) recovery_point_id: String,
    pub(crate) recovery_type: RecoveryType,
    pub(crate) source_resource_id: String,
    pub(crate) storage_account_id: String,
    pub(crate) region: String,
    pub(crate) create_new_cloud_service: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) target_resource_group_id: Option<String>,
    pub(crate) original_storage_account_option: bool,
}

impl RestoreRequest {
    pub const OBJECT_TYPE: &'static str = "IaasVMRestoreRequest";

    pub fn recovery_point_id(&self) -> &str {
        &self.recovery_point_id
    }

    pub fn recovery_type(&self) -> RecoveryType {
        self.recovery_type
    }

    pub fn source_resource_id(&self) -> &str {
        &self.source_resource_id
    }

    pub fn storage_account_id(&self) -> &str {
        &self.storage_account_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn create_new_cloud_service(&self) -> bool {
        self.create_new_cloud_service
    }

    pub fn target_resource_group_id(&self) -> Option<&str> {
        self.target_resource_group_id.as_deref()
    }

    pub fn original_storage_account_option(&self) -> bool {
        self.original_storage_account_option
    }

    /// Wrap in the `{ "properties": ... }` envelope the trigger endpoint expects.
    pub fn into_resource(self) -> RestoreRequestResource {
        RestoreRequestResource { properties: self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreRequestResource {
    pub properties: RestoreRequest,
}

/// Handle for the asynchronous restore job the management plane accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub status: u16,
    /// `Location` header: operation-result URL.
    pub location: Option<String>,
    /// `Azure-AsyncOperation` header: operation-status URL.
    pub async_operation: Option<String>,
    pub request_id: Option<String>,
}

/// One restorable sub-resource, projected from a listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestorableResource {
    pub id: String,
    pub name: String,
    pub resource_type: String,
    pub owner_id: String,
    pub owner_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_timestamp: Option<String>,
}
