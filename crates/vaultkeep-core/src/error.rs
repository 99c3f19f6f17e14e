use thiserror::Error;

use crate::model::StorageCategory;

/// Validation failures raised before anything reaches the management plane.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RestoreError {
    #[error("malformed resource identifier {path:?}: missing {segment}")]
    MalformedIdentifier { path: String, segment: &'static str },

    #[error(
        "this recovery point doesn't have the capability to restore disks to their original \
         storage account; re-run the restore without requesting the original storage account"
    )]
    UnsupportedOsaRequest,

    #[error(
        "storage account location {storage_account_location:?} does not match vault location \
         {vault_location:?}; pick a storage account in the vault's region"
    )]
    RegionMismatch {
        storage_account_location: String,
        vault_location: String,
    },

    #[error(
        "the recovery point was taken from a {expected} virtual machine; restore it to a \
         {expected} storage account"
    )]
    StorageTypeMismatch { expected: StorageCategory },
}

impl RestoreError {
    pub(crate) fn malformed(path: &str, segment: &'static str) -> Self {
        Self::MalformedIdentifier {
            path: path.to_string(),
            segment,
        }
    }
}
