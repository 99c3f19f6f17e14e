//! Restore pre-flight for recovery-services disk restores, plus the
//! identifier parsing shared with restorable-resource listings.

pub mod error;
pub mod ids;
pub mod model;
pub mod osa;
pub mod request;
pub mod validate;

pub use error::RestoreError;
pub use ids::{RecoveryPointPath, ResourcePath, RestorableDatabaseId};
pub use model::{
    DEFAULT_FABRIC_NAME, Job, RecoveryPoint, RecoveryType, ResolvedVault, RestorableResource,
    RestoreOptions, RestoreRequest, RestoreRequestResource, StorageCategory, VaultContext,
};
pub use osa::{OsaDecision, OsaRationale, resolve_osa};
pub use request::{PreparedRestore, RestoreRequestBuilder, RestoreTarget, prepare_restore};
pub use validate::{Advisory, classify_container, classify_storage_account_type, validate_restore};
