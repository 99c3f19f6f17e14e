//! Original-storage-account (OSA) reuse policy.

use crate::{RecoveryPoint, RestoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsaRationale {
    /// The caller did not ask for OSA reuse.
    NotRequested,
    /// The caller asked and the recovery point supports it.
    Supported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsaDecision {
    pub use_original_storage_account: bool,
    pub rationale: OsaRationale,
}

/// Decide whether disks are restored into their original storage account.
///
/// Requesting reuse on a recovery point without the capability is terminal.
pub fn resolve_osa(rp: &RecoveryPoint, requested: bool) -> Result<OsaDecision, RestoreError> {
    if !requested {
        return Ok(OsaDecision {
            use_original_storage_account: false,
            rationale: OsaRationale::NotRequested,
        });
    }
    if !rp.original_storage_account_enabled {
        return Err(RestoreError::UnsupportedOsaRequest);
    }
    Ok(OsaDecision {
        use_original_storage_account: true,
        rationale: OsaRationale::Supported,
    })
}
