//! Region and storage-type compatibility checks for disk restores.

use std::fmt;

use tracing::warn;

use crate::{RecoveryPoint, RestoreError, RestoreOptions, StorageCategory};

const CLASSIC_CONTAINER_MARKER: &str = "iaasvmcontainer";
const CLASSIC_STORAGE_TYPE: &str = "Microsoft.ClassicStorage/StorageAccounts";

/// Non-blocking findings surfaced alongside a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    UnmanagedIntoTargetResourceGroup { resource_group: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmanagedIntoTargetResourceGroup { resource_group } => write!(
                f,
                "the backup is of an unmanaged virtual machine; target resource group \
                 {resource_group:?} only applies to managed disks and may be ignored"
            ),
        }
    }
}

/// Classify a composite container name such as
/// `IaasVMContainer;iaasvmcontainer;rg;vm`. The second `;` token is the
/// container type; a classic VM uses the bare marker, ARM VMs use `...v2`.
pub fn classify_container(container: &str) -> Result<StorageCategory, RestoreError> {
    let kind = container
        .split(';')
        .nth(1)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RestoreError::malformed(container, "container type"))?;
    if kind.eq_ignore_ascii_case(CLASSIC_CONTAINER_MARKER) {
        Ok(StorageCategory::Classic)
    } else {
        Ok(StorageCategory::Compute)
    }
}

pub fn classify_storage_account_type(resource_type: &str) -> StorageCategory {
    if resource_type.eq_ignore_ascii_case(CLASSIC_STORAGE_TYPE) {
        StorageCategory::Classic
    } else {
        StorageCategory::Compute
    }
}

/// Run every check that must pass before a request is built.
///
/// `container` is the composite container name parsed from the recovery
/// point id; `vault_location` is already resolved against the vault context.
pub fn validate_restore(
    rp: &RecoveryPoint,
    container: &str,
    opts: &RestoreOptions,
    vault_location: &str,
) -> Result<Vec<Advisory>, RestoreError> {
    if opts.storage_account_location != vault_location {
        return Err(RestoreError::RegionMismatch {
            storage_account_location: opts.storage_account_location.clone(),
            vault_location: vault_location.to_string(),
        });
    }

    let vm_category = classify_container(container)?;
    let storage_category = classify_storage_account_type(&opts.storage_account_type);
    if vm_category != storage_category {
        return Err(RestoreError::StorageTypeMismatch {
            expected: vm_category,
        });
    }

    let mut advisories = Vec::new();
    if let (Some(rg), false) = (&opts.target_resource_group_name, rp.is_managed_virtual_machine) {
        let advisory = Advisory::UnmanagedIntoTargetResourceGroup {
            resource_group: rg.clone(),
        };
        warn!(recovery_point = %rp.recovery_point_id, "{advisory}");
        advisories.push(advisory);
    }
    Ok(advisories)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIC: &str = "IaasVMContainer;iaasvmcontainer;cloudsvc;vm1";
    const COMPUTE: &str = "IaasVMContainer;iaasvmcontainerv2;rg;vm1";

    fn rp(managed: bool) -> RecoveryPoint {
        RecoveryPoint {
            id: "/rp".into(),
            recovery_point_id: "1".into(),
            source_resource_id: "/vm".into(),
            original_storage_account_enabled: false,
            is_managed_virtual_machine: managed,
        }
    }

    fn opts(location: &str, storage_type: &str) -> RestoreOptions {
        RestoreOptions {
            storage_account_id: "/sa".into(),
            storage_account_location: location.into(),
            storage_account_type: storage_type.into(),
            ..RestoreOptions::default()
        }
    }

    #[test]
    fn container_marker_is_case_insensitive() {
        for marker in ["IaasVmContainer", "iaasvmcontainer", "IAASVMCONTAINER"] {
            let container = format!("IaasVMContainer;{marker};rg;vm");
            assert_eq!(
                classify_container(&container).unwrap(),
                StorageCategory::Classic,
                "{container}"
            );
        }
    }

    #[test]
    fn anything_else_is_compute() {
        assert_eq!(classify_container(COMPUTE).unwrap(), StorageCategory::Compute);
        assert_eq!(
            classify_storage_account_type("Microsoft.Storage/storageAccounts"),
            StorageCategory::Compute
        );
        assert_eq!(
            classify_storage_account_type("microsoft.classicstorage/storageaccounts"),
            StorageCategory::Classic
        );
    }

    #[test]
    fn container_without_type_token_is_malformed() {
        assert!(matches!(
            classify_container("vm1"),
            Err(RestoreError::MalformedIdentifier { segment: "container type", .. })
        ));
    }

    #[test]
    fn region_mismatch_reports_both_locations() {
        let err = validate_restore(
            &rp(true),
            COMPUTE,
            &opts("eastus", "Microsoft.Storage/storageAccounts"),
            "westus",
        )
        .unwrap_err();
        assert_eq!(
            err,
            RestoreError::RegionMismatch {
                storage_account_location: "eastus".into(),
                vault_location: "westus".into(),
            }
        );
    }

    #[test]
    fn region_comparison_is_exact() {
        let err = validate_restore(
            &rp(true),
            COMPUTE,
            &opts("WestUS", "Microsoft.Storage/storageAccounts"),
            "westus",
        );
        assert!(matches!(err, Err(RestoreError::RegionMismatch { .. })));
    }

    #[test]
    fn classic_vm_into_compute_account_fails() {
        let err = validate_restore(
            &rp(false),
            CLASSIC,
            &opts("westus", "Microsoft.Compute/StorageAccounts"),
            "westus",
        )
        .unwrap_err();
        assert_eq!(
            err,
            RestoreError::StorageTypeMismatch {
                expected: StorageCategory::Classic
            }
        );
        assert!(err.to_string().contains("Classic storage account"));
    }

    #[test]
    fn compute_vm_into_classic_account_fails() {
        let err = validate_restore(
            &rp(true),
            COMPUTE,
            &opts("westus", CLASSIC_STORAGE_TYPE),
            "westus",
        )
        .unwrap_err();
        assert_eq!(
            err,
            RestoreError::StorageTypeMismatch {
                expected: StorageCategory::Compute
            }
        );
    }

    #[test]
    fn unmanaged_into_named_group_is_advisory_only() {
        let mut o = opts("westus", CLASSIC_STORAGE_TYPE);
        o.target_resource_group_name = Some("rg1".into());
        let advisories = validate_restore(&rp(false), CLASSIC, &o, "westus").unwrap();
        assert_eq!(
            advisories,
            vec![Advisory::UnmanagedIntoTargetResourceGroup {
                resource_group: "rg1".into()
            }]
        );
    }

    #[test]
    fn managed_or_no_group_has_no_advisory() {
        let mut o = opts("westus", "Microsoft.Storage/storageAccounts");
        assert!(validate_restore(&rp(false), COMPUTE, &o, "westus").unwrap().is_empty());
        o.target_resource_group_name = Some("rg1".into());
        assert!(validate_restore(&rp(true), COMPUTE, &o, "westus").unwrap().is_empty());
    }
}
