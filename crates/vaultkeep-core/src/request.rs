//! Restore request assembly.
//!
//! [`prepare_restore`] is the full pre-flight: parse the recovery point id,
//! resolve the OSA policy, validate region and storage type, then build. It
//! never touches the network, so every failure here happens before a
//! submission is attempted.

use tracing::debug;

use crate::{
    Advisory, OsaDecision, RecoveryPoint, RecoveryPointPath, RecoveryType, RestoreError,
    RestoreOptions, RestoreRequest, VaultContext, resolve_osa, validate_restore,
};

/// Builds the disks-only [`RestoreRequest`] shape.
#[derive(Debug, Clone)]
pub struct RestoreRequestBuilder<'a> {
    rp: &'a RecoveryPoint,
    osa: OsaDecision,
    storage_account_id: String,
    region: String,
    target_resource_group_id: Option<String>,
}

impl<'a> RestoreRequestBuilder<'a> {
    pub fn new(
        rp: &'a RecoveryPoint,
        osa: OsaDecision,
        storage_account_id: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            rp,
            osa,
            storage_account_id: storage_account_id.into(),
            region: region.into(),
            target_resource_group_id: None,
        }
    }

    /// Expand a bare resource-group name into
    /// `/subscriptions/{sub}/resourceGroups/{name}`. `None` leaves the field
    /// unset so the plane picks its default group.
    pub fn target_resource_group(mut self, subscription_id: &str, name: Option<&str>) -> Self {
        self.target_resource_group_id =
            name.map(|rg| format!("/subscriptions/{subscription_id}/resourceGroups/{rg}"));
        self
    }

    pub fn build(self) -> RestoreRequest {
        RestoreRequest {
            object_type: RestoreRequest::OBJECT_TYPE,
            recovery_point_id: self.rp.recovery_point_id.clone(),
            recovery_type: RecoveryType::RestoreDisks,
            source_resource_id: self.rp.source_resource_id.clone(),
            storage_account_id: self.storage_account_id,
            region: self.region,
            create_new_cloud_service: false,
            target_resource_group_id: self.target_resource_group_id,
            original_storage_account_option: self.osa.use_original_storage_account,
        }
    }
}

/// Where the trigger call is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreTarget {
    pub subscription_id: String,
    pub vault_name: String,
    pub resource_group_name: String,
    pub fabric_name: String,
    pub container: String,
    pub protected_item: String,
    pub recovery_point_id: String,
}

/// Output of a successful pre-flight, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRestore {
    pub target: RestoreTarget,
    pub request: RestoreRequest,
    pub advisories: Vec<Advisory>,
}

pub fn prepare_restore(
    rp: &RecoveryPoint,
    opts: &RestoreOptions,
    ctx: &VaultContext,
) -> Result<PreparedRestore, RestoreError> {
    let path = RecoveryPointPath::parse(&rp.id)?;
    let osa = resolve_osa(rp, opts.use_original_storage_account)?;
    let vault = opts.resolve_vault(ctx);

    let advisories = validate_restore(rp, &path.container, opts, &vault.vault_location)?;

    let request = RestoreRequestBuilder::new(
        rp,
        osa,
        opts.storage_account_id.clone(),
        vault.vault_location.clone(),
    )
    .target_resource_group(
        &vault.subscription_id,
        opts.target_resource_group_name.as_deref(),
    )
    .build();

    debug!(
        container = %path.container,
        item = %path.protected_item,
        osa = request.original_storage_account_option(),
        "restore request built"
    );

    Ok(PreparedRestore {
        target: RestoreTarget {
            subscription_id: vault.subscription_id,
            vault_name: vault.vault_name,
            resource_group_name: vault.resource_group_name,
            fabric_name: vault.fabric_name,
            container: path.container,
            protected_item: path.protected_item,
            recovery_point_id: rp.recovery_point_id.clone(),
        },
        request,
        advisories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_FABRIC_NAME, OsaRationale};

    const COMPUTE_RP: &str = "/Subscriptions/sub1/resourceGroups/vault-rg/providers/Microsoft.RecoveryServices/vaults/vault1/backupFabrics/Azure/protectionContainers/IaasVMContainer;iaasvmcontainerv2;vm-rg;vm1/protectedItems/VM;iaasvmcontainerv2;vm-rg;vm1/recoveryPoints/42";

    fn rp(osa_enabled: bool) -> RecoveryPoint {
        RecoveryPoint {
            id: COMPUTE_RP.into(),
            recovery_point_id: "42".into(),
            source_resource_id: "/subscriptions/sub1/resourceGroups/vm-rg/providers/Microsoft.Compute/virtualMachines/vm1".into(),
            original_storage_account_enabled: osa_enabled,
            is_managed_virtual_machine: true,
        }
    }

    fn ctx() -> VaultContext {
        VaultContext {
            subscription_id: "sub1".into(),
            vault_name: "vault1".into(),
            resource_group_name: "vault-rg".into(),
            vault_location: "westus".into(),
            fabric_name: DEFAULT_FABRIC_NAME.into(),
        }
    }

    fn opts() -> RestoreOptions {
        RestoreOptions {
            storage_account_id: "/subscriptions/sub1/resourceGroups/sa-rg/providers/Microsoft.Storage/storageAccounts/sa1".into(),
            storage_account_location: "westus".into(),
            storage_account_type: "Microsoft.Storage/storageAccounts".into(),
            ..RestoreOptions::default()
        }
    }

    #[test]
    fn target_group_expands_with_subscription() {
        let decision = OsaDecision {
            use_original_storage_account: false,
            rationale: OsaRationale::NotRequested,
        };
        let point = rp(false);
        let req = RestoreRequestBuilder::new(&point, decision, "/sa", "westus")
            .target_resource_group("sub1", Some("rg1"))
            .build();
        assert_eq!(
            req.target_resource_group_id(),
            Some("/subscriptions/sub1/resourceGroups/rg1")
        );

        let req = RestoreRequestBuilder::new(&point, decision, "/sa", "westus")
            .target_resource_group("sub1", None)
            .build();
        assert_eq!(req.target_resource_group_id(), None);
    }

    #[test]
    fn prepared_request_carries_fixed_disk_shape() {
        let prepared = prepare_restore(&rp(false), &opts(), &ctx()).unwrap();
        let req = &prepared.request;
        assert_eq!(req.recovery_type(), RecoveryType::RestoreDisks);
        assert!(!req.create_new_cloud_service());
        assert_eq!(req.recovery_point_id(), "42");
        assert_eq!(req.region(), "westus");
        assert_eq!(req.storage_account_id(), opts().storage_account_id);
        assert!(req.source_resource_id().ends_with("/virtualMachines/vm1"));
        assert!(!req.original_storage_account_option());
        assert!(prepared.advisories.is_empty());
    }

    #[test]
    fn prepared_target_uses_parsed_path_and_context() {
        let prepared = prepare_restore(&rp(false), &opts(), &ctx()).unwrap();
        assert_eq!(
            prepared.target,
            RestoreTarget {
                subscription_id: "sub1".into(),
                vault_name: "vault1".into(),
                resource_group_name: "vault-rg".into(),
                fabric_name: "Azure".into(),
                container: "IaasVMContainer;iaasvmcontainerv2;vm-rg;vm1".into(),
                protected_item: "VM;iaasvmcontainerv2;vm-rg;vm1".into(),
                recovery_point_id: "42".into(),
            }
        );
    }

    #[test]
    fn osa_supported_sets_option() {
        let mut o = opts();
        o.use_original_storage_account = true;
        let prepared = prepare_restore(&rp(true), &o, &ctx()).unwrap();
        assert!(prepared.request.original_storage_account_option());
    }

    #[test]
    fn osa_unsupported_never_builds() {
        let mut o = opts();
        o.use_original_storage_account = true;
        assert_eq!(
            prepare_restore(&rp(false), &o, &ctx()),
            Err(RestoreError::UnsupportedOsaRequest)
        );
    }

    #[test]
    fn explicit_vault_location_overrides_context() {
        let mut o = opts();
        o.vault_location = Some("eastus".into());
        assert!(matches!(
            prepare_restore(&rp(false), &o, &ctx()),
            Err(RestoreError::RegionMismatch { .. })
        ));
    }

    #[test]
    fn request_serializes_in_wire_shape() {
        let mut o = opts();
        o.target_resource_group_name = Some("rg1".into());
        let prepared = prepare_restore(&rp(false), &o, &ctx()).unwrap();
        let value = serde_json::to_value(prepared.request.into_resource()).unwrap();
        let props = &value["properties"];
        assert_eq!(props["objectType"], "IaasVMRestoreRequest");
        assert_eq!(props["recoveryType"], "RestoreDisks");
        assert_eq!(props["createNewCloudService"], false);
        assert_eq!(props["originalStorageAccountOption"], false);
        assert_eq!(
            props["targetResourceGroupId"],
            "/subscriptions/sub1/resourceGroups/rg1"
        );
    }

    #[test]
    fn unset_target_group_is_omitted_from_wire() {
        let prepared = prepare_restore(&rp(false), &opts(), &ctx()).unwrap();
        let value = serde_json::to_value(prepared.request.into_resource()).unwrap();
        assert!(value["properties"].get("targetResourceGroupId").is_none());
    }
}
