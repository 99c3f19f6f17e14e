//! Validate-and-submit for disk restores.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use vaultkeep_core::{Advisory, Job, RecoveryPoint, RestoreOptions, VaultContext, prepare_restore};

use crate::cancel::run_cancellable;
use crate::{PlaneError, RestoreTransport};

/// What a successful submission hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub job: Job,
    pub advisories: Vec<Advisory>,
}

/// Runs the restore pre-flight and, only if it passes, submits the request.
pub struct RestoreService<T> {
    transport: T,
    context: VaultContext,
    timeout: Option<Duration>,
}

impl<T: RestoreTransport> RestoreService<T> {
    pub fn new(transport: T, context: VaultContext) -> Self {
        Self {
            transport,
            context,
            timeout: None,
        }
    }

    /// Abandon a submission that has not completed within `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Restore the disks of `rp` into the storage account named in `opts`.
    ///
    /// Validation errors are returned before the transport is called.
    /// Transport errors are surfaced unchanged; cancellation via `cancel` or
    /// the configured timeout yields [`PlaneError::Cancelled`].
    pub async fn restore_disks(
        &self,
        rp: &RecoveryPoint,
        opts: &RestoreOptions,
        cancel: &CancellationToken,
    ) -> Result<RestoreOutcome, PlaneError> {
        let prepared = prepare_restore(rp, opts, &self.context)?;
        let target = prepared.target;
        let resource = prepared.request.into_resource();

        info!(
            vault = %target.vault_name,
            container = %target.container,
            recovery_point = %target.recovery_point_id,
            "triggering disk restore"
        );
        let result = run_cancellable(
            cancel,
            self.timeout,
            self.transport.trigger_restore(&target, &resource),
        )
        .await;

        match result {
            Ok(job) => {
                info!(status = job.status, location = ?job.location, "restore accepted");
                Ok(RestoreOutcome {
                    job,
                    advisories: prepared.advisories,
                })
            }
            Err(PlaneError::Cancelled) => {
                warn!(recovery_point = %target.recovery_point_id, "restore submission cancelled");
                Err(PlaneError::Cancelled)
            }
            Err(err) => Err(err),
        }
    }
}
