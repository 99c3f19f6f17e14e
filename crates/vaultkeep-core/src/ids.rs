//! Resource identifier parsing.
//!
//! Management-plane ids are slash-delimited paths of alternating keys and
//! values:
//!
//! ```text
//! /subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.RecoveryServices/vaults/{vault}/...
//! ```
//!
//! [`ResourcePath`] keeps the raw segments and answers keyed lookups.
//! [`RecoveryPointPath`] and [`RestorableDatabaseId`] lift the two shapes this
//! crate consumes into named fields, so every read is bounds-checked and a
//! missing segment surfaces as [`RestoreError::MalformedIdentifier`].

use std::borrow::Cow;

use crate::RestoreError;

/// A parsed, immutable resource path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    raw: String,
    segments: Vec<String>,
}

impl ResourcePath {
    /// Split `path` on `/`. The leading empty segment of an absolute path is
    /// kept so positional offsets line up with the wire format.
    pub fn parse(path: &str) -> Result<Self, RestoreError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(RestoreError::malformed(path, "path"));
        }
        Ok(Self {
            raw: trimmed.to_string(),
            segments: trimmed.split('/').map(str::to_string).collect(),
        })
    }

    /// Segment at `index`, if present and non-empty.
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Like [`segment`](Self::segment) but fails with `MalformedIdentifier`
    /// naming `what` when the segment is absent.
    pub fn require_segment(&self, index: usize, what: &'static str) -> Result<&str, RestoreError> {
        self.segment(index)
            .ok_or_else(|| RestoreError::malformed(&self.raw, what))
    }

    /// Value following the first segment equal to `key`, compared
    /// case-insensitively (`Subscriptions` and `subscriptions` both match).
    pub fn value_of(&self, key: &str) -> Option<&str> {
        let pos = self
            .segments
            .iter()
            .position(|s| s.eq_ignore_ascii_case(key))?;
        self.segment(pos + 1)
    }

    pub fn require_value(&self, key: &'static str) -> Result<&str, RestoreError> {
        self.value_of(key)
            .ok_or_else(|| RestoreError::malformed(&self.raw, key))
    }
}

/// Named view over a recovery-services recovery point id:
///
/// ```text
/// /Subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.RecoveryServices/vaults/{vault}
///     /backupFabrics/{fabric}/protectionContainers/{container}/protectedItems/{item}
///     /recoveryPoints/{rp}
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryPointPath {
    pub subscription_id: String,
    pub resource_group: String,
    pub vault_name: String,
    pub fabric_name: String,
    /// Composite container name, e.g. `iaasvmcontainer;iaasvmcontainerv2;rg;vm`.
    pub container: String,
    /// Composite protected item name, e.g. `vm;iaasvmcontainerv2;rg;vm`.
    pub protected_item: String,
    pub recovery_point: String,
}

impl RecoveryPointPath {
    pub fn parse(id: &str) -> Result<Self, RestoreError> {
        let path = ResourcePath::parse(id)?;
        Ok(Self {
            subscription_id: path.require_value("subscriptions")?.to_string(),
            resource_group: path.require_value("resourceGroups")?.to_string(),
            vault_name: path.require_value("vaults")?.to_string(),
            fabric_name: path.require_value("backupFabrics")?.to_string(),
            container: path.require_value("protectionContainers")?.to_string(),
            protected_item: path.require_value("protectedItems")?.to_string(),
            recovery_point: path.require_value("recoveryPoints")?.to_string(),
        })
    }
}

// Offsets into `/subscriptions/{sub}/providers/{provider}/locations/{location}
// /restorableDatabaseAccounts/{instance}/restorableSqlDatabases/{id}`.
const LOCATIONS_KEY: usize = 5;
const LOCATION: usize = 6;
const ACCOUNTS_KEY: usize = 7;
const ACCOUNT_INSTANCE_ID: usize = 8;

/// Named view over a restorable database id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorableDatabaseId {
    location: String,
    account_instance_id: String,
}

impl RestorableDatabaseId {
    pub fn parse(id: &str) -> Result<Self, RestoreError> {
        let path = ResourcePath::parse(id)?;

        let locations = path.require_segment(LOCATIONS_KEY, "locations")?;
        if !locations.eq_ignore_ascii_case("locations") {
            return Err(RestoreError::malformed(id, "locations"));
        }
        let accounts = path.require_segment(ACCOUNTS_KEY, "restorableDatabaseAccounts")?;
        if !accounts.eq_ignore_ascii_case("restorableDatabaseAccounts") {
            return Err(RestoreError::malformed(id, "restorableDatabaseAccounts"));
        }

        let location = decode_segment(path.require_segment(LOCATION, "location")?)
            .ok_or_else(|| RestoreError::malformed(id, "location"))?;
        let account_instance_id = path
            .require_segment(ACCOUNT_INSTANCE_ID, "account instance id")?
            .to_string();

        Ok(Self {
            location,
            account_instance_id,
        })
    }

    /// Location with percent-encoding removed (`West%20US` -> `West US`).
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn account_instance_id(&self) -> &str {
        &self.account_instance_id
    }
}

/// Form-style decode: `+` is a space, `%XX` is a byte.
fn decode_segment(raw: &str) -> Option<String> {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    urlencoding::decode(&spaced).ok().map(Cow::into_owned)
}
