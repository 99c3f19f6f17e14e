//! Listing entry shapes as the management plane returns them.

use serde::{Deserialize, Serialize};
use vaultkeep_core::RestorableResource;

/// One entry of a `restorableSql*` listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRestorableEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub properties: RawRestorableProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRestorableProperties {
    #[serde(default)]
    pub resource: RawRestorableBody,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRestorableBody {
    #[serde(rename = "_rid", default)]
    pub rid: Option<String>,
    #[serde(default)]
    pub operation_type: Option<String>,
    #[serde(default)]
    pub event_timestamp: Option<String>,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub owner_resource_id: String,
}

impl From<RawRestorableEntry> for RestorableResource {
    fn from(raw: RawRestorableEntry) -> Self {
        let body = raw.properties.resource;
        Self {
            id: raw.id,
            name: raw.name,
            resource_type: raw.resource_type,
            owner_id: body.owner_id,
            owner_resource_id: body.owner_resource_id,
            rid: body.rid,
            operation_type: body.operation_type,
            event_timestamp: body.event_timestamp,
        }
    }
}
