//! Compute Engine resource records
//!
//! Only the commonly used fields are typed. Every field is optional because a
//! `fields` mask can drop any of them, and whatever is not listed here is kept
//! untouched in `extra`.

use crate::gcp::client::short_name;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Deprecation state of a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeprecationStatus {
    /// `ACTIVE`, `DEPRECATED`, `OBSOLETE` or `DELETED`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obsolete: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A regional quota
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quota {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    /// Accepted sizes, e.g. `10GB-65536GB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_disk_size: Option<String>,
    /// int64 serialized as a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_disk_size_gb: Option<String>,
    /// URL of the zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<DeprecationStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DiskType {
    /// Short zone name, e.g. `us-central1-a`
    pub fn zone_name(&self) -> Option<&str> {
        self.zone.as_deref().map(short_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_cpus: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_mb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_space_gb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_persistent_disks: Option<u32>,
    /// int64 serialized as a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_persistent_disks_size_gb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_shared_cpu: Option<bool>,
    /// URL of the zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<DeprecationStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MachineType {
    pub fn zone_name(&self) -> Option<&str> {
        self.zone.as_deref().map(short_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    /// `UP` or `DOWN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// URLs of the zones in this region
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quotas: Vec<Quota>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<DeprecationStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Region {
    /// Short names of the zones in this region
    pub fn zone_names(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|z| short_name(z))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    /// `UP` or `DOWN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// URL of the region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_cpu_platforms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<DeprecationStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Zone {
    pub fn region_name(&self) -> Option<&str> {
        self.region.as_deref().map(short_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    /// uint64 serialized as a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges_use_fee: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transferable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_machine_type_from_api_json() {
        let value = json!({
            "kind": "compute#machineType",
            "id": "3002",
            "creationTimestamp": "1969-12-31T16:00:00.000-08:00",
            "name": "n1-standard-2",
            "description": "2 vCPUs, 7.5 GB RAM",
            "guestCpus": 2,
            "memoryMb": 7680,
            "imageSpaceGb": 10,
            "maximumPersistentDisks": 128,
            "maximumPersistentDisksSizeGb": "263168",
            "zone": "us-central1-a",
            "selfLink": "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-a/machineTypes/n1-standard-2",
            "isSharedCpu": false,
            "architecture": "X86_64"
        });

        let machine_type: MachineType = serde_json::from_value(value).unwrap();
        assert_eq!(machine_type.name.as_deref(), Some("n1-standard-2"));
        assert_eq!(machine_type.guest_cpus, Some(2));
        assert_eq!(machine_type.memory_mb, Some(7680));
        assert_eq!(machine_type.zone_name(), Some("us-central1-a"));
        assert_eq!(machine_type.extra.get("kind"), Some(&json!("compute#machineType")));
        assert_eq!(machine_type.extra.get("architecture"), Some(&json!("X86_64")));
    }

    #[test]
    fn test_partial_response_from_field_mask() {
        let zone: Zone = serde_json::from_value(json!({"name": "us-central1-a"})).unwrap();
        assert_eq!(zone.name.as_deref(), Some("us-central1-a"));
        assert_eq!(zone.status, None);
        assert!(zone.extra.is_empty());
    }

    #[test]
    fn test_unknown_fields_survive_serialization() {
        let value = json!({
            "name": "pd-ssd",
            "zone": "https://www.googleapis.com/compute/v1/projects/p/zones/europe-west1-b",
            "deprecated": {"state": "DEPRECATED", "replacement": "pd-balanced"},
            "region": "europe-west1"
        });

        let disk_type: DiskType = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(disk_type.zone_name(), Some("europe-west1-b"));
        assert_eq!(
            disk_type.deprecated.as_ref().and_then(|d| d.replacement.as_deref()),
            Some("pd-balanced")
        );
        assert_eq!(serde_json::to_value(&disk_type).unwrap(), value);
    }

    #[test]
    fn test_region_zone_names() {
        let region: Region = serde_json::from_value(json!({
            "name": "us-central1",
            "status": "UP",
            "zones": [
                "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-a",
                "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-b"
            ],
            "quotas": [{"metric": "CPUS", "limit": 24.0, "usage": 2.0}]
        }))
        .unwrap();

        assert_eq!(
            region.zone_names().collect::<Vec<_>>(),
            vec!["us-central1-a", "us-central1-b"]
        );
        assert_eq!(region.quotas[0].limit, Some(24.0));
    }

    #[test]
    fn test_nested_records_keep_unknown_fields() {
        let value = json!({
            "name": "us-central1",
            "deprecated": {"state": "ACTIVE", "stateOverride": {"reason": "pinned"}},
            "quotas": [{"metric": "CPUS", "limit": 24.0, "usage": 2.0, "owner": "projects/p"}]
        });

        let region: Region = serde_json::from_value(value.clone()).unwrap();
        let deprecated = region.deprecated.as_ref().unwrap();
        assert_eq!(deprecated.state.as_deref(), Some("ACTIVE"));
        assert_eq!(deprecated.extra.get("stateOverride"), Some(&json!({"reason": "pinned"})));
        assert_eq!(region.quotas[0].extra.get("owner"), Some(&json!("projects/p")));
        assert_eq!(serde_json::to_value(&region).unwrap(), value);
    }
}
