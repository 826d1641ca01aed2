//! [`ComputeRpc`] over the Compute Engine REST API

use super::{ComputeRpc, Page, RpcOptions};
use crate::error::ComputeError;
use crate::gcp::client::GcpClient;
use crate::model::{DiskType, License, MachineType, Region, Zone};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// REST implementation of [`ComputeRpc`]
#[derive(Clone)]
pub struct HttpComputeRpc {
    client: GcpClient,
}

impl HttpComputeRpc {
    pub fn new(client: GcpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GcpClient {
        &self.client
    }

    pub fn project_id(&self) -> &str {
        &self.client.project_id
    }

    /// GET a single resource, mapping 404 to `None`
    async fn get_resource<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &RpcOptions,
    ) -> Result<Option<T>, ComputeError> {
        match self.client.get(url, &options.for_get().query_pairs()).await {
            Ok(body) => Ok(Some(serde_json::from_value(body)?)),
            Err(err) if err.is_not_found() => {
                tracing::debug!("Resource not found: {}", url);
                Ok(None)
            },
            Err(err) => Err(err),
        }
    }

    /// GET one page of a plain list response: `{"items": [...], "nextPageToken": "..."}`
    async fn list_resources<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &RpcOptions,
    ) -> Result<Page<T>, ComputeError> {
        let response = self.client.get(url, &options.query_pairs()).await?;
        let items = response
            .get("items")
            .cloned()
            .map(serde_json::from_value::<Vec<T>>)
            .transpose()?
            .unwrap_or_default();

        Ok(Page::new(next_page_token(&response), items))
    }

    /// GET one page of an aggregated list response and flatten every scope
    async fn list_aggregated<T: DeserializeOwned>(
        &self,
        resource: &str,
        options: &RpcOptions,
    ) -> Result<Page<T>, ComputeError> {
        let url = self.client.compute_aggregated_url(resource);
        let response = self.client.get(&url, &options.query_pairs()).await?;
        let items = flatten_aggregated(&response, resource)
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;

        Ok(Page::new(next_page_token(&response), items))
    }

    fn zonal_item_url(&self, zone: &str, collection: &str, name: &str) -> String {
        self.client.compute_zonal_url(
            zone,
            &format!("{}/{}", collection, urlencoding::encode(name)),
        )
    }
}

fn next_page_token(response: &Value) -> Option<String> {
    response
        .get("nextPageToken")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Collect the items of an aggregated list response.
///
/// Aggregated responses have format:
/// `{ "items": { "zones/us-central1-a": { "diskTypes": [...] }, "zones/x": { "warning": {...} } } }`.
/// Only the `key` array of each scope is taken; scopes carrying just a
/// warning contribute nothing.
pub fn flatten_aggregated(response: &Value, key: &str) -> Vec<Value> {
    let Some(scopes) = response.get("items").and_then(|v| v.as_object()) else {
        return Vec::new();
    };

    scopes
        .values()
        .filter_map(|scope| scope.get(key).and_then(|v| v.as_array()))
        .flat_map(|items| items.iter().cloned())
        .collect()
}

#[async_trait]
impl ComputeRpc for HttpComputeRpc {
    async fn get_disk_type(
        &self,
        zone: &str,
        disk_type: &str,
        options: &RpcOptions,
    ) -> Result<Option<DiskType>, ComputeError> {
        let url = self.zonal_item_url(zone, "diskTypes", disk_type);
        self.get_resource(&url, options).await
    }

    async fn list_disk_types(
        &self,
        zone: &str,
        options: &RpcOptions,
    ) -> Result<Page<DiskType>, ComputeError> {
        let url = self.client.compute_zonal_url(zone, "diskTypes");
        self.list_resources(&url, options).await
    }

    async fn list_all_disk_types(
        &self,
        options: &RpcOptions,
    ) -> Result<Page<DiskType>, ComputeError> {
        self.list_aggregated("diskTypes", options).await
    }

    async fn get_machine_type(
        &self,
        zone: &str,
        machine_type: &str,
        options: &RpcOptions,
    ) -> Result<Option<MachineType>, ComputeError> {
        let url = self.zonal_item_url(zone, "machineTypes", machine_type);
        self.get_resource(&url, options).await
    }

    async fn list_machine_types(
        &self,
        zone: &str,
        options: &RpcOptions,
    ) -> Result<Page<MachineType>, ComputeError> {
        let url = self.client.compute_zonal_url(zone, "machineTypes");
        self.list_resources(&url, options).await
    }

    async fn list_all_machine_types(
        &self,
        options: &RpcOptions,
    ) -> Result<Page<MachineType>, ComputeError> {
        self.list_aggregated("machineTypes", options).await
    }

    async fn get_region(
        &self,
        region: &str,
        options: &RpcOptions,
    ) -> Result<Option<Region>, ComputeError> {
        let url = self
            .client
            .compute_url(&format!("regions/{}", urlencoding::encode(region)));
        self.get_resource(&url, options).await
    }

    async fn list_regions(&self, options: &RpcOptions) -> Result<Page<Region>, ComputeError> {
        let url = self.client.compute_url("regions");
        self.list_resources(&url, options).await
    }

    async fn get_zone(
        &self,
        zone: &str,
        options: &RpcOptions,
    ) -> Result<Option<Zone>, ComputeError> {
        let url = self
            .client
            .compute_url(&format!("zones/{}", urlencoding::encode(zone)));
        self.get_resource(&url, options).await
    }

    async fn list_zones(&self, options: &RpcOptions) -> Result<Page<Zone>, ComputeError> {
        let url = self.client.compute_url("zones");
        self.list_resources(&url, options).await
    }

    async fn get_license(
        &self,
        project: &str,
        license: &str,
        options: &RpcOptions,
    ) -> Result<Option<License>, ComputeError> {
        let url = self.client.compute_global_url(
            project,
            &format!("licenses/{}", urlencoding::encode(license)),
        );
        self.get_resource(&url, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_aggregated_skips_warnings() {
        let response = json!({
            "kind": "compute#diskTypeAggregatedList",
            "items": {
                "zones/us-central1-a": {
                    "diskTypes": [{"name": "pd-ssd"}, {"name": "pd-standard"}]
                },
                "zones/us-east1-b": {
                    "warning": {"code": "NO_RESULTS_ON_PAGE", "message": "There are no results"}
                },
                "zones/europe-west1-b": {
                    "diskTypes": [{"name": "pd-balanced"}]
                }
            },
            "nextPageToken": "abc"
        });

        let items = flatten_aggregated(&response, "diskTypes");
        let names: Vec<_> = items
            .iter()
            .map(|i| i["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["pd-ssd", "pd-standard", "pd-balanced"]);
        assert_eq!(next_page_token(&response).as_deref(), Some("abc"));
    }

    #[test]
    fn test_flatten_aggregated_keeps_scope_order() {
        let response: Value = serde_json::from_str(
            r#"{"items": {
                "zones/us-east1-b": {"diskTypes": [{"name": "first"}]},
                "zones/asia-east1-a": {"diskTypes": [{"name": "second"}]},
                "zones/europe-west1-b": {"diskTypes": [{"name": "third"}]}
            }}"#,
        )
        .unwrap();

        let names: Vec<_> = flatten_aggregated(&response, "diskTypes")
            .iter()
            .map(|i| i["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_flatten_aggregated_ignores_other_collections() {
        let response = json!({
            "items": {"zones/a": {"machineTypes": [{"name": "e2-micro"}]}}
        });
        assert!(flatten_aggregated(&response, "diskTypes").is_empty());
        assert_eq!(flatten_aggregated(&response, "machineTypes").len(), 1);
    }

    #[test]
    fn test_flatten_aggregated_without_items() {
        assert!(flatten_aggregated(&json!({"kind": "x"}), "diskTypes").is_empty());
        assert!(flatten_aggregated(&Value::Null, "diskTypes").is_empty());
    }
}
