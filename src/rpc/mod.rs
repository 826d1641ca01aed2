//! Compute Engine RPC contract
//!
//! [`ComputeRpc`] maps one method to one remote list/get endpoint. Calls are
//! stateless: continuation is driven by the caller through the token in the
//! returned [`Page`], and nothing here retries, caches or walks pages.
//!
//! # Module Structure
//!
//! - [`options`] - query options shared by every call
//! - [`page`] - one page of a list call
//! - [`http`] - implementation over the Compute Engine REST API
//!
//! # Example
//!
//! ```ignore
//! use gcompute::rpc::{ComputeRpc, HttpComputeRpc, RpcOptions};
//!
//! async fn first_zone(rpc: &dyn ComputeRpc) -> Result<(), gcompute::ComputeError> {
//!     let page = rpc.list_zones(&RpcOptions::new().max_results(1)).await?;
//!     for zone in page.items {
//!         println!("{:?}", zone.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod http;
pub mod options;
pub mod page;

use crate::error::ComputeError;
use crate::model::{DiskType, License, MachineType, Region, Zone};
use async_trait::async_trait;

pub use http::HttpComputeRpc;
pub use options::{RpcOption, RpcOptions};
pub use page::{Page, PageItems};

/// Read access to Compute Engine disk types, machine types, regions, zones
/// and licenses.
///
/// `get_*` methods return `Ok(None)` when the resource does not exist and an
/// error only when the call itself could not be completed. `list_*` methods
/// return one page; pass its `next_page_token` as
/// [`RpcOptions::page_token`] to fetch the next one.
#[async_trait]
pub trait ComputeRpc: Send + Sync {
    /// Returns the requested disk type or `None` if not found
    async fn get_disk_type(
        &self,
        zone: &str,
        disk_type: &str,
        options: &RpcOptions,
    ) -> Result<Option<DiskType>, ComputeError>;

    /// Lists the disk types in the provided zone available to the current project
    async fn list_disk_types(
        &self,
        zone: &str,
        options: &RpcOptions,
    ) -> Result<Page<DiskType>, ComputeError>;

    /// Lists all disk types available to the current project
    async fn list_all_disk_types(
        &self,
        options: &RpcOptions,
    ) -> Result<Page<DiskType>, ComputeError>;

    /// Returns the requested machine type or `None` if not found
    async fn get_machine_type(
        &self,
        zone: &str,
        machine_type: &str,
        options: &RpcOptions,
    ) -> Result<Option<MachineType>, ComputeError>;

    /// Lists the machine types in the provided zone available to the current project
    async fn list_machine_types(
        &self,
        zone: &str,
        options: &RpcOptions,
    ) -> Result<Page<MachineType>, ComputeError>;

    /// Lists all machine types available to the current project
    async fn list_all_machine_types(
        &self,
        options: &RpcOptions,
    ) -> Result<Page<MachineType>, ComputeError>;

    /// Returns the requested region or `None` if not found
    async fn get_region(
        &self,
        region: &str,
        options: &RpcOptions,
    ) -> Result<Option<Region>, ComputeError>;

    /// Lists the regions available to the current project
    async fn list_regions(&self, options: &RpcOptions) -> Result<Page<Region>, ComputeError>;

    /// Returns the requested zone or `None` if not found
    async fn get_zone(&self, zone: &str, options: &RpcOptions)
        -> Result<Option<Zone>, ComputeError>;

    /// Lists the zones available to the current project
    async fn list_zones(&self, options: &RpcOptions) -> Result<Page<Zone>, ComputeError>;

    /// Returns the requested license or `None` if not found.
    ///
    /// Licenses usually live in the image project that publishes them
    /// (e.g. `debian-cloud`), hence the explicit `project`.
    async fn get_license(
        &self,
        project: &str,
        license: &str,
        options: &RpcOptions,
    ) -> Result<Option<License>, ComputeError>;
}
