//! Typed client contract for the Google Compute Engine REST API.
//!
//! The [`rpc::ComputeRpc`] trait exposes list/get calls for disk types,
//! machine types, regions, zones and licenses; [`rpc::HttpComputeRpc`]
//! implements it on top of the [`gcp`] transport layer.

pub mod error;
pub mod gcp;
pub mod model;
pub mod rpc;

pub use error::ComputeError;
pub use model::{DeprecationStatus, DiskType, License, MachineType, Quota, Region, Zone};
pub use rpc::{ComputeRpc, HttpComputeRpc, Page, PageItems, RpcOption, RpcOptions};
