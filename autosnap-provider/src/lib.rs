//! Proxmox VE provider.
//!
//! Everything here goes through the `pvesh` CLI on a cluster node: the live
//! guest inventory, and snapshot creation. [`FileInventory`] and
//! [`DryRunAction`] stand in for them when planning offline.

pub mod file;
pub mod pvesh;
pub mod resources;
pub mod snapshot;

#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;

pub use file::FileInventory;
pub use pvesh::{Pvesh, PveshInventory};
pub use resources::{parse_guests, split_tags, ClusterResource};
pub use snapshot::{DryRunAction, SnapshotAction, SnapshotNamer, SnapshotRequest};
