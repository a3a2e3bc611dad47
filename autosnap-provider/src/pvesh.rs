//! Thin client over the `pvesh` command line tool.

use crate::resources::parse_guests;
use crate::snapshot::SnapshotRequest;
use autosnap_config::AppConfig;
use autosnap_core::error::{Result, SnapError};
use autosnap_core::{is_tool_installed, CommandRunner, DuctRunner};
use autosnap_filter::{Guest, GuestType};
use autosnap_orchestrator::{GuestRef, InventorySource};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Pvesh<R> {
    binary: String,
    runner: R,
}

impl Pvesh<DuctRunner> {
    /// Client using the configured binary and command timeout.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.pvesh.binary.clone(),
            DuctRunner::with_timeout(config.command_timeout()),
        )
    }
}

impl<R: CommandRunner> Pvesh<R> {
    pub fn new(binary: impl Into<String>, runner: R) -> Self {
        Self {
            binary: binary.into(),
            runner,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Fail with a dependency error unless the binary can be found.
    pub fn ensure_available(&self) -> Result<()> {
        if is_tool_installed(&self.binary) {
            Ok(())
        } else {
            Err(SnapError::Dependency(self.binary.clone()))
        }
    }

    fn call(&self, args: Vec<String>) -> Result<String> {
        self.runner.run(&self.binary, &args)
    }

    /// All VMs and containers in the cluster, templates removed.
    pub fn cluster_guests(&self) -> Result<Vec<Guest>> {
        let output = self.call(cluster_resources_args())?;
        let guests = parse_guests(&output)?;
        debug!(guests = guests.len(), "cluster inventory loaded");
        Ok(guests)
    }

    pub fn create_snapshot(&self, guest: &GuestRef, request: &SnapshotRequest) -> Result<()> {
        self.call(snapshot_args(guest, request))
            .map(|_| ())
            .map_err(|e| SnapError::action(format!("snapshot of {} failed: {}", guest, e)))
    }
}

pub fn cluster_resources_args() -> Vec<String> {
    ["get", "/cluster/resources", "--type", "vm", "--output-format", "json"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn snapshot_args(guest: &GuestRef, request: &SnapshotRequest) -> Vec<String> {
    let mut args = vec![
        "create".to_string(),
        format!("/nodes/{}/{}/{}/snapshot", guest.node, guest.kind, guest.id),
        "--snapname".to_string(),
        request.name.clone(),
    ];
    if let Some(description) = &request.description {
        args.push("--description".to_string());
        args.push(description.clone());
    }
    // Containers have no RAM state to save.
    if request.vmstate && guest.kind == GuestType::Qemu {
        args.push("--vmstate".to_string());
        args.push("1".to_string());
    }
    args
}

/// Live inventory: every fetch asks the cluster again.
pub struct PveshInventory<R> {
    pvesh: Pvesh<R>,
}

impl<R: CommandRunner> PveshInventory<R> {
    pub fn new(pvesh: Pvesh<R>) -> Self {
        Self { pvesh }
    }
}

impl<R: CommandRunner> InventorySource for PveshInventory<R> {
    fn fetch(&mut self) -> Result<Vec<Guest>> {
        self.pvesh.cluster_guests()
    }
}
