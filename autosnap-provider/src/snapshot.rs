//! Snapshot naming and the per-guest actions.

use crate::pvesh::Pvesh;
use autosnap_config::{AppConfig, SNAPNAME_TIMESTAMP_FORMAT};
use autosnap_core::CommandRunner;
use autosnap_core::Result;
use autosnap_orchestrator::{GuestAction, GuestRef};
use chrono::{DateTime, Utc};
use tracing::info;

/// Builds `<prefix><UTC timestamp>` snapshot names.
#[derive(Debug, Clone)]
pub struct SnapshotNamer {
    prefix: String,
}

impl SnapshotNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn name_at(&self, at: DateTime<Utc>) -> String {
        format!("{}{}", self.prefix, at.format(SNAPNAME_TIMESTAMP_FORMAT))
    }

    pub fn now(&self) -> String {
        self.name_at(Utc::now())
    }
}

/// Parameters shared by every snapshot in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub name: String,
    pub description: Option<String>,
    /// Ignored for containers.
    pub vmstate: bool,
}

impl SnapshotRequest {
    /// Request for a run starting now, named with the configured prefix.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            name: SnapshotNamer::new(config.snapshot.prefix.as_str()).now(),
            description: config.snapshot_description().map(str::to_string),
            vmstate: config.snapshot.vmstate,
        }
    }
}

/// Creates a snapshot through `pvesh` for each guest it is handed.
pub struct SnapshotAction<R> {
    pvesh: Pvesh<R>,
    request: SnapshotRequest,
}

impl<R: CommandRunner> SnapshotAction<R> {
    pub fn new(pvesh: Pvesh<R>, request: SnapshotRequest) -> Self {
        Self { pvesh, request }
    }

    pub fn request(&self) -> &SnapshotRequest {
        &self.request
    }
}

impl<R: CommandRunner> GuestAction for SnapshotAction<R> {
    fn run(&mut self, guest: &GuestRef) -> Result<()> {
        self.pvesh.create_snapshot(guest, &self.request)?;
        info!(guest = %guest.key(), node = %guest.node, snapshot = %self.request.name, "snapshot created");
        Ok(())
    }
}

/// Stand-in action for `--dry-run`: records each guest and succeeds.
#[derive(Debug)]
pub struct DryRunAction {
    request: SnapshotRequest,
    planned: Vec<GuestRef>,
}

impl DryRunAction {
    pub fn new(request: SnapshotRequest) -> Self {
        Self {
            request,
            planned: Vec::new(),
        }
    }

    pub fn planned(&self) -> &[GuestRef] {
        &self.planned
    }

    pub fn request(&self) -> &SnapshotRequest {
        &self.request
    }
}

impl GuestAction for DryRunAction {
    fn run(&mut self, guest: &GuestRef) -> Result<()> {
        info!(guest = %guest.key(), node = %guest.node, snapshot = %self.request.name, "dry run: would snapshot");
        self.planned.push(guest.clone());
        Ok(())
    }
}
