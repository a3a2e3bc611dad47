use anyhow::Result;
use autosnap_core::{snap_println, snap_progress, snap_success};
use autosnap_orchestrator::{Orchestrator, RunReport};
use autosnap_provider::{DryRunAction, SnapshotAction, SnapshotRequest};
use std::path::PathBuf;
use tracing::info;

use super::{inventory_source, live_pvesh, load_config};

pub fn handle_run(
    config_path: Option<PathBuf>,
    inventory: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let pipeline = config.pipeline();
    let request = SnapshotRequest::from_config(&config);
    let orchestrator = Orchestrator::new(config.run_options());

    info!(snapshot = %request.name, dry_run, "starting run");

    if dry_run {
        let mut source = inventory_source(&config, inventory.as_deref(), None)?;
        snap_progress!("Dry run, snapshot name would be {}", request.name);
        let mut action = DryRunAction::new(request);
        let report = orchestrator.execute(&mut *source, Some(&pipeline), &mut action)?;
        for guest in action.planned() {
            snap_println!("would snapshot {}", guest);
        }
        print_summary(&report, "would be snapshotted");
    } else {
        let pvesh = live_pvesh(&config)?;
        let mut source = inventory_source(&config, inventory.as_deref(), Some(&pvesh))?;
        let mut action = SnapshotAction::new(pvesh, request);
        snap_progress!("Creating snapshots named {}", action.request().name);
        let report = orchestrator.execute(&mut *source, Some(&pipeline), &mut action)?;
        print_summary(&report, "snapshotted");
    }
    Ok(())
}

fn print_summary(report: &RunReport, verb: &str) {
    snap_success!(
        "{} guests {}, {} skipped by filter ({} inventory passes, {} failed attempts)",
        report.completed.len(),
        verb,
        report.filtered,
        report.passes,
        report.action_failures
    );
}
