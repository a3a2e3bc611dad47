use anyhow::Result;
use autosnap_core::{snap_println, snap_success, snap_warning};
use autosnap_provider::{Pvesh, SnapshotRequest};
use std::path::PathBuf;
use tracing::debug;

use super::load_config;

pub fn handle_check(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;

    match &config.source_path {
        Some(path) => snap_println!("Config: {}", path.display()),
        None => snap_println!("Config: built-in defaults"),
    }
    snap_println!("Filter:");
    snap_println!("  {}", config.pipeline().to_string().replace('\n', "\n  "));
    snap_println!(
        "Snapshot name: {}",
        SnapshotRequest::from_config(&config).name
    );
    match config.run.max_refetches {
        Some(max) => snap_println!("Refetch limit: {}", max),
        None => snap_println!("Refetch limit: none"),
    }

    let pvesh = Pvesh::from_config(&config);
    if let Err(e) = pvesh.ensure_available() {
        debug!(error = %e, "pvesh lookup failed");
        snap_warning!(
            "{} not found; only `plan --inventory` and `run --dry-run --inventory` will work here",
            pvesh.binary()
        );
    }

    snap_success!("Configuration is valid");
    Ok(())
}
