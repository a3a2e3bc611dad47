// Command handlers

use anyhow::Result;
use autosnap_config::{AppConfig, ConfigLoader};
use autosnap_core::{snap_warning, DuctRunner};
use autosnap_orchestrator::InventorySource;
use autosnap_provider::{FileInventory, Pvesh, PveshInventory};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::{Args, Command};

pub mod check;
pub mod plan;
pub mod run;

/// Main command dispatcher
pub fn execute_command(args: Args) -> Result<()> {
    match args.command {
        Command::Run { dry_run, inventory } => {
            debug!("Handling run command with dry_run={}", dry_run);
            run::handle_run(args.config, inventory, dry_run)
        }
        Command::Plan { inventory } => {
            debug!("Handling plan command");
            plan::handle_plan(args.config, inventory)
        }
        Command::Check => {
            debug!("Handling check command");
            check::handle_check(args.config)
        }
    }
}

/// Load and validate the configuration, reporting any warnings once.
fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let config = ConfigLoader::new(path).load()?;
    for warning in config.validate()? {
        snap_warning!("{}", warning);
    }
    Ok(config)
}

/// `pvesh` client for the live cluster, checked to exist.
fn live_pvesh(config: &AppConfig) -> Result<Pvesh<DuctRunner>> {
    let pvesh = Pvesh::from_config(config);
    pvesh.ensure_available()?;
    Ok(pvesh)
}

/// The saved dump when one is given, otherwise the live cluster. An already
/// checked client is reused instead of looking the binary up again.
fn inventory_source(
    config: &AppConfig,
    file: Option<&Path>,
    pvesh: Option<&Pvesh<DuctRunner>>,
) -> Result<Box<dyn InventorySource>> {
    match (file, pvesh) {
        (Some(path), _) => Ok(Box::new(FileInventory::new(path))),
        (None, Some(pvesh)) => Ok(Box::new(PveshInventory::new(pvesh.clone()))),
        (None, None) => Ok(Box::new(PveshInventory::new(live_pvesh(config)?))),
    }
}
