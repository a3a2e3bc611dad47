use anyhow::Result;
use autosnap_core::snap_println;
use autosnap_filter::Guest;
use autosnap_orchestrator::InventorySource;
use std::path::PathBuf;

use super::{inventory_source, load_config};

fn tag_list(guest: &Guest) -> String {
    if guest.tags.is_empty() {
        "-".to_string()
    } else {
        guest.sorted_tags().join(";")
    }
}

pub fn handle_plan(config_path: Option<PathBuf>, inventory: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let pipeline = config.pipeline();
    let mut source = inventory_source(&config, inventory.as_deref(), None)?;
    let guests = source.fetch()?;

    snap_println!(
        "{:<10} {:<20} {:<10} {:<10} {:<24} {}",
        "GUEST", "NAME", "NODE", "POOL", "TAGS", "DECISION"
    );
    let mut selected = 0;
    for guest in &guests {
        let decision = if pipeline.apply(guest) {
            selected += 1;
            "snapshot"
        } else {
            "skip"
        };
        snap_println!(
            "{:<10} {:<20} {:<10} {:<10} {:<24} {}",
            guest.key().to_string(),
            guest.name,
            guest.node,
            if guest.pool.is_empty() { "-" } else { guest.pool.as_str() },
            tag_list(guest),
            decision
        );
    }
    snap_println!();
    snap_println!("{} of {} guests selected", selected, guests.len());
    Ok(())
}
