//! Offline inventory read from a saved resource dump.

use crate::resources::parse_guests;
use autosnap_core::error::{Result, SnapError};
use autosnap_filter::Guest;
use autosnap_orchestrator::InventorySource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads the output of `pvesh get /cluster/resources --type vm
/// --output-format json` from a file. The file is re-read on every fetch.
#[derive(Debug, Clone)]
pub struct FileInventory {
    path: PathBuf,
}

impl FileInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InventorySource for FileInventory {
    fn fetch(&mut self) -> Result<Vec<Guest>> {
        debug!("Reading inventory from: {}", self.path.display());
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            SnapError::inventory(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        parse_guests(&contents)
    }
}
