//! Configuration for pve-autosnap.
//!
//! `autosnap.yaml` describes which guests to snapshot (the `filter` section),
//! how snapshots are named, and how a run recovers from failures.

pub mod config;
pub mod loader;
pub mod validate;

pub use config::{
    AppConfig, FilterConfig, PveshConfig, RunConfig, SnapshotConfig, StepConfig,
    SNAPNAME_MAX_LEN, SNAPNAME_TIMESTAMP_FORMAT, SNAPNAME_TIMESTAMP_LEN,
};
pub use loader::{ConfigLoader, CONFIG_ENV};
pub use validate::{ConfigValidator, MAX_PREFIX_LEN};
