use autosnap_filter::{Criterion, FilterPipeline, FilterStep};
use autosnap_orchestrator::RunOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Proxmox rejects snapshot names longer than this.
pub const SNAPNAME_MAX_LEN: usize = 40;
/// UTC timestamp appended to the configured prefix.
pub const SNAPNAME_TIMESTAMP_FORMAT: &str = "%Y_%m_%d_T%H_%M_%S";
/// Rendered length of [`SNAPNAME_TIMESTAMP_FORMAT`].
pub const SNAPNAME_TIMESTAMP_LEN: usize = 20;

/// Contents of `autosnap.yaml`. Every field has a default, so an empty file
/// is a valid configuration that selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub filter: FilterConfig,
    pub snapshot: SnapshotConfig,
    pub run: RunConfig,
    pub pvesh: PveshConfig,

    /// File this config was read from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Start with every guest selected.
    pub all: bool,
    /// Steps and their criteria are single-key maps, not YAML `!tags`.
    #[serde(with = "serde_yaml_ng::with::singleton_map_recursive")]
    pub steps: Vec<StepConfig>,
}

/// One `include:` or `exclude:` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepConfig {
    Include(Criterion),
    Exclude(Criterion),
}

impl StepConfig {
    pub fn criterion(&self) -> &Criterion {
        match self {
            StepConfig::Include(c) | StepConfig::Exclude(c) => c,
        }
    }
}

impl From<&StepConfig> for FilterStep {
    fn from(step: &StepConfig) -> Self {
        match step {
            StepConfig::Include(c) => FilterStep::include(c.clone()),
            StepConfig::Exclude(c) => FilterStep::exclude(c.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapshotConfig {
    pub prefix: String,
    /// Empty means no description is sent.
    pub description: String,
    /// Include RAM state (VMs only).
    pub vmstate: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            prefix: "autosnap_".to_string(),
            description: "Automatic snapshot".to_string(),
            vmstate: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// `null` removes the limit.
    pub max_refetches: Option<u32>,
    pub refetch_delay_secs: u64,
    pub command_timeout_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_refetches: Some(10),
            refetch_delay_secs: 2,
            command_timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PveshConfig {
    pub binary: String,
}

impl Default for PveshConfig {
    fn default() -> Self {
        Self {
            binary: "pvesh".to_string(),
        }
    }
}

impl AppConfig {
    pub fn pipeline(&self) -> FilterPipeline {
        self.filter
            .steps
            .iter()
            .fold(FilterPipeline::new(self.filter.all), |pipeline, step| {
                pipeline.step(step.into())
            })
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions::new()
            .max_refetches(self.run.max_refetches)
            .refetch_delay(Duration::from_secs(self.run.refetch_delay_secs))
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.run.command_timeout_secs)
    }

    /// Description to attach to snapshots, `None` when blank.
    pub fn snapshot_description(&self) -> Option<&str> {
        let description = self.snapshot.description.trim();
        (!description.is_empty()).then_some(description)
    }
}
