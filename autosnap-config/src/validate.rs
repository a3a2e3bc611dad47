use crate::config::{AppConfig, StepConfig, SNAPNAME_MAX_LEN, SNAPNAME_TIMESTAMP_LEN};
use autosnap_core::error::{Result, SnapError};
use autosnap_filter::Criterion;
use once_cell::sync::Lazy;
use regex::Regex;

static PREFIX_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").ok());

/// Longest prefix that still fits a timestamped snapshot name.
pub const MAX_PREFIX_LEN: usize = SNAPNAME_MAX_LEN - SNAPNAME_TIMESTAMP_LEN;

/// Checks a loaded [`AppConfig`] beyond what deserialization enforces.
///
/// Hard problems are returned as [`SnapError::Config`]. Suspicious but legal
/// settings come back as warnings for the caller to report.
pub struct ConfigValidator<'a> {
    config: &'a AppConfig,
}

impl<'a> ConfigValidator<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self) -> Result<Vec<String>> {
        self.validate_prefix()?;
        self.validate_run()?;
        self.validate_pvesh()?;
        self.validate_filter()
    }

    fn validate_prefix(&self) -> Result<()> {
        let prefix = &self.config.snapshot.prefix;
        let re = PREFIX_RE
            .as_ref()
            .ok_or_else(|| SnapError::config("Invalid snapshot prefix pattern"))?;

        if !re.is_match(prefix) {
            return Err(SnapError::config(format!(
                "Invalid snapshot.prefix '{}': must start with a letter and contain only letters, digits, '_' and '-'",
                prefix
            )));
        }
        if prefix.len() > MAX_PREFIX_LEN {
            return Err(SnapError::config(format!(
                "snapshot.prefix '{}' is {} characters; at most {} fit before the timestamp",
                prefix,
                prefix.len(),
                MAX_PREFIX_LEN
            )));
        }
        Ok(())
    }

    fn validate_run(&self) -> Result<()> {
        if self.config.run.command_timeout_secs == 0 {
            return Err(SnapError::config(
                "run.command_timeout_secs must be greater than 0",
            ));
        }
        Ok(())
    }

    fn validate_pvesh(&self) -> Result<()> {
        if self.config.pvesh.binary.trim().is_empty() {
            return Err(SnapError::config("pvesh.binary must not be empty"));
        }
        Ok(())
    }

    fn validate_filter(&self) -> Result<Vec<String>> {
        let filter = &self.config.filter;
        let mut warnings = Vec::new();

        if !filter.all && filter.steps.is_empty() {
            warnings.push("filter selects no guests: all is false and there are no steps".to_string());
        }

        for (i, step) in filter.steps.iter().enumerate() {
            let n = i + 1;
            let direction = match step {
                StepConfig::Include(_) => "include",
                StepConfig::Exclude(_) => "exclude",
            };
            let criterion = step.criterion();

            if criterion.is_empty() {
                warnings.push(format!(
                    "filter step {} ({} {}) has no values and never matches",
                    n,
                    direction,
                    criterion.kind()
                ));
                continue;
            }

            let blank = match criterion {
                Criterion::Id(_) => false,
                Criterion::Name(set)
                | Criterion::Node(set)
                | Criterion::Pool(set)
                | Criterion::Tag(set) => set.iter().any(|v| v.trim().is_empty()),
            };
            if blank {
                return Err(SnapError::config(format!(
                    "filter step {} ({} {}) contains a blank value",
                    n,
                    direction,
                    criterion.kind()
                )));
            }
        }

        Ok(warnings)
    }
}

impl AppConfig {
    /// Shorthand for [`ConfigValidator::validate`].
    pub fn validate(&self) -> Result<Vec<String>> {
        ConfigValidator::new(self).validate()
    }
}
