use crate::error::{OrchestratorError, Result};
use crate::source::{GuestAction, GuestRef, InventorySource};
use crate::state::RunState;
use autosnap_core::SnapError;
use autosnap_filter::{FilterPipeline, Guest, GuestKey};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Limits on how a run recovers from action failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Maximum number of inventory refetches after failed passes.
    /// `None` retries forever.
    pub max_refetches: Option<u32>,
    /// Pause between an aborted pass and the next fetch.
    pub refetch_delay: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_refetches: Some(10),
            refetch_delay: Duration::ZERO,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_refetches(mut self, max: Option<u32>) -> Self {
        self.max_refetches = max;
        self
    }

    pub fn refetch_delay(mut self, delay: Duration) -> Self {
        self.refetch_delay = delay;
        self
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Guests acted on, in order
    pub completed: Vec<GuestKey>,
    /// Guests rejected by the pipeline
    pub filtered: usize,
    /// Inventory passes made, including aborted ones
    pub passes: u32,
    pub action_failures: u32,
}

/// Result of one pass over a fetched inventory.
#[derive(Debug)]
pub enum PassOutcome {
    /// Every guest was handled.
    Finished,
    /// The action failed for `guest`; later guests were not looked at.
    Aborted { guest: GuestKey, error: SnapError },
}

/// Walk `inventory` once, acting on newly selected guests.
pub fn run_pass<A>(
    inventory: &[Guest],
    state: &mut RunState,
    pipeline: &FilterPipeline,
    action: &mut A,
) -> PassOutcome
where
    A: GuestAction + ?Sized,
{
    for guest in inventory {
        if state.is_completed(guest.id, guest.kind) {
            continue;
        }
        if state.is_known_filtered(guest) {
            continue;
        }

        if !pipeline.apply(guest) {
            debug!(guest = %guest.key(), name = %guest.name, "not selected");
            state.mark_filtered(guest);
            continue;
        }

        let target = GuestRef::from(guest);
        if let Err(error) = action.run(&target) {
            return PassOutcome::Aborted {
                guest: guest.key(),
                error,
            };
        }
        info!(guest = %guest.key(), node = %guest.node, name = %guest.name, "guest done");
        state.mark_completed(guest.id, guest.kind);
    }
    PassOutcome::Finished
}

/// Drives runs with a fixed set of [`RunOptions`].
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    options: RunOptions,
}

impl Orchestrator {
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    /// Act on every guest `pipeline` selects, exactly once.
    ///
    /// Returns an error only for a missing pipeline, a failed inventory fetch
    /// (passed through untouched) or an exhausted refetch budget. Action
    /// failures trigger a refetch and a fresh pass.
    pub fn execute<S, A>(
        &self,
        source: &mut S,
        pipeline: Option<&FilterPipeline>,
        action: &mut A,
    ) -> Result<RunReport>
    where
        S: InventorySource + ?Sized,
        A: GuestAction + ?Sized,
    {
        let pipeline = pipeline.ok_or(OrchestratorError::MissingPipeline)?;
        let mut state = RunState::new();
        let mut passes = 0u32;
        let mut failures = 0u32;

        loop {
            let inventory = source.fetch().map_err(OrchestratorError::Fetch)?;
            passes += 1;
            debug!(pass = passes, guests = inventory.len(), "inventory fetched");

            match run_pass(&inventory, &mut state, pipeline, action) {
                PassOutcome::Finished => break,
                PassOutcome::Aborted { guest, error } => {
                    failures += 1;
                    warn!(
                        pass = passes,
                        guest = %guest,
                        error = %error,
                        "action failed, refetching inventory"
                    );
                    if let Some(max) = self.options.max_refetches {
                        if failures > max {
                            return Err(OrchestratorError::RefetchLimitExceeded {
                                attempts: max,
                                last_error: format!("{}: {}", guest, error),
                            });
                        }
                    }
                    if !self.options.refetch_delay.is_zero() {
                        std::thread::sleep(self.options.refetch_delay);
                    }
                }
            }
        }

        let report = RunReport {
            completed: state.completed().copied().collect(),
            filtered: state.filtered_len(),
            passes,
            action_failures: failures,
        };
        info!(
            completed = report.completed.len(),
            filtered = report.filtered,
            passes = report.passes,
            "run finished"
        );
        Ok(report)
    }
}

/// [`Orchestrator::execute`] with default options.
pub fn execute<S, A>(
    source: &mut S,
    pipeline: Option<&FilterPipeline>,
    action: &mut A,
) -> Result<RunReport>
where
    S: InventorySource + ?Sized,
    A: GuestAction + ?Sized,
{
    Orchestrator::default().execute(source, pipeline, action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autosnap_filter::{Criterion, GuestType};

    fn guest(id: u32) -> Guest {
        Guest::new(id, GuestType::Lxc).name(format!("ct{}", id)).node("pve1")
    }

    #[test]
    fn test_pass_marks_completed() {
        let mut state = RunState::new();
        state.mark_completed(200, GuestType::Qemu);
        let mut action = |_: &GuestRef| -> autosnap_core::Result<()> { Ok(()) };

        let outcome = run_pass(&[guest(100)], &mut state, &FilterPipeline::new(true), &mut action);

        assert!(matches!(outcome, PassOutcome::Finished));
        let done: Vec<String> = state.completed().map(|k| k.to_string()).collect();
        assert_eq!(done, vec!["qemu/200", "lxc/100"]);
        assert_eq!(state.filtered_len(), 0);
    }

    #[test]
    fn test_pass_marks_filtered_with_sorted_tags() {
        let mut state = RunState::new();
        let rejected = guest(100).tags(["no-snapshot", "automated"]);
        let mut action = |_: &GuestRef| -> autosnap_core::Result<()> {
            panic!("action must not run for rejected guests")
        };

        let outcome = run_pass(
            std::slice::from_ref(&rejected),
            &mut state,
            &FilterPipeline::new(false),
            &mut action,
        );

        assert!(matches!(outcome, PassOutcome::Finished));
        assert_eq!(state.filtered_len(), 1);
        assert!(state.is_known_filtered(&guest(100).tags(["automated", "no-snapshot"])));
        assert_eq!(state.completed_len(), 0);
    }

    #[test]
    fn test_pass_aborts_on_error_and_leaves_state() {
        let mut state = RunState::new();
        state.mark_completed(500, GuestType::Qemu);
        let mut action =
            |_: &GuestRef| -> autosnap_core::Result<()> { Err(SnapError::action("test error")) };

        let outcome = run_pass(&[guest(100)], &mut state, &FilterPipeline::new(true), &mut action);

        match outcome {
            PassOutcome::Aborted { guest, error } => {
                assert_eq!(guest, GuestKey::new(100, GuestType::Lxc));
                assert!(error.to_string().contains("test error"));
            }
            PassOutcome::Finished => panic!("pass should abort"),
        }
        assert_eq!(state.completed_len(), 1);
        assert_eq!(state.filtered_len(), 0);
    }

    #[test]
    fn test_pass_skips_completed_even_if_selected() {
        let mut state = RunState::new();
        state.mark_completed(100, GuestType::Lxc);
        let mut action = |_: &GuestRef| -> autosnap_core::Result<()> {
            panic!("completed guest acted on again")
        };

        let outcome = run_pass(&[guest(100)], &mut state, &FilterPipeline::new(true), &mut action);
        assert!(matches!(outcome, PassOutcome::Finished));
    }

    #[test]
    fn test_pass_skips_known_filtered() {
        let mut state = RunState::new();
        state.mark_filtered(&guest(100));
        // Pipeline would now select the guest; the cache hit wins.
        let mut action = |_: &GuestRef| -> autosnap_core::Result<()> {
            panic!("cached rejection re-evaluated")
        };

        let outcome = run_pass(&[guest(100)], &mut state, &FilterPipeline::new(true), &mut action);
        assert!(matches!(outcome, PassOutcome::Finished));
    }

    #[test]
    fn test_pass_builds_handle_from_guest() {
        let mut state = RunState::new();
        let mut seen = Vec::new();
        let mut action = |target: &GuestRef| -> autosnap_core::Result<()> {
            seen.push(target.clone());
            Ok(())
        };
        let pipeline = FilterPipeline::new(false).include(Criterion::ids([7]));
        let vm = Guest::new(7, GuestType::Qemu).node("pve3");

        run_pass(&[vm], &mut state, &pipeline, &mut action);

        assert_eq!(
            seen,
            vec![GuestRef {
                id: 7,
                kind: GuestType::Qemu,
                node: "pve3".into()
            }]
        );
    }

    #[test]
    fn test_options_builder() {
        let options = RunOptions::new()
            .max_refetches(None)
            .refetch_delay(Duration::from_secs(2));
        assert_eq!(options.max_refetches, None);
        assert_eq!(options.refetch_delay, Duration::from_secs(2));
        assert_eq!(RunOptions::default().max_refetches, Some(10));
    }
}
