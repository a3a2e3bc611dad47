//! Snapshot run orchestration
//!
//! Drives one run: fetch the guest inventory, decide each guest through the
//! [`RunState`] memo and the filter pipeline, and act on the selected ones.
//! An action failure is read as "our view of the cluster is stale": the
//! current pass is abandoned and the inventory is fetched again, while guests
//! already handled in this run are never acted on twice.

pub mod error;
pub mod run;
pub mod source;
pub mod state;

pub use error::{OrchestratorError, Result};
pub use run::{execute, Orchestrator, PassOutcome, RunOptions, RunReport};
pub use source::{GuestAction, GuestRef, InventorySource};
pub use state::RunState;
