//! Guest selection engine.
//!
//! A [`FilterPipeline`] folds an ordered list of include/exclude
//! [`FilterStep`]s over a single [`Guest`] and yields whether that guest is
//! selected for snapshotting. Evaluation is pure: the same pipeline and guest
//! always give the same answer.

pub mod guest;
pub mod pipeline;

pub use guest::{Guest, GuestKey, GuestType};
pub use pipeline::{Criterion, FilterPipeline, FilterStep, StepKind};
