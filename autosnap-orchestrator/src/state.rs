//! Run-scoped memo of handled guests

use autosnap_filter::{Guest, GuestKey, GuestType};
use indexmap::IndexSet;
use std::collections::HashMap;

/// Filter-relevant attributes of a rejected guest, tags sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FilteredGuest {
    name: String,
    node: String,
    pool: String,
    tags: Vec<String>,
}

impl FilteredGuest {
    fn of(guest: &Guest) -> Self {
        Self {
            name: guest.name.clone(),
            node: guest.node.clone(),
            pool: guest.pool.clone(),
            tags: guest.sorted_tags(),
        }
    }
}

/// What this run has already done.
///
/// Both tables are keyed by (id, type). A filtered entry is only trusted
/// while every filter-relevant attribute is unchanged.
#[derive(Debug, Default)]
pub struct RunState {
    completed: IndexSet<GuestKey>,
    filtered: HashMap<GuestKey, FilteredGuest>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, id: u32, kind: GuestType) -> bool {
        self.completed.contains(&GuestKey::new(id, kind))
    }

    /// True only if `guest` was rejected earlier in this run and none of its
    /// name, node, pool or tag set has changed since.
    pub fn is_known_filtered(&self, guest: &Guest) -> bool {
        self.filtered
            .get(&guest.key())
            .is_some_and(|cached| *cached == FilteredGuest::of(guest))
    }

    pub fn mark_completed(&mut self, id: u32, kind: GuestType) {
        self.completed.insert(GuestKey::new(id, kind));
    }

    /// Remember a rejection, replacing any earlier entry for the same guest.
    pub fn mark_filtered(&mut self, guest: &Guest) {
        self.filtered.insert(guest.key(), FilteredGuest::of(guest));
    }

    /// Completed guests in the order they were acted on.
    pub fn completed(&self) -> impl Iterator<Item = &GuestKey> {
        self.completed.iter()
    }

    pub fn completed_len(&self) -> usize {
        self.completed.len()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }
}
