//! Include/exclude selection pipeline

use crate::guest::Guest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which guest attribute a step looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Id,
    Name,
    Node,
    Pool,
    Tag,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepKind::Id => "id",
            StepKind::Name => "name",
            StepKind::Node => "node",
            StepKind::Pool => "pool",
            StepKind::Tag => "tag",
        };
        f.write_str(s)
    }
}

/// Match set of a step, typed by the attribute it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Id(BTreeSet<u32>),
    Name(BTreeSet<String>),
    Node(BTreeSet<String>),
    Pool(BTreeSet<String>),
    Tag(BTreeSet<String>),
}

fn string_set<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl Criterion {
    pub fn ids<I: IntoIterator<Item = u32>>(ids: I) -> Self {
        Criterion::Id(ids.into_iter().collect())
    }

    pub fn names<I: IntoIterator<Item = S>, S: Into<String>>(names: I) -> Self {
        Criterion::Name(string_set(names))
    }

    pub fn nodes<I: IntoIterator<Item = S>, S: Into<String>>(nodes: I) -> Self {
        Criterion::Node(string_set(nodes))
    }

    pub fn pools<I: IntoIterator<Item = S>, S: Into<String>>(pools: I) -> Self {
        Criterion::Pool(string_set(pools))
    }

    pub fn tags<I: IntoIterator<Item = S>, S: Into<String>>(tags: I) -> Self {
        Criterion::Tag(string_set(tags))
    }

    pub fn kind(&self) -> StepKind {
        match self {
            Criterion::Id(_) => StepKind::Id,
            Criterion::Name(_) => StepKind::Name,
            Criterion::Node(_) => StepKind::Node,
            Criterion::Pool(_) => StepKind::Pool,
            Criterion::Tag(_) => StepKind::Tag,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Criterion::Id(set) => set.len(),
            Criterion::Name(set)
            | Criterion::Node(set)
            | Criterion::Pool(set)
            | Criterion::Tag(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `guest` falls into this match set. Tags match when any one of
    /// the guest's tags is in the set.
    pub fn matches(&self, guest: &Guest) -> bool {
        match self {
            Criterion::Id(ids) => ids.contains(&guest.id),
            Criterion::Name(names) => names.contains(&guest.name),
            Criterion::Node(nodes) => nodes.contains(&guest.node),
            Criterion::Pool(pools) => pools.contains(&guest.pool),
            Criterion::Tag(tags) => guest.tags.iter().any(|tag| tags.contains(tag)),
        }
    }

    fn values(&self) -> Vec<String> {
        match self {
            Criterion::Id(set) => set.iter().map(|id| id.to_string()).collect(),
            Criterion::Name(set)
            | Criterion::Node(set)
            | Criterion::Pool(set)
            | Criterion::Tag(set) => set.iter().cloned().collect(),
        }
    }
}

/// One pipeline stage. `add == true` includes matching guests, `false`
/// excludes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterStep {
    pub add: bool,
    pub criterion: Criterion,
}

impl FilterStep {
    pub fn include(criterion: Criterion) -> Self {
        Self {
            add: true,
            criterion,
        }
    }

    pub fn exclude(criterion: Criterion) -> Self {
        Self {
            add: false,
            criterion,
        }
    }

    pub fn kind(&self) -> StepKind {
        self.criterion.kind()
    }
}

impl fmt::Display for FilterStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}]",
            if self.add { "include" } else { "exclude" },
            self.kind(),
            self.criterion.values().join(", ")
        )
    }
}

/// Ordered include/exclude steps over a starting mark.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPipeline {
    /// Starting mark of every guest ("select all" when true)
    pub all: bool,
    pub steps: Vec<FilterStep>,
}

impl FilterPipeline {
    pub fn new(all: bool) -> Self {
        Self {
            all,
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: FilterStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn include(self, criterion: Criterion) -> Self {
        self.step(FilterStep::include(criterion))
    }

    pub fn exclude(self, criterion: Criterion) -> Self {
        self.step(FilterStep::exclude(criterion))
    }

    /// Decide whether `guest` is selected.
    ///
    /// A step whose direction equals the current mark cannot change it and
    /// its match set is never consulted.
    pub fn apply(&self, guest: &Guest) -> bool {
        self.steps.iter().fold(self.all, |mark, step| {
            if step.add != mark && step.criterion.matches(guest) {
                step.add
            } else {
                mark
            }
        })
    }
}

impl fmt::Display for FilterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "start: {}", if self.all { "all" } else { "none" })?;
        for (i, step) in self.steps.iter().enumerate() {
            write!(f, "\n{:>3}. {}", i + 1, step)?;
        }
        Ok(())
    }
}
