//! Collaborator seams: where guests come from and what is done to them.

use autosnap_core::Result;
use autosnap_filter::{Guest, GuestKey, GuestType};
use std::fmt;

/// Supplies a fresh, complete guest inventory on every call.
///
/// Implementations must leave templates out; nothing downstream checks.
pub trait InventorySource {
    fn fetch(&mut self) -> Result<Vec<Guest>>;
}

impl<F> InventorySource for F
where
    F: FnMut() -> Result<Vec<Guest>>,
{
    fn fetch(&mut self) -> Result<Vec<Guest>> {
        self()
    }
}

/// The side effect applied to each selected guest, e.g. taking a snapshot.
///
/// Should block until the operation is accepted or has failed. Any error is
/// treated by the orchestrator as a sign that the inventory is stale.
pub trait GuestAction {
    fn run(&mut self, guest: &GuestRef) -> Result<()>;
}

impl<F> GuestAction for F
where
    F: FnMut(&GuestRef) -> Result<()>,
{
    fn run(&mut self, guest: &GuestRef) -> Result<()> {
        self(guest)
    }
}

/// Address of a guest as needed to operate on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestRef {
    pub id: u32,
    pub kind: GuestType,
    pub node: String,
}

impl GuestRef {
    pub fn key(&self) -> GuestKey {
        GuestKey::new(self.id, self.kind)
    }
}

impl From<&Guest> for GuestRef {
    fn from(guest: &Guest) -> Self {
        Self {
            id: guest.id,
            kind: guest.kind,
            node: guest.node.clone(),
        }
    }
}

impl fmt::Display for GuestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} on {}", self.kind, self.id, self.node)
    }
}
