//! Guest model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of guest. Ids are only unique within one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestType {
    /// Full virtual machine
    Qemu,
    /// Container
    Lxc,
}

impl GuestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuestType::Qemu => "qemu",
            GuestType::Lxc => "lxc",
        }
    }
}

impl fmt::Display for GuestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GuestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qemu" => Ok(GuestType::Qemu),
            "lxc" => Ok(GuestType::Lxc),
            other => Err(format!("unknown guest type '{}'", other)),
        }
    }
}

/// Stable identity of a guest across inventory fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuestKey {
    pub id: u32,
    pub kind: GuestType,
}

impl GuestKey {
    pub fn new(id: u32, kind: GuestType) -> Self {
        Self { id, kind }
    }
}

impl fmt::Display for GuestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Minimal view of a cluster guest, rebuilt on every inventory fetch.
///
/// `tags` keep the order the cluster reported them in; anything comparing
/// tag sets must canonicalize first (see [`Guest::sorted_tags`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: u32,
    pub kind: GuestType,
    pub name: String,
    pub node: String,
    #[serde(default)]
    pub pool: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Guest {
    pub fn new(id: u32, kind: GuestType) -> Self {
        Self {
            id,
            kind,
            name: String::new(),
            node: String::new(),
            pool: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn node(mut self, node: impl Into<String>) -> Self {
        self.node = node.into();
        self
    }

    pub fn pool(mut self, pool: impl Into<String>) -> Self {
        self.pool = pool.into();
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn key(&self) -> GuestKey {
        GuestKey::new(self.id, self.kind)
    }

    /// Tags in canonical (sorted) order.
    pub fn sorted_tags(&self) -> Vec<String> {
        let mut tags = self.tags.clone();
        tags.sort();
        tags
    }
}
