//! Parsing of `pvesh get /cluster/resources --type vm` output.

use autosnap_core::error::{Result, SnapError};
use autosnap_filter::{Guest, GuestType};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// One entry of the cluster resource list. Only the fields guest selection
/// needs are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterResource {
    /// Absent on node, storage and other non-guest rows.
    #[serde(default)]
    pub vmid: Option<u32>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub node: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pool: Option<String>,
    /// Raw tag string, e.g. `"prod;auto-snapshot"`.
    #[serde(default)]
    pub tags: Option<String>,
    /// `1` for templates. Older releases have sent booleans and strings.
    #[serde(default)]
    pub template: Option<Value>,
}

impl ClusterResource {
    pub fn is_template(&self) -> bool {
        match &self.template {
            Some(Value::Number(n)) => n.as_u64() == Some(1),
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "1",
            _ => false,
        }
    }

    /// Convert to a [`Guest`]. Templates and non-guest resources give `None`.
    pub fn into_guest(self) -> Option<Guest> {
        let (vmid, kind) = match (self.vmid, self.kind.parse::<GuestType>()) {
            (Some(vmid), Ok(kind)) => (vmid, kind),
            _ => {
                debug!(vmid = ?self.vmid, kind = %self.kind, "skipping non-guest resource");
                return None;
            }
        };
        if self.is_template() {
            debug!(vmid, "skipping template");
            return None;
        }

        Some(
            Guest::new(vmid, kind)
                .name(self.name.unwrap_or_default())
                .node(self.node)
                .pool(self.pool.unwrap_or_default())
                .tags(split_tags(self.tags.as_deref().unwrap_or(""))),
        )
    }
}

/// Split a Proxmox tag string. `;` is the canonical separator, but `,` and
/// spaces are accepted as well.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ';' || c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a JSON resource list into snapshot candidates, dropping templates.
pub fn parse_guests(json: &str) -> Result<Vec<Guest>> {
    let resources: Vec<ClusterResource> = serde_json::from_str(json)
        .map_err(|e| SnapError::inventory(format!("Unreadable cluster resource list: {}", e)))?;
    Ok(resources
        .into_iter()
        .filter_map(ClusterResource::into_guest)
        .collect())
}
