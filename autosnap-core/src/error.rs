use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapError {
    Config(String),
    Inventory(String),
    Action(String),
    Command(String),
    Timeout(String),
    Dependency(String),
    Io(#[from] std::io::Error),
    Serialization(String),
    Other(#[from] anyhow::Error),
}

impl Display for SnapError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SnapError::Config(s) => write!(f, "Configuration error: {}", s),
            SnapError::Inventory(s) => write!(f, "Inventory error: {}", s),
            SnapError::Action(s) => write!(f, "Action failed: {}", s),
            SnapError::Command(s) => write!(f, "Command failed: {}", s),
            SnapError::Timeout(s) => write!(f, "Timed out: {}", s),
            SnapError::Dependency(s) => {
                write!(f, "Dependency not found: {}\n\n", s)?;
                write!(f, "Fix:\n")?;
                write!(f, "  • Run autosnap on a Proxmox VE node, or\n")?;
                write!(f, "  • Set pvesh.binary in autosnap.yaml")
            }
            SnapError::Io(e) => write!(f, "I/O error: {}", e),
            SnapError::Serialization(s) => write!(f, "Serialization error: {}", s),
            SnapError::Other(e) => write!(f, "Other error: {}", e),
        }
    }
}

impl SnapError {
    pub fn config(msg: impl Into<String>) -> Self {
        SnapError::Config(msg.into())
    }

    pub fn action(msg: impl Into<String>) -> Self {
        SnapError::Action(msg.into())
    }

    pub fn inventory(msg: impl Into<String>) -> Self {
        SnapError::Inventory(msg.into())
    }
}

impl From<serde_yaml_ng::Error> for SnapError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        SnapError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for SnapError {
    fn from(err: serde_json::Error) -> Self {
        SnapError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SnapError>;
