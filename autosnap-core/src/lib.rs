//! Foundation crate for pve-autosnap.
//!
//! Holds the error type shared by every other crate, the console output
//! macros used by the CLI, and the external command runner the Proxmox
//! provider shells out through.

pub mod command;
pub mod error;
pub mod output_macros;

pub use command::{is_tool_installed, run_capture, CommandRunner, DuctRunner};
pub use error::{Result, SnapError};
