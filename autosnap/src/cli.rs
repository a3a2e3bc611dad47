// CLI argument parsing and definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "autosnap")]
#[command(about = "Snapshot selected Proxmox VE guests in one consistent run")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to an autosnap.yaml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Snapshot every selected guest
    Run {
        /// Log what would be snapshotted without creating snapshots
        #[arg(long)]
        dry_run: bool,

        /// Read the guest list from a saved `pvesh get /cluster/resources` dump
        #[arg(long, value_name = "FILE")]
        inventory: Option<PathBuf>,
    },
    /// Show which guests the filter selects, without acting
    Plan {
        /// Read the guest list from a saved `pvesh get /cluster/resources` dump
        #[arg(long, value_name = "FILE")]
        inventory: Option<PathBuf>,
    },
    /// Validate the configuration and print the resulting filter
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["autosnap", "run", "--dry-run", "--config", "/tmp/a.yaml", "-d"]);
        assert!(args.debug);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/a.yaml")));
        assert!(matches!(
            args.command,
            Command::Run {
                dry_run: true,
                inventory: None
            }
        ));
    }
}
