use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CONFIG: &str = r#"
filter:
  all: false
  steps:
    - include:
        tag: [auto-snapshot]
    - exclude:
        pool: [scratch]
    - include:
        id: [102]
snapshot:
  prefix: "nightly_"
"#;

const RESOURCES: &str = r#"[
  {"id": "node/pve1", "type": "node", "node": "pve1", "status": "online"},
  {"vmid": 100, "type": "qemu", "node": "pve1", "name": "web", "tags": "auto-snapshot;prod", "template": 0},
  {"vmid": 101, "type": "lxc", "node": "pve2", "name": "dns", "tags": "auto-snapshot", "pool": "scratch"},
  {"vmid": 102, "type": "lxc", "node": "pve2", "name": "mail"},
  {"vmid": 103, "type": "qemu", "node": "pve1", "name": "build"},
  {"vmid": 9000, "type": "qemu", "node": "pve1", "name": "tpl", "tags": "auto-snapshot", "template": 1}
]"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("autosnap.yaml"), CONFIG).unwrap();
        fs::write(dir.path().join("resources.json"), RESOURCES).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// `autosnap` isolated from any config on the host.
    fn cmd(&self) -> Command {
        let mut cmd = Command::from(std::process::Command::new(assert_cmd::cargo::cargo_bin(
            "autosnap",
        )));
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join(".config"))
            .env("AUTOSNAP_LOG_OUTPUT", "none")
            .env_remove("AUTOSNAP_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

#[test]
fn test_check_prints_pipeline() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["check", "--config"])
        .arg(fx.path("autosnap.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("start: none"))
        .stdout(predicate::str::contains("include tag [auto-snapshot]"))
        .stdout(predicate::str::contains("exclude pool [scratch]"))
        .stdout(predicate::str::contains("Snapshot name: nightly_"))
        .stderr(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_check_finds_config_in_working_dir() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("autosnap.yaml"));
}

#[test]
fn test_check_rejects_bad_prefix() {
    let fx = Fixture::new();
    let config = fx.write("bad.yaml", "snapshot:\n  prefix: \"9lives\"\n");
    fx.cmd()
        .args(["check", "--config"])
        .arg(config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("snapshot.prefix"));
}

#[test]
fn test_missing_config_file() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["check", "--config"])
        .arg(fx.path("missing.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_config_from_env_var() {
    let fx = Fixture::new();
    let config = fx.write("env.yaml", "snapshot:\n  prefix: fromenv_\n");
    fx.cmd()
        .env("AUTOSNAP_CONFIG", config)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshot name: fromenv_"));
}

#[test]
fn test_plan_from_inventory_file() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["plan", "--inventory", "resources.json"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"qemu/100\s+web.*snapshot").unwrap())
        .stdout(predicate::str::is_match(r"lxc/101\s+dns.*skip").unwrap())
        .stdout(predicate::str::is_match(r"lxc/102\s+mail.*snapshot").unwrap())
        .stdout(predicate::str::is_match(r"qemu/103\s+build.*skip").unwrap())
        .stdout(predicate::str::contains("9000").not())
        .stdout(predicate::str::contains("2 of 4 guests selected"));
}

#[test]
fn test_dry_run_from_inventory_file() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["run", "--dry-run", "--inventory", "resources.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would snapshot qemu/100 on pve1"))
        .stdout(predicate::str::contains("would snapshot lxc/102 on pve2"))
        .stdout(predicate::str::contains("lxc/101").not())
        .stderr(predicate::str::contains("2 guests would be snapshotted, 2 skipped by filter"));
}

#[test]
fn test_plan_with_broken_inventory() {
    let fx = Fixture::new();
    fx.write("broken.json", "{not json");
    fx.cmd()
        .args(["plan", "--inventory", "broken.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Inventory error"));
}

#[test]
fn test_no_subcommand_shows_usage() {
    let fx = Fixture::new();
    fx.cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_config_warning_printed_once() {
    let fx = Fixture::new();
    let config = fx.write(
        "warn.yaml",
        "filter:\n  all: true\n  steps:\n    - exclude:\n        pool: []\n",
    );
    fx.cmd()
        .env("AUTOSNAP_LOG_OUTPUT", "console")
        .args(["check", "--config"])
        .arg(config)
        .assert()
        .success()
        .stderr(predicate::function(|err: &str| {
            err.matches("has no values and never matches").count() == 1
        }));
}

#[test]
fn test_live_run_without_pvesh_fails_once() {
    let fx = Fixture::new();
    let config = fx.write("live.yaml", "pvesh:\n  binary: no-such-pvesh-4b1e\n");
    fx.cmd()
        .args(["run", "--config"])
        .arg(config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::function(|err: &str| {
            err.matches("Dependency not found: no-such-pvesh-4b1e").count() == 1
        }));
}

#[test]
fn test_live_run_from_inventory_still_needs_pvesh() {
    let fx = Fixture::new();
    let config = fx.write("live.yaml", "pvesh:\n  binary: no-such-pvesh-4b1e\n");
    fx.cmd()
        .args(["run", "--inventory", "resources.json", "--config"])
        .arg(config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency not found"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_invalid_config_shows_cause() {
    let fx = Fixture::new();
    let config = fx.write("typo.yaml", "snapshot:\n  prefx: x\n");
    fx.cmd()
        .args(["check", "--config"])
        .arg(config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration in"))
        .stderr(predicate::str::contains("└─"))
        .stderr(predicate::str::contains("prefx"));
}
