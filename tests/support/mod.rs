#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Isolated data and config locations for one test
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.config_path();
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn data_file(&self, key: &str) -> PathBuf {
        self.data_dir().join(format!("{key}.json"))
    }

    pub fn read_data(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.data_file(key)).ok()
    }

    pub fn write_data(&self, key: &str, contents: &str) -> std::io::Result<()> {
        fs::create_dir_all(self.data_dir())?;
        fs::write(self.data_file(key), contents)
    }
}

/// `taskpad` pointed at the test's data dir and config, with logging reset
pub fn taskpad_cmd(dir: &TestDir) -> Command {
    let mut cmd = Command::cargo_bin("taskpad").expect("binary");
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("TASKPAD_DIR")
        .env("TASKPAD_CONFIG", dir.config_path())
        .arg("--dir")
        .arg(dir.data_dir());
    cmd
}

/// Run with `--json` and return the parsed envelope
pub fn run_json(dir: &TestDir, args: &[&str]) -> Value {
    let output = taskpad_cmd(dir)
        .arg("--json")
        .args(args)
        .output()
        .expect("run taskpad");
    assert!(
        output.status.success(),
        "taskpad {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json envelope")
}

/// Add a task and return its id
pub fn add_task(dir: &TestDir, args: &[&str]) -> String {
    let mut full = vec!["add"];
    full.extend_from_slice(args);
    let json = run_json(dir, &full);
    json["data"]["id"].as_str().expect("task id").to_string()
}

pub fn titles(list: &Value) -> Vec<String> {
    list["data"]["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .map(|task| task["title"].as_str().unwrap_or_default().to_string())
        .collect()
}
