//! Shared testing utilities for xiaobao CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing harness providing an isolated environment for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");

        Self { root, work_dir }
    }

    /// Absolute path to the emulated `$HOME` directory.
    pub fn home(&self) -> &Path {
        self.root.path()
    }

    /// Path to the workspace directory used for CLI invocations.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Path to the `.xiaobao` directory in the work directory.
    pub fn xiaobao_path(&self) -> PathBuf {
        self.work_dir.join(".xiaobao")
    }

    /// Build a command for invoking the compiled `xiaobao` binary.
    ///
    /// Provider env vars are stripped so the host environment cannot leak in.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("xiaobao").expect("Failed to locate xiaobao binary");
        cmd.current_dir(&self.work_dir)
            .env("HOME", self.home())
            .env_remove("XIAOBAO_API_KEY")
            .env_remove("XIAOBAO_API_BASE");
        cmd
    }

    /// Write `.xiaobao/config.toml` with the given `[generation]` table body.
    pub fn write_config(&self, generation_toml: &str) {
        let dir = self.xiaobao_path();
        fs::create_dir_all(&dir).expect("Failed to create .xiaobao directory");
        fs::write(dir.join("config.toml"), format!("[generation]\n{generation_toml}"))
            .expect("Failed to write config.toml");
    }
}
