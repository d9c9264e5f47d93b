//! Scratch workspace for running the inspector.

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// Captured result of one inspector run.
pub struct Outcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// A temporary directory with log files and a config.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Write a file into the workspace and return its path.
    pub fn write(&self, name: &str, contents: &str) -> anyhow::Result<PathBuf> {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Run the inspector with `config` as its configuration file.
    pub fn run(&self, config: &str) -> anyhow::Result<Outcome> {
        let config_path = self.write("syncable.toml", config)?;
        let output = Command::new(env!("CARGO_BIN_EXE_syncable"))
            .arg(&config_path)
            .env_remove("RUST_LOG")
            .output()?;

        Ok(Outcome {
            success: output.status.success(),
            stdout: String::from_utf8(output.stdout)?,
            stderr: String::from_utf8(output.stderr)?,
        })
    }
}
