//! Change callbacks used by the `treewatch` binary

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::debug;
use treewatch_watcher::ChangeCallback;

/// Environment variable holding the changed path for `--exec` commands
pub const PATH_ENV_VAR: &str = "TREEWATCH_PATH";

/// Prints each changed path on its own line to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintCallback;

impl ChangeCallback for PrintCallback {
    fn on_change(&self, path: &Path) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", path.display()).context("Failed to write to stdout")?;
        stdout.flush().context("Failed to flush stdout")
    }
}

/// Runs a shell command for each changed path
///
/// The path is passed as `$1` and in `TREEWATCH_PATH`. A non-zero exit
/// status is reported as an error.
#[derive(Debug, Clone)]
pub struct ExecCallback {
    command: String,
}

impl ExecCallback {
    /// Create a callback running `command` through the platform shell
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The shell command
    pub fn command(&self) -> &str {
        &self.command
    }

    #[cfg(unix)]
    fn shell(&self, path: &Path) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&self.command).arg("treewatch").arg(path);
        cmd
    }

    #[cfg(windows)]
    fn shell(&self, path: &Path) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(&self.command).arg(path);
        cmd
    }
}

impl ChangeCallback for ExecCallback {
    fn on_change(&self, path: &Path) -> Result<()> {
        debug!("Running `{}` for {}", self.command, path.display());

        let status = self
            .shell(path)
            .env(PATH_ENV_VAR, path)
            .status()
            .with_context(|| format!("Failed to run `{}`", self.command))?;

        if !status.success() {
            bail!("`{}` exited with {}", self.command, status);
        }
        Ok(())
    }
}
