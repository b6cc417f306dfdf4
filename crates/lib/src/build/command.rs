//! External build command.
//!
//! [`CommandBuilder`] hands a task to an external build program. The task is
//! serialized as a JSON plan to a temporary file and the program is invoked
//! as:
//!
//! ```text
//! <program> [args..] build --plan <file>
//!   --store-path <dir> --local-store-path <dir> --project-path <dir>
//!   [--force] [--build-only] [--quiet]
//! ```

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::Config;
use crate::execute::BuildError;
use crate::task::Task;

use super::executor::{BuildOptions, Builder};

/// Builds tasks by spawning an external build program.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
  program: PathBuf,
  args: Vec<OsString>,
}

impl CommandBuilder {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
    }
  }

  /// Add an argument placed before the `build` subcommand.
  pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn program(&self) -> &PathBuf {
    &self.program
  }
}

impl Builder for CommandBuilder {
  async fn build(&self, options: &BuildOptions, config: &Config, task: &Task) -> Result<(), BuildError> {
    let plan_err = |message: String| BuildError::Plan {
      task: task.id.clone(),
      message,
    };

    // Lives until the process exits
    let plan = tempfile::Builder::new()
      .prefix("keel-plan-")
      .suffix(".json")
      .tempfile()
      .map_err(|e| plan_err(e.to_string()))?;
    serde_json::to_writer(plan.as_file(), task).map_err(|e| plan_err(e.to_string()))?;

    let mut command = Command::new(&self.program);
    command
      .args(&self.args)
      .arg("build")
      .arg("--plan")
      .arg(plan.path())
      .arg("--store-path")
      .arg(&config.store_path)
      .arg("--local-store-path")
      .arg(&config.local_store_path)
      .arg("--project-path")
      .arg(&config.project_path)
      .stdin(Stdio::null());

    if options.force {
      command.arg("--force");
    }
    if options.build_only {
      command.arg("--build-only");
    }
    if options.quiet {
      command.arg("--quiet");
    }

    if let Some(path) = &options.stderr {
      let file = OpenOptions::new().create(true).append(true).open(path)?;
      command.stderr(Stdio::from(file));
    }

    let cmd = format!("{} build --plan {}", self.program.display(), plan.path().display());
    debug!(task = %task.id, cmd = %cmd, "spawning builder");

    let output = command.output().await.map_err(|e| BuildError::Spawn {
      cmd: cmd.clone(),
      message: e.to_string(),
    })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      let stdout = String::from_utf8_lossy(&output.stdout);

      if !stderr.is_empty() {
        warn!(task = %task.id, stderr = %stderr.trim_end(), "builder stderr");
      }
      if !stdout.is_empty() {
        debug!(task = %task.id, stdout = %stdout.trim_end(), "builder stdout");
      }

      return Err(BuildError::CmdFailed {
        cmd,
        code: output.status.code(),
      });
    }

    Ok(())
  }
}
