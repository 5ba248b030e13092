use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;
use crate::error::{AcquisitionError, AcquisitionStep};

const STDERR_TAIL_LINES: usize = 40;

/// An external program invocation used while acquiring the reference build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl BuildCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn npm_install() -> Self {
        Self::new("npm", ["install"])
    }

    pub fn npm_build() -> Self {
        Self::new("npm", ["run", "build"])
    }

    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    /// Runs the command in `cwd`. A non-zero exit fails the step.
    pub async fn run(&self, step: AcquisitionStep, cwd: &Path) -> Result<(), AcquisitionError> {
        debug!("Running `{}` in {}", self.display(), cwd.display());

        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AcquisitionError::ToolMissing {
                step,
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        if output.status.success() {
            return Ok(());
        }

        Err(AcquisitionError::CommandFailed {
            step,
            command: self.display(),
            exit_code: output.status.code(),
            stderr: tail(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL_LINES),
        })
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.trim_end().lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
