use std::fmt;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionStep {
    VersionDiscovery,
    Checkout,
    Install,
    Build,
    Output,
}

impl AcquisitionStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionStep::VersionDiscovery => "version_discovery",
            AcquisitionStep::Checkout => "checkout",
            AcquisitionStep::Install => "install",
            AcquisitionStep::Build => "build",
            AcquisitionStep::Output => "output",
        }
    }
}

impl fmt::Display for AcquisitionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum AcquisitionError {
    VersionUnavailable {
        url: String,
        reason: String,
    },

    InvalidVersion {
        version: String,
    },

    CommandFailed {
        step: AcquisitionStep,
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    ToolMissing {
        step: AcquisitionStep,
        program: String,
        reason: String,
    },

    OutputMissing {
        path: String,
    },
}

impl AcquisitionError {
    pub fn step(&self) -> AcquisitionStep {
        match self {
            AcquisitionError::VersionUnavailable { .. } => AcquisitionStep::VersionDiscovery,
            AcquisitionError::InvalidVersion { .. } => AcquisitionStep::VersionDiscovery,
            AcquisitionError::CommandFailed { step, .. } => *step,
            AcquisitionError::ToolMissing { step, .. } => *step,
            AcquisitionError::OutputMissing { .. } => AcquisitionStep::Output,
        }
    }

    pub fn suggestion(&self) -> String {
        match self {
            AcquisitionError::VersionUnavailable { url, .. } => {
                format!(
                    "Could not read the deployed version:\n  \
                     • Check that {url} is reachable from this machine\n  \
                     • The endpoint must return JSON with a string \"version\" field\n  \
                     • An unreachable metadata endpoint is itself worth investigating"
                )
            }

            AcquisitionError::InvalidVersion { version } => {
                format!(
                    "The deployment reported version '{version}', which is not a usable git ref:\n  \
                     • Refs must start with a letter or digit\n  \
                     • Only letters, digits, '.', '_' and '-' are accepted\n  \
                     • A malformed version string may indicate a tampered deployment"
                )
            }

            AcquisitionError::CommandFailed { step: AcquisitionStep::Checkout, .. } => {
                "Checkout failed:\n  \
                 • Verify the upstream repository publishes a tag for this version\n  \
                 • Check network access to the git host\n  \
                 • Run the git clone command by hand to see the full output".to_string()
            }

            AcquisitionError::CommandFailed { step, command, .. } => {
                format!(
                    "The {step} step failed:\n  \
                     • Re-run `{command}` inside the checkout to see the full output\n  \
                     • Check that your node and npm versions match the upstream project\n  \
                     • Remove the working directory and try again"
                )
            }

            AcquisitionError::ToolMissing { program, .. } => {
                format!(
                    "Could not start '{program}':\n  \
                     • Make sure {program} is installed and on PATH\n  \
                     • Check that the working directory is writable"
                )
            }

            AcquisitionError::OutputMissing { path } => {
                format!(
                    "Expected build output at {path}:\n  \
                     • Check that the upstream build still writes to this directory\n  \
                     • Pass --build-dir to point at an existing build"
                )
            }
        }
    }
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionError::VersionUnavailable { url, reason } => {
                write!(f, "Version discovery failed at {url}: {reason}")
            }

            AcquisitionError::InvalidVersion { version } => {
                write!(f, "Deployment reported an invalid version '{version}'")
            }

            AcquisitionError::CommandFailed { step, command, exit_code, stderr } => {
                write!(f, "{step} step failed: `{command}`")?;
                match exit_code {
                    Some(code) => write!(f, " exited with status {code}")?,
                    None => write!(f, " was terminated by a signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, "\n\n{stderr}")?;
                }
                Ok(())
            }

            AcquisitionError::ToolMissing { step, program, reason } => {
                write!(f, "{step} step could not run '{program}': {reason}")
            }

            AcquisitionError::OutputMissing { path } => {
                write!(f, "Build output directory not found: {path}")
            }
        }
    }
}

impl std::error::Error for AcquisitionError {}
