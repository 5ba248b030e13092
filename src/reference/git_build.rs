use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tracing::{debug, info};
use crate::asset::{AssetFilter, BuildOutput};
use crate::error::{AcquisitionError, AcquisitionStep, Result};
use crate::target::Target;
use super::ReferenceBuilder;
use super::command::BuildCommand;
use super::version::discover_version;

/// Builds the reference from a shallow clone of the upstream repository at
/// exactly the version the deployment reports.
pub struct GitNpmBuilder {
    target: Target,
    workdir: PathBuf,
    client: reqwest::Client,
    filter: AssetFilter,
    git: String,
    install: BuildCommand,
    build: BuildCommand,
}

impl GitNpmBuilder {
    pub fn new(target: Target, workdir: impl Into<PathBuf>, client: reqwest::Client) -> Self {
        Self {
            target,
            workdir: workdir.into(),
            client,
            filter: AssetFilter::scripts(),
            git: "git".to_string(),
            install: BuildCommand::npm_install(),
            build: BuildCommand::npm_build(),
        }
    }

    pub fn with_git_program(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }

    pub fn with_install_command(mut self, install: BuildCommand) -> Self {
        self.install = install;
        self
    }

    pub fn with_build_command(mut self, build: BuildCommand) -> Self {
        self.build = build;
        self
    }

    pub fn checkout_path(&self) -> PathBuf {
        self.workdir.join(&self.target.checkout_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.checkout_path().join(&self.target.build_output_dir)
    }

    fn clone_command(&self, version: &str) -> BuildCommand {
        BuildCommand::new(
            self.git.clone(),
            [
                "clone",
                "--depth",
                "1",
                "--single-branch",
                "--branch",
                version,
                "--",
                self.target.repository.as_str(),
                self.target.checkout_dir.as_str(),
            ],
        )
    }

    async fn prepare_workdir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.workdir).await?;

        let checkout = self.checkout_path();
        if tokio::fs::try_exists(&checkout).await? {
            debug!("Removing stale checkout {}", checkout.display());
            tokio::fs::remove_dir_all(&checkout).await?;
        }
        Ok(())
    }

    async fn run(&self, step: AcquisitionStep, command: &BuildCommand, cwd: &Path) -> Result<()> {
        command.run(step, cwd).await?;
        Ok(())
    }
}

#[async_trait]
impl ReferenceBuilder for GitNpmBuilder {
    async fn acquire_reference_build(&self) -> Result<BuildOutput> {
        let info = discover_version(&self.client, &self.target.version_url()).await?;
        if let Some(commit) = &info.commit {
            debug!("Deployment reports commit {}", commit);
        }

        self.prepare_workdir().await?;

        info!("Downloading {} from {}", info.version, self.target.repository);
        self.run(AcquisitionStep::Checkout, &self.clone_command(&info.version), &self.workdir).await?;

        let checkout = self.checkout_path();
        info!("Installing dependencies...");
        self.run(AcquisitionStep::Install, &self.install, &checkout).await?;

        info!("Building...");
        self.run(AcquisitionStep::Build, &self.build, &checkout).await?;

        let output = self.output_path();
        if !output.is_dir() {
            return Err(AcquisitionError::OutputMissing {
                path: output.display().to_string(),
            }.into());
        }

        Ok(BuildOutput::new(output, self.filter.clone()).with_version(info.version))
    }

    fn describe(&self) -> String {
        format!("{} built in {}", self.target.repository, self.checkout_path().display())
    }
}
