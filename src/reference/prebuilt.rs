use std::path::PathBuf;
use async_trait::async_trait;
use tracing::info;
use crate::asset::{AssetFilter, BuildOutput};
use crate::error::{AcquisitionError, Result};
use crate::target::Target;
use super::ReferenceBuilder;
use super::version::discover_version;

/// A reference build the operator produced ahead of time.
pub struct PrebuiltBuild {
    dir: PathBuf,
    filter: AssetFilter,
    version_source: Option<(Target, reqwest::Client)>,
}

impl PrebuiltBuild {
    pub fn new(dir: impl Into<PathBuf>, filter: AssetFilter) -> Self {
        Self {
            dir: dir.into(),
            filter,
            version_source: None,
        }
    }

    /// Also resolve the deployed version, so the report records what the
    /// live site claims to run.
    pub fn with_version_check(mut self, target: Target, client: reqwest::Client) -> Self {
        self.version_source = Some((target, client));
        self
    }
}

#[async_trait]
impl ReferenceBuilder for PrebuiltBuild {
    async fn acquire_reference_build(&self) -> Result<BuildOutput> {
        if !self.dir.is_dir() {
            return Err(AcquisitionError::OutputMissing {
                path: self.dir.display().to_string(),
            }.into());
        }

        let output = BuildOutput::new(&self.dir, self.filter.clone());
        match &self.version_source {
            Some((target, client)) => {
                let info = discover_version(client, &target.version_url()).await?;
                info!("Deployment reports {}; using prebuilt reference {}", info.version, self.dir.display());
                Ok(output.with_version(info.version))
            }
            None => Ok(output),
        }
    }

    fn describe(&self) -> String {
        format!("prebuilt {}", self.dir.display())
    }
}
