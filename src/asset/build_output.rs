use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use crate::error::Result;
use super::artifact::ReferenceArtifact;
use super::filter::{AssetFilter, is_plain_name};

/// A finished build-output directory. Read-only for the rest of the run.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    root: PathBuf,
    filter: AssetFilter,
    version: Option<String>,
}

impl BuildOutput {
    pub fn new(root: impl Into<PathBuf>, filter: AssetFilter) -> Self {
        Self {
            root: root.into(),
            filter,
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn filter(&self) -> &AssetFilter {
        &self.filter
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Names of the top-level files selected by the filter, sorted.
    pub fn asset_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !self.filter.matches(&name) || !entry.path().is_file() {
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }

    pub fn load(&self, name: &str) -> Result<ReferenceArtifact> {
        let content = fs::read(self.root.join(name))?;
        Ok(ReferenceArtifact::new(name, content))
    }

    /// Looks up a reference artifact by bare file name.
    ///
    /// Returns `None` when the name is not a deliverable asset of this build.
    pub fn lookup(&self, name: &str) -> Result<Option<ReferenceArtifact>> {
        if !is_plain_name(name) || !self.filter.matches(name) {
            return Ok(None);
        }

        let path = self.root.join(name);
        if !path.is_file() {
            return Ok(None);
        }

        match fs::read(&path) {
            Ok(content) => Ok(Some(ReferenceArtifact::new(name, content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
