use reqwest::Url;
use crate::asset::{AcquisitionMode, BuildOutput, RemoteArtifact, Verdict};
use crate::error::{AuditError, Result};

/// Decides the fate of each script response seen during the live session.
pub struct ResponseJudge<'a> {
    build: &'a BuildOutput,
}

impl<'a> ResponseJudge<'a> {
    pub fn new(build: &'a BuildOutput) -> Self {
        Self { build }
    }

    /// Whether a response must be compared at all. Anything the browser
    /// loaded as a script qualifies, whatever its name.
    pub fn is_candidate(&self, url: &str, script_typed: bool) -> bool {
        script_typed || basename(url).is_some_and(|name| self.build.filter().matches(&name))
    }

    /// Compares a live response body with the reference artifact of the same
    /// base name. A script with no reference counterpart is unaccounted for.
    pub fn judge(&self, url: &str, body: &[u8]) -> Result<Verdict> {
        let name = basename(url).unwrap_or_else(|| url.to_string());
        let reference = self
            .build
            .lookup(&name)?
            .ok_or_else(|| AuditError::UnaccountedAsset {
                name: name.clone(),
                url: url.to_string(),
            })?;

        let remote = RemoteArtifact::from_bytes(&name, url, AcquisitionMode::LiveSession, body);
        Verdict::compare(&reference, remote).into_result()
    }
}

/// Last non-empty path segment of `url`, ignoring query and fragment.
pub fn basename(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}
