use tracing::{info, warn};
use crate::asset::{AcquisitionMode, BuildOutput, RemoteArtifact, Verdict};
use crate::error::Result;
use crate::remote::AssetFetcher;
use crate::target::asset_url;

/// Compares every deliverable asset of a build against the file of the same
/// name on the live host. Stops at the first divergence.
pub struct StaticComparator<'a> {
    fetcher: &'a dyn AssetFetcher,
}

impl<'a> StaticComparator<'a> {
    pub fn new(fetcher: &'a dyn AssetFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn compare_static_assets(
        &self,
        build: &BuildOutput,
        base_url: &str,
    ) -> Result<Vec<Verdict>> {
        let names = build.asset_names()?;
        if names.is_empty() {
            warn!("No assets matching {:?} in {}", build.filter().patterns(), build.root().display());
        }

        let mut verdicts = Vec::with_capacity(names.len());
        for name in names {
            let verdict = self.compare_one(build, base_url, &name).await?;
            info!("{} ok", name);
            verdicts.push(verdict);
        }

        Ok(verdicts)
    }

    async fn compare_one(&self, build: &BuildOutput, base_url: &str, name: &str) -> Result<Verdict> {
        let reference = build.load(name)?;
        let url = asset_url(base_url, name);
        let body = self.fetcher.fetch(name, &url).await?;
        let remote = RemoteArtifact::from_bytes(name, url, AcquisitionMode::StaticFetch, &body);

        Verdict::compare(&reference, remote).into_result()
    }
}
