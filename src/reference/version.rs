use std::sync::LazyLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::AcquisitionError;

static VERSION_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid version regex"));

/// Body of the deployment's version metadata endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

pub async fn discover_version(
    client: &reqwest::Client,
    url: &str,
) -> Result<VersionInfo, AcquisitionError> {
    let unavailable = |reason: String| AcquisitionError::VersionUnavailable {
        url: url.to_string(),
        reason,
    };

    debug!("GET {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(unavailable(format!("HTTP {}", status)));
    }

    let info: VersionInfo = response
        .json()
        .await
        .map_err(|e| unavailable(format!("malformed version metadata: {}", e)))?;

    validate_version(&info.version)?;
    Ok(info)
}

/// Accepts only versions that are safe to hand to git as a ref name.
pub fn validate_version(version: &str) -> Result<(), AcquisitionError> {
    if VERSION_REF.is_match(version) && !version.contains("..") {
        Ok(())
    } else {
        Err(AcquisitionError::InvalidVersion {
            version: version.to_string(),
        })
    }
}
