use serde::Serialize;
use crate::fingerprint::Fingerprint;

#[derive(Debug, Clone)]
pub struct ReferenceArtifact {
    pub name: String,
    pub content: Vec<u8>,
    pub fingerprint: Fingerprint,
}

impl ReferenceArtifact {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        let fingerprint = Fingerprint::of(&content);
        Self {
            name: name.into(),
            content,
            fingerprint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMode {
    StaticFetch,
    LiveSession,
}

impl AcquisitionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionMode::StaticFetch => "static",
            AcquisitionMode::LiveSession => "live",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoteArtifact {
    pub name: String,
    pub url: String,
    pub mode: AcquisitionMode,
    pub fingerprint: Fingerprint,
    pub size: usize,
}

impl RemoteArtifact {
    pub fn from_bytes(
        name: impl Into<String>,
        url: impl Into<String>,
        mode: AcquisitionMode,
        content: &[u8],
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            mode,
            fingerprint: Fingerprint::of(content),
            size: content.len(),
        }
    }
}
