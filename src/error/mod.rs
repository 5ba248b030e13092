mod acquisition;

use thiserror::Error;
use crate::fingerprint::Fingerprint;

pub use acquisition::{AcquisitionError, AcquisitionStep};

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Reference acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("Could not fetch {name} from {url}: {reason}")]
    Fetch {
        name: String,
        url: String,
        reason: String,
    },

    #[error("Send might be pwned. {name} doesn't match expected hash (expected {expected}, got {actual} from {url})")]
    IntegrityMismatch {
        name: String,
        url: String,
        expected: Fingerprint,
        actual: Fingerprint,
    },

    #[error("Send might be pwned. {url} loaded script {name}, which is not part of the reference build")]
    UnaccountedAsset {
        name: String,
        url: String,
    },

    #[error("Send might be pwned. {url} loaded script {name}, but its content could not be verified: {reason}")]
    UnverifiedAsset {
        name: String,
        url: String,
        reason: String,
    },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuditError {
    /// True when the error is evidence of tampering rather than a tooling
    /// or network problem.
    pub fn is_security_failure(&self) -> bool {
        matches!(
            self,
            AuditError::IntegrityMismatch { .. } | AuditError::UnaccountedAsset { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AuditError::Acquisition(_) => "acquisition_failure",
            AuditError::Fetch { .. } => "fetch_failure",
            AuditError::IntegrityMismatch { .. } => "integrity_mismatch",
            AuditError::UnaccountedAsset { .. } => "unaccounted_asset",
            AuditError::UnverifiedAsset { .. } => "unverified_asset",
            AuditError::Browser(_) => "browser_failure",
            AuditError::Http(_) => "http_client_failure",
            AuditError::Io(_) => "io_failure",
            AuditError::Yaml(_) | AuditError::Json(_) => "serialization_failure",
        }
    }

    /// Name of the asset the error is about, if any.
    pub fn asset_name(&self) -> Option<&str> {
        match self {
            AuditError::Fetch { name, .. }
            | AuditError::IntegrityMismatch { name, .. }
            | AuditError::UnaccountedAsset { name, .. }
            | AuditError::UnverifiedAsset { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl From<chromiumoxide::error::CdpError> for AuditError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AuditError::Browser(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
