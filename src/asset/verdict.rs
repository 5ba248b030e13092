use serde::Serialize;
use crate::error::{AuditError, Result};
use crate::fingerprint::Fingerprint;
use super::artifact::{ReferenceArtifact, RemoteArtifact};

#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub name: String,
    pub expected: Fingerprint,
    pub remote: RemoteArtifact,
    pub matched: bool,
}

impl Verdict {
    pub fn compare(reference: &ReferenceArtifact, remote: RemoteArtifact) -> Self {
        Self {
            name: reference.name.clone(),
            expected: reference.fingerprint.clone(),
            matched: reference.fingerprint == remote.fingerprint,
            remote,
        }
    }

    pub fn actual(&self) -> &Fingerprint {
        &self.remote.fingerprint
    }

    /// Turns a divergent verdict into the error that ends the run.
    pub fn into_result(self) -> Result<Verdict> {
        if self.matched {
            Ok(self)
        } else {
            Err(AuditError::IntegrityMismatch {
                name: self.name,
                url: self.remote.url,
                expected: self.expected,
                actual: self.remote.fingerprint,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AcquisitionMode;

    fn remote(content: &[u8]) -> RemoteArtifact {
        RemoteArtifact::from_bytes(
            "app.abc123.js",
            "https://send.firefox.com/app.abc123.js",
            AcquisitionMode::StaticFetch,
            content,
        )
    }

    #[test]
    fn test_matching_verdict() {
        let reference = ReferenceArtifact::new("app.abc123.js", b"console.log(1)".to_vec());
        let verdict = Verdict::compare(&reference, remote(b"console.log(1)"));
        assert!(verdict.matched);
        assert_eq!(verdict.expected, *verdict.actual());
        assert!(verdict.into_result().is_ok());
    }

    #[test]
    fn test_mismatch_becomes_error() {
        let reference = ReferenceArtifact::new("app.abc123.js", b"console.log(1)".to_vec());
        let verdict = Verdict::compare(&reference, remote(b"console.log(1);fetch('//evil')"));
        assert!(!verdict.matched);

        match verdict.into_result() {
            Err(AuditError::IntegrityMismatch { name, expected, actual, .. }) => {
                assert_eq!(name, "app.abc123.js");
                assert_eq!(expected, reference.fingerprint);
                assert_ne!(expected, actual);
            }
            other => panic!("expected IntegrityMismatch, got {:?}", other),
        }
    }
}
