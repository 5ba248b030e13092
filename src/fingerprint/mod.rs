use std::fmt;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 content digest, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(STANDARD.encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn fingerprint(content: &[u8]) -> Fingerprint {
    Fingerprint::of(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let a = fingerprint(b"console.log(1)");
        let b = fingerprint(b"console.log(1)");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_single_byte_difference() {
        let a = fingerprint(b"console.log(2)");
        let b = fingerprint(b"console.log(3)");
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_trailing_byte() {
        let a = fingerprint(b"console.log(1)");
        let b = fingerprint(b"console.log(1)\n");
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_flipped_bit() {
        let original = vec![0u8; 4096];
        let mut tampered = original.clone();
        tampered[2048] ^= 0x01;
        assert_ne!(fingerprint(&original), fingerprint(&tampered));
    }

    #[test]
    fn test_fingerprint_empty_buffer() {
        assert_eq!(
            fingerprint(b"").as_str(),
            "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
    }

    #[test]
    fn test_fingerprint_is_256_bit() {
        let decoded = STANDARD.decode(fingerprint(b"hello world").as_str()).unwrap();
        assert_eq!(decoded.len(), 32);
    }
}
