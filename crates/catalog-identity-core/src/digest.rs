//! Hashing primitives used for content-addressed identities
//!
//! Every digest is computed with a fresh hasher; no hash state is shared
//! between calls.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{IdentityError, Result};

/// Supported hashing algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HashAlgorithm {
    /// MD5, the algorithm the catalog uses for lineage process fingerprints
    MD5,
    /// SHA-256
    SHA256,
}

impl HashAlgorithm {
    /// Get the length of the digest in bytes
    pub fn hash_length(&self) -> usize {
        match self {
            HashAlgorithm::MD5 => 16,
            HashAlgorithm::SHA256 => 32,
        }
    }

    /// Get the length of the digest in hexadecimal characters
    pub fn hex_length(&self) -> usize {
        self.hash_length() * 2
    }

    /// Compute the lowercase hexadecimal digest of `data`
    pub fn hex_digest(&self, data: &[u8]) -> String {
        match self {
            HashAlgorithm::MD5 => {
                use md5::{Digest, Md5};
                let mut hasher = Md5::new();
                hasher.update(data);
                format!("{:x}", hasher.finalize())
            }
            HashAlgorithm::SHA256 => {
                use sha2::{Digest, Sha256};
                let mut hasher = Sha256::new();
                hasher.update(data);
                format!("{:x}", hasher.finalize())
            }
        }
    }

    /// Validate that a hex string has the correct shape for this algorithm
    pub fn validate_hex(&self, hash: &str) -> Result<()> {
        let expected_len = self.hex_length();
        if hash.len() != expected_len {
            return Err(IdentityError::InvalidDigest(format!(
                "expected {} hex characters for {}, got {}",
                expected_len,
                self,
                hash.len()
            )));
        }

        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdentityError::InvalidDigest(
                "digest must be a hexadecimal string".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::MD5 => write!(f, "MD5"),
            HashAlgorithm::SHA256 => write!(f, "SHA256"),
        }
    }
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::MD5
    }
}

impl FromStr for HashAlgorithm {
    type Err = IdentityError;

    /// Unknown names are a fatal configuration problem: there is no fallback
    /// to a different primitive.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "MD5" => Ok(HashAlgorithm::MD5),
            "SHA256" | "SHA-256" => Ok(HashAlgorithm::SHA256),
            _ => Err(IdentityError::HashUnavailable(s.to_string())),
        }
    }
}

/// A computed digest together with the algorithm that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    /// The hashing algorithm used
    pub algorithm: HashAlgorithm,
    /// Lowercase hexadecimal value
    pub value: String,
}

impl Digest {
    /// Create a digest from an existing hex value, normalizing to lowercase
    pub fn new(algorithm: HashAlgorithm, value: impl Into<String>) -> Result<Self> {
        let value = value.into().to_lowercase();
        algorithm.validate_hex(&value)?;
        Ok(Self { algorithm, value })
    }

    /// Hash `data` with `algorithm`
    pub fn compute(algorithm: HashAlgorithm, data: &[u8]) -> Self {
        Self {
            algorithm,
            value: algorithm.hex_digest(data),
        }
    }

    /// Get the hex value
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.value)
    }
}
