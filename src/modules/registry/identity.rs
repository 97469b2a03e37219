use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::ADDRESS_LENGTH;

/// An opaque principal. The registry only ever compares identities for equality.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap an existing principal string verbatim
    pub fn new(principal: impl Into<String>) -> Self {
        Self(principal.into())
    }

    /// Derive an address-style identity from raw public key bytes.
    ///
    /// The address is the first `ADDRESS_LENGTH` bytes of the key's SHA-256
    /// digest, hex encoded with a `0x` prefix.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        let digest = Sha256::digest(public_key);
        Self(format!("0x{}", hex::encode(&digest[..ADDRESS_LENGTH])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(principal: &str) -> Self {
        Self::new(principal)
    }
}

impl From<String> for Identity {
    fn from(principal: String) -> Self {
        Self(principal)
    }
}
