//! Fingerprints of serialized analyses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// XXH3-128 hash of an analysis' canonical text.
///
/// Equal analyses render identically and therefore hash equal, so the hash
/// can stand in for the analysis when checking that a merge/split round trip
/// or a relocation left it unchanged. Serialized as 32 lowercase hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ContentHash(u128);

impl ContentHash {
    /// Hashes `data`.
    pub fn of(data: impl AsRef<[u8]>) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data.as_ref()))
    }

    /// Low 64 bits, for seeding generators from content.
    pub fn seed(&self) -> u64 {
        self.0 as u64
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:08x}..)", self.0 >> 96)
    }
}

/// Error returned when text is not a 32-digit hex hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid content hash '{0}': expected 32 hex digits")]
pub struct InvalidContentHash(pub String);

impl FromStr for ContentHash {
    type Err = InvalidContentHash;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(InvalidContentHash(s.to_string()));
        }
        u128::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| InvalidContentHash(s.to_string()))
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.to_string()
    }
}

impl TryFrom<String> for ContentHash {
    type Error = InvalidContentHash;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
