//! Pluggable hash functions for combining node digests
//!
//! The tree never hardcodes an algorithm. Anything that can be driven
//! through `new` / `update` / `finalize` can combine child digests, and
//! the digest type it produces becomes the tree's hash type.

mod hash;

pub use hash::Hash;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A streaming hash function usable for building trees
pub trait TreeHasher: Sized {
    /// Digest produced by [`finalize`](TreeHasher::finalize)
    type Digest: AsRef<[u8]> + Clone + Eq + std::hash::Hash + fmt::Debug;

    /// Start a fresh hash state
    fn new() -> Self;

    /// Feed bytes into the state
    fn update(&mut self, bytes: &[u8]);

    /// Consume the state and produce the digest
    fn finalize(self) -> Self::Digest;

    /// Hash a single buffer. Used when preparing leaf digests from content.
    fn digest(data: &[u8]) -> Self::Digest {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }

    /// `F(left || right)` over the raw digest bytes
    fn combine(left: &Self::Digest, right: &Self::Digest) -> Self::Digest {
        let mut hasher = Self::new();
        hasher.update(left.as_ref());
        hasher.update(right.as_ref());
        hasher.finalize()
    }
}

/// BLAKE3 adapter
#[derive(Clone)]
pub struct Blake3(blake3::Hasher);

impl TreeHasher for Blake3 {
    type Digest = Hash;

    fn new() -> Self {
        Blake3(blake3::Hasher::new())
    }

    fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finalize(self) -> Hash {
        Hash::from_bytes(*self.0.finalize().as_bytes())
    }
}

/// SHA-256 adapter
#[derive(Clone)]
pub struct Sha256(sha2::Sha256);

impl TreeHasher for Sha256 {
    type Digest = Hash;

    fn new() -> Self {
        Sha256(<sha2::Sha256 as sha2::Digest>::new())
    }

    fn update(&mut self, bytes: &[u8]) {
        sha2::Digest::update(&mut self.0, bytes);
    }

    fn finalize(self) -> Hash {
        let bytes: [u8; 32] = sha2::Digest::finalize(self.0).into();
        Hash::from_bytes(bytes)
    }
}

/// Runtime selection of a hash adapter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Blake3,
    Sha256,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Blake3 => "blake3",
            Algorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(Algorithm::Blake3),
            "sha256" | "sha-256" => Ok(Algorithm::Sha256),
            other => Err(crate::Error::Config(format!(
                "Unknown hash algorithm: {}",
                other
            ))),
        }
    }
}

/// Lowercase hex rendering of any digest
pub fn to_hex(digest: impl AsRef<[u8]>) -> String {
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            Sha256::digest(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_blake3_matches_crate() {
        let expected = *blake3::hash(b"hello").as_bytes();
        assert_eq!(Blake3::digest(b"hello"), Hash::from_bytes(expected));
    }

    #[test]
    fn test_combine_is_concatenation() {
        let a = Sha256::digest(b"a");
        let b = Sha256::digest(b"b");
        let mut joined = a.as_bytes().to_vec();
        joined.extend_from_slice(b.as_bytes());
        assert_eq!(Sha256::combine(&a, &b), Sha256::digest(&joined));
        assert_ne!(Sha256::combine(&a, &b), Sha256::combine(&b, &a));
    }

    #[test]
    fn test_algorithm_parse() {
        assert_eq!("BLAKE3".parse::<Algorithm>().unwrap(), Algorithm::Blake3);
        assert_eq!("sha-256".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
        assert!("md5".parse::<Algorithm>().is_err());
        assert_eq!(Algorithm::default().to_string(), "blake3");
    }

    #[test]
    fn test_to_hex_any_digest() {
        assert_eq!(to_hex([0x0fu8, 0xa0]), "0fa0");
    }
}
