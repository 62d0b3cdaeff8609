//! # merkle_diff
//!
//! Binary hash trees for comparing two versions of an ordered collection.
//!
//! Leaves are digests of content blocks. Every internal node's digest is
//! derived from its children's digests, so comparing two trees built from
//! positionally aligned sequences only needs to descend into subtrees whose
//! digests differ. The result is the set of divergent leaves, found in
//! `O(k log n)` for `k` changes among `n` leaves.
//!
//! ## Core Concepts
//!
//! - **Tree**: immutable `Empty | Node` value; equality is the root digest
//! - **Builder**: pairwise bottom-up reduction, odd nodes paired with themselves
//! - **Diff**: hash-guided pruning down to the divergent leaves
//! - **TreeHasher**: pluggable hash function (BLAKE3, SHA-256, or your own)
//!
//! ## Example
//!
//! ```
//! use merkle_diff::{Sha256, Tree, TreeHasher};
//!
//! let old: Vec<_> = ["a", "b", "c"].iter().map(|s| Sha256::digest(s.as_bytes())).collect();
//! let new: Vec<_> = ["a", "B", "c"].iter().map(|s| Sha256::digest(s.as_bytes())).collect();
//!
//! let old_tree = Tree::from_hashes::<Sha256, _>(old);
//! let new_tree = Tree::from_hashes::<Sha256, _>(new.clone());
//!
//! let changed = new_tree.divergent_hashes(&old_tree);
//! assert!(changed.contains(&new[1]));
//! assert_eq!(changed.len(), 1);
//! ```

pub mod blocks;
pub mod config;
pub mod hasher;
pub mod ops;
pub mod tree;

mod error;

pub use blocks::{BlockMode, Span};
pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use hasher::{to_hex, Algorithm, Blake3, Hash, Sha256, TreeHasher};
pub use ops::{diff_trees, DiffStats, TreeDiff};
pub use tree::Tree;
