//! Splitting content into ordered leaf blocks
//!
//! Two versions of a file are compared block by block: each block is
//! hashed into a leaf that remembers its position, so divergent leaves
//! map straight back to block ranges.

use crate::hasher::TreeHasher;
use crate::tree::Tree;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default chunk size for [`BlockMode::Chunks`]: 4KB
pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024;

/// How content is cut into blocks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BlockMode {
    /// One block per line, without the line terminator
    #[default]
    Lines,
    /// Fixed-size chunks; the last one may be shorter
    Chunks,
}

impl fmt::Display for BlockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockMode::Lines => f.write_str("lines"),
            BlockMode::Chunks => f.write_str("chunks"),
        }
    }
}

/// Half-open range of block indices covered by a node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Span of the single block at `index`
    pub fn at(index: usize) -> Self {
        Span {
            start: index,
            end: index + 1,
        }
    }

    /// Smallest span covering both. Associative, and `s.join(&s) == s`.
    pub fn join(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `data` into blocks
pub fn split(data: &[u8], mode: BlockMode, chunk_size: usize) -> Result<Vec<&[u8]>> {
    match mode {
        BlockMode::Lines => {
            if data.is_empty() {
                return Ok(Vec::new());
            }
            let body = data.strip_suffix(b"\n").unwrap_or(data);
            Ok(body.split(|b| *b == b'\n').collect())
        }
        BlockMode::Chunks => {
            if chunk_size == 0 {
                return Err(Error::Config("Chunk size must be greater than zero".into()));
            }
            Ok(data.chunks(chunk_size).collect())
        }
    }
}

/// Hash each block into a leaf carrying its position
pub fn leaves<H: TreeHasher>(blocks: &[&[u8]]) -> Vec<Tree<H::Digest, Span>> {
    blocks
        .iter()
        .enumerate()
        .map(|(i, block)| Tree::leaf(H::digest(block), Span::at(i)))
        .collect()
}

/// Build the value-carrying tree for `data`
pub fn tree_for<H: TreeHasher>(
    data: &[u8],
    mode: BlockMode,
    chunk_size: usize,
) -> Result<Tree<H::Digest, Span>> {
    let blocks = split(data, mode, chunk_size)?;
    Ok(Tree::build::<H, _, _>(leaves::<H>(&blocks), Span::join))
}
