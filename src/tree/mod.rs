//! Binary hash tree
//!
//! Each internal node's digest is derived from its children's digests, so
//! two trees built from similar leaf sequences can be compared by walking
//! only the subtrees whose digests differ.

mod builder;
mod node;

pub use node::{Leaves, Tree};
