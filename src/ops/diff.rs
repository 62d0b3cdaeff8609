//! Divergence between two positionally aligned trees

use crate::tree::Tree;
use std::collections::HashSet;
use std::hash::Hash as StdHash;
use tracing::debug;

/// Leaves of the subject tree that differ from the reference tree
#[derive(Debug)]
pub struct TreeDiff<'a, D, V> {
    /// Divergent leaf nodes of the subject, keyed by digest
    pub leaves: HashSet<&'a Tree<D, V>>,
    /// Statistics about the diff walk
    pub stats: DiffStats,
}

/// Statistics from a diff walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    /// Node pairs compared
    pub nodes_visited: usize,
    /// Subtrees skipped because their digests matched
    pub unchanged_subtrees: usize,
    /// Positions where exactly one side was `Empty`
    pub boundary_mismatches: usize,
}

impl<'a, D: Eq + StdHash, V> TreeDiff<'a, D, V> {
    /// Create an empty diff (identical trees)
    pub fn empty() -> Self {
        TreeDiff {
            leaves: HashSet::new(),
            stats: DiffStats::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Digests of the divergent leaves
    pub fn hashes(&self) -> HashSet<D>
    where
        D: Clone,
    {
        self.leaves
            .iter()
            .filter_map(|leaf| leaf.root_hash().cloned())
            .collect()
    }

    /// Values carried by the divergent leaves, in no particular order
    pub fn values(&self) -> impl Iterator<Item = &'a V> + '_ {
        self.leaves.iter().filter_map(|leaf| leaf.value())
    }
}

/// Compare `subject` against `reference`, descending only into subtrees
/// whose digests differ
///
/// A leaf of `subject` is reported when its digest differs from the node
/// at the same position in `reference`. Positions where one side is
/// `Empty` and the other is not report nothing: the reference carries no
/// comparable content there.
pub fn diff_trees<'a, D, V>(subject: &'a Tree<D, V>, reference: &Tree<D, V>) -> TreeDiff<'a, D, V>
where
    D: Eq + StdHash,
{
    let mut diff = TreeDiff::empty();
    walk(subject, reference, &mut diff);

    debug!(
        divergent = diff.leaves.len(),
        visited = diff.stats.nodes_visited,
        unchanged = diff.stats.unchanged_subtrees,
        boundaries = diff.stats.boundary_mismatches,
        "tree diff complete"
    );

    diff
}

fn walk<'a, D, V>(subject: &'a Tree<D, V>, reference: &Tree<D, V>, diff: &mut TreeDiff<'a, D, V>)
where
    D: Eq + StdHash,
{
    diff.stats.nodes_visited += 1;

    match (subject, reference) {
        (
            Tree::Node {
                hash: subject_hash,
                left: subject_left,
                right: subject_right,
                ..
            },
            Tree::Node {
                hash: reference_hash,
                left: reference_left,
                right: reference_right,
                ..
            },
        ) => {
            if subject_hash == reference_hash {
                diff.stats.unchanged_subtrees += 1;
                return;
            }

            if subject.is_leaf() {
                diff.leaves.insert(subject);
                return;
            }

            walk(&**subject_left, &**reference_left, diff);
            walk(&**subject_right, &**reference_right, diff);
        }
        (Tree::Empty, Tree::Empty) => {}
        _ => diff.stats.boundary_mismatches += 1,
    }
}

impl<D: Eq + StdHash, V> Tree<D, V> {
    /// Divergent leaves of `self` relative to `other`
    pub fn difference<'a>(&'a self, other: &Self) -> HashSet<&'a Self> {
        diff_trees(self, other).leaves
    }

    /// Digests of the divergent leaves of `self` relative to `other`
    pub fn divergent_hashes(&self, other: &Self) -> HashSet<D>
    where
        D: Clone,
    {
        diff_trees(self, other).hashes()
    }
}
