//! Bottom-up construction of hash trees
//!
//! Leaves are paired left to right into parents, level by level, until a
//! single root remains. An unpaired node at the end of a level is paired
//! with a copy of itself, so its parent digest is `F(x || x)`. A parent
//! with one `Empty` child uses the same duplicate formula; there is no
//! zero padding anywhere.

use super::Tree;
use crate::hasher::TreeHasher;
use tracing::trace;

impl<D, V> Tree<D, V> {
    /// Combine two subtrees under a new parent carrying `value`
    ///
    /// - both present: `F(left || right)`
    /// - one present: `F(x || x)` for the present side
    /// - both empty: `Empty`
    pub fn parent<H>(value: V, left: Self, right: Self) -> Self
    where
        H: TreeHasher<Digest = D>,
    {
        let hash = match (left.root_hash(), right.root_hash()) {
            (Some(l), Some(r)) => H::combine(l, r),
            (Some(only), None) | (None, Some(only)) => H::combine(only, only),
            (None, None) => return Tree::Empty,
        };

        Tree::Node {
            hash,
            value,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl<D: Clone, V: Clone> Tree<D, V> {
    /// Build a value-carrying tree from leaf nodes
    ///
    /// `Empty` placeholders are dropped before pairing, so they never
    /// affect odd/even pairing. `join` produces each parent's value from
    /// its children's values; a self-paired node gets `join(v, v)`.
    pub fn build<H, I, F>(leaves: I, mut join: F) -> Self
    where
        H: TreeHasher<Digest = D>,
        I: IntoIterator<Item = Self>,
        F: FnMut(&V, &V) -> V,
    {
        let leaves: Vec<Self> = leaves.into_iter().filter(|n| !n.is_empty()).collect();

        reduce(leaves, |left, right| {
            let value = match (left.value(), right.value()) {
                (Some(l), Some(r)) => join(l, r),
                (Some(only), None) | (None, Some(only)) => join(only, only),
                (None, None) => return Tree::Empty,
            };
            Tree::parent::<H>(value, left, right)
        })
    }

    /// Build a value-carrying tree from `(digest, value)` leaves
    pub fn from_pairs<H, I, F>(pairs: I, join: F) -> Self
    where
        H: TreeHasher<Digest = D>,
        I: IntoIterator<Item = (D, V)>,
        F: FnMut(&V, &V) -> V,
    {
        Self::build::<H, _, _>(
            pairs.into_iter().map(|(hash, value)| Tree::leaf(hash, value)),
            join,
        )
    }
}

impl<D: Clone> Tree<D, ()> {
    /// Digest-only parent of two subtrees
    pub fn branch<H>(left: Self, right: Self) -> Self
    where
        H: TreeHasher<Digest = D>,
    {
        Tree::parent::<H>((), left, right)
    }

    /// Build a digest-only tree from precomputed leaf digests
    pub fn from_hashes<H, I>(hashes: I) -> Self
    where
        H: TreeHasher<Digest = D>,
        I: IntoIterator<Item = D>,
    {
        Self::from_nodes::<H, _>(hashes.into_iter().map(|hash| Tree::leaf(hash, ())))
    }

    /// Build a digest-only tree from pre-built nodes
    ///
    /// Unlike [`Tree::build`], `Empty` entries keep their position and take
    /// part in pairing.
    pub fn from_nodes<H, I>(nodes: I) -> Self
    where
        H: TreeHasher<Digest = D>,
        I: IntoIterator<Item = Self>,
    {
        reduce(nodes.into_iter().collect(), Self::branch::<H>)
    }
}

/// Pairwise reduction. Always runs at least one pass, so a single leaf
/// ends up under a self-paired parent.
fn reduce<D: Clone, V: Clone>(
    mut level: Vec<Tree<D, V>>,
    mut pair: impl FnMut(Tree<D, V>, Tree<D, V>) -> Tree<D, V>,
) -> Tree<D, V> {
    if level.is_empty() {
        return Tree::Empty;
    }

    let mut depth = 0usize;
    loop {
        trace!(depth, width = level.len(), "reducing tree level");

        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut nodes = level.into_iter();
        while let Some(left) = nodes.next() {
            let right = match nodes.next() {
                Some(right) => right,
                None => left.clone(),
            };
            next.push(pair(left, right));
        }

        depth += 1;
        level = next;
        if level.len() == 1 {
            break;
        }
    }

    level.pop().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{Hash, Sha256};

    fn h(s: &str) -> Hash {
        Sha256::digest(s.as_bytes())
    }

    #[test]
    fn test_parent_pairing_rule() {
        let a = Tree::leaf(h("a"), ());
        let b = Tree::leaf(h("b"), ());

        let both = Tree::branch::<Sha256>(a.clone(), b);
        assert_eq!(both.root_hash(), Some(&Sha256::combine(&h("a"), &h("b"))));

        let left_only = Tree::branch::<Sha256>(a.clone(), Tree::Empty);
        let right_only = Tree::branch::<Sha256>(Tree::Empty, a.clone());
        let dup = Sha256::combine(&h("a"), &h("a"));
        assert_eq!(left_only.root_hash(), Some(&dup));
        assert_eq!(right_only.root_hash(), Some(&dup));
        assert_eq!(Tree::branch::<Sha256>(a.clone(), a), left_only);

        let none = Tree::<Hash>::branch::<Sha256>(Tree::Empty, Tree::Empty);
        assert!(none.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let tree = Tree::from_hashes::<Sha256, _>(Vec::<Hash>::new());
        assert!(tree.is_empty());
        assert_eq!(tree.root_hash(), None);
    }

    #[test]
    fn test_single_leaf_is_self_paired() {
        let tree = Tree::from_hashes::<Sha256, _>([h("x")]);
        assert_eq!(tree.root_hash(), Some(&Sha256::combine(&h("x"), &h("x"))));
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_odd_leaf_duplicated() {
        let tree = Tree::from_hashes::<Sha256, _>([h("a"), h("b"), h("c")]);
        let ab = Sha256::combine(&h("a"), &h("b"));
        let cc = Sha256::combine(&h("c"), &h("c"));
        assert_eq!(tree.root_hash(), Some(&Sha256::combine(&ab, &cc)));

        let right = tree.right().unwrap();
        assert_eq!(right.left(), right.right());
        assert!(right.left().unwrap().is_leaf());
    }

    #[test]
    fn test_five_leaves_duplicate_at_every_level() {
        let leaves: Vec<Hash> = ["1", "2", "3", "4", "5"].iter().map(|s| h(s)).collect();
        let tree = Tree::from_hashes::<Sha256, _>(leaves.clone());

        let c = |l: &Hash, r: &Hash| Sha256::combine(l, r);
        let l12 = c(&leaves[0], &leaves[1]);
        let l34 = c(&leaves[2], &leaves[3]);
        let l55 = c(&leaves[4], &leaves[4]);
        let l1234 = c(&l12, &l34);
        let l5555 = c(&l55, &l55);
        assert_eq!(tree.root_hash(), Some(&c(&l1234, &l5555)));
        assert_eq!(tree.height(), 4);
    }

    #[test]
    fn test_from_nodes_keeps_placeholders_in_position() {
        let with_gap = Tree::from_nodes::<Sha256, _>([
            Tree::leaf(h("a"), ()),
            Tree::Empty,
            Tree::leaf(h("c"), ()),
            Tree::leaf(h("d"), ()),
        ]);
        let aa = Sha256::combine(&h("a"), &h("a"));
        let cd = Sha256::combine(&h("c"), &h("d"));
        assert_eq!(with_gap.root_hash(), Some(&Sha256::combine(&aa, &cd)));

        let all_empty = Tree::<Hash>::from_nodes::<Sha256, _>([Tree::Empty, Tree::Empty]);
        assert!(all_empty.is_empty());
    }

    #[test]
    fn test_build_filters_placeholders_and_joins_values() {
        let leaves = vec![
            Tree::leaf(h("a"), 1u32),
            Tree::Empty,
            Tree::leaf(h("b"), 2),
            Tree::leaf(h("c"), 4),
        ];
        let tree = Tree::build::<Sha256, _, _>(leaves, |l, r| l + r);

        let ab = Sha256::combine(&h("a"), &h("b"));
        let cc = Sha256::combine(&h("c"), &h("c"));
        assert_eq!(tree.root_hash(), Some(&Sha256::combine(&ab, &cc)));
        // (1 + 2) + (4 + 4)
        assert_eq!(tree.value(), Some(&11));
    }

    #[test]
    fn test_build_only_placeholders() {
        let tree = Tree::<Hash, u8>::build::<Sha256, _, _>([Tree::Empty, Tree::Empty], |l, _| *l);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_from_pairs_matches_digest_only_shape() {
        let names = ["a", "b", "c", "d", "e", "f", "g"];
        let valued = Tree::from_pairs::<Sha256, _, _>(
            names.iter().map(|n| (h(n), n.to_string())),
            |l, r| format!("{}{}", l, r),
        );
        let plain = Tree::from_hashes::<Sha256, _>(names.iter().map(|n| h(n)));
        assert_eq!(valued.root_hash(), plain.root_hash());
        assert_eq!(valued.value().map(String::as_str), Some("abcdefgg"));
    }
}
