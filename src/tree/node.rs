//! Tree node type

use std::hash::{Hash as StdHash, Hasher as StdHasher};

/// An immutable binary hash tree
///
/// Every node owns its two children. A node whose children are both
/// [`Tree::Empty`] is a leaf; its digest is the one supplied by the caller.
/// Internal digests are always derived from the children by the builder.
///
/// Equality and `std::hash::Hash` look only at the root digest, so two
/// trees with the same root digest are the same tree as far as sets and
/// maps are concerned.
#[derive(Clone, Debug)]
pub enum Tree<D, V = ()> {
    /// An absent subtree
    Empty,
    /// A leaf or internal node
    Node {
        hash: D,
        value: V,
        left: Box<Tree<D, V>>,
        right: Box<Tree<D, V>>,
    },
}

impl<D, V> Tree<D, V> {
    /// Create a leaf node from a precomputed digest
    pub fn leaf(hash: D, value: V) -> Self {
        Tree::Node {
            hash,
            value,
            left: Box::new(Tree::Empty),
            right: Box::new(Tree::Empty),
        }
    }

    /// Check if this is the empty tree
    pub fn is_empty(&self) -> bool {
        matches!(self, Tree::Empty)
    }

    /// Check if this is a node with no children
    pub fn is_leaf(&self) -> bool {
        match self {
            Tree::Node { left, right, .. } => left.is_empty() && right.is_empty(),
            Tree::Empty => false,
        }
    }

    /// Digest at the top of this tree
    pub fn root_hash(&self) -> Option<&D> {
        match self {
            Tree::Node { hash, .. } => Some(hash),
            Tree::Empty => None,
        }
    }

    /// Value carried by the top node
    pub fn value(&self) -> Option<&V> {
        match self {
            Tree::Node { value, .. } => Some(value),
            Tree::Empty => None,
        }
    }

    pub fn left(&self) -> Option<&Tree<D, V>> {
        match self {
            Tree::Node { left, .. } => Some(&**left),
            Tree::Empty => None,
        }
    }

    pub fn right(&self) -> Option<&Tree<D, V>> {
        match self {
            Tree::Node { right, .. } => Some(&**right),
            Tree::Empty => None,
        }
    }

    /// Number of leaf nodes, counting duplicated odd leaves once per occurrence
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Number of node levels from the root down to the deepest leaf
    pub fn height(&self) -> usize {
        match self {
            Tree::Empty => 0,
            Tree::Node { left, right, .. } => 1 + left.height().max(right.height()),
        }
    }

    /// Leaf nodes in left-to-right order
    pub fn leaves(&self) -> Leaves<'_, D, V> {
        let mut stack = Vec::new();
        if !self.is_empty() {
            stack.push(self);
        }
        Leaves { stack }
    }
}

impl<D: AsRef<[u8]>, V> Tree<D, V> {
    /// Lowercase hex of the root digest
    pub fn hash_hex(&self) -> Option<String> {
        self.root_hash().map(hex::encode)
    }
}

impl<D: PartialEq, V> PartialEq for Tree<D, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Tree::Node { hash: l, .. }, Tree::Node { hash: r, .. }) => l == r,
            (Tree::Empty, Tree::Empty) => true,
            _ => false,
        }
    }
}

impl<D: Eq, V> Eq for Tree<D, V> {}

impl<D: StdHash, V> StdHash for Tree<D, V> {
    fn hash<S: StdHasher>(&self, state: &mut S) {
        self.root_hash().hash(state);
    }
}

impl<D, V> Default for Tree<D, V> {
    fn default() -> Self {
        Tree::Empty
    }
}

/// Iterator over the leaves of a tree, see [`Tree::leaves`]
#[derive(Debug)]
pub struct Leaves<'a, D, V> {
    stack: Vec<&'a Tree<D, V>>,
}

impl<'a, D, V> Iterator for Leaves<'a, D, V> {
    type Item = &'a Tree<D, V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Tree::Node { left, right, .. } = node {
                if node.is_leaf() {
                    return Some(node);
                }
                // Right first so the left subtree is popped next
                if !right.is_empty() {
                    self.stack.push(&**right);
                }
                if !left.is_empty() {
                    self.stack.push(&**left);
                }
            }
        }
        None
    }
}
