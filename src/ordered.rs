//! Ordered map representation based on a persistent red-black tree.
//!
//! Insertion is the Okasaki bottom-up scheme: a new key always enters as a
//! red node at a leaf position, and on the way back up every node on the
//! insertion path runs a one-step local repair ([`balance_left`] /
//! [`balance_right`]) that resolves a red child with a red grandchild into
//! a red node with two black children. At most one red-red violation exists
//! on the path at any time, so the single-step repair at each level restores
//! the tree-wide invariant.
//!
//! [`balance_left`]: OrderedMap::balance_left
//! [`balance_right`]: OrderedMap::balance_right
//!
//! Two deliberate departures from the textbook algorithm are preserved here
//! because nothing observable depends on them (search, size, equality and
//! iteration are all root-color-blind):
//!
//! - the root is not recolored black after an insertion, so a red root can
//!   occur (its children are still black);
//! - replacing the value of an existing key rebuilds that node as red
//!   unconditionally, with no repair at the node itself — the balance pass
//!   of its ancestors handles any violation this introduces.

use std::cmp::Ordering;

use crate::ReferenceCounter;
use crate::comparator::Comparator;

/// The color of a red-black tree node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Color {
    Red,
    Black,
}

/// Internal node of the red-black tree.
///
/// Empty subtrees are `None` and count as black. `size` is the entry count
/// of the subtree rooted here, fixed at construction.
#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    size: usize,
    left: Option<ReferenceCounter<Self>>,
    right: Option<ReferenceCounter<Self>>,
}

impl<K, V> Node<K, V> {
    /// Creates a node, computing its size from the children.
    fn new(
        key: K,
        value: V,
        color: Color,
        left: Option<ReferenceCounter<Self>>,
        right: Option<ReferenceCounter<Self>>,
    ) -> Self {
        let size = 1 + subtree_size(left.as_ref()) + subtree_size(right.as_ref());
        Self {
            key,
            value,
            color,
            size,
            left,
            right,
        }
    }

    /// Creates a new red node with two empty children.
    fn red_leaf(key: K, value: V) -> Self {
        Self::new(key, value, Color::Red, None, None)
    }

    /// Creates a copy of this node with a new color.
    fn with_color(&self, color: Color) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            color,
            size: self.size,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }

    /// Checks if this node is red.
    fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

/// Helper function to check if an optional node is red.
fn is_red<K, V>(node: Option<&ReferenceCounter<Node<K, V>>>) -> bool {
    node.is_some_and(|node| node.is_red())
}

/// Entry count of an optional subtree.
fn subtree_size<K, V>(node: Option<&ReferenceCounter<Node<K, V>>>) -> usize {
    node.map_or(0, |node| node.size)
}

/// An ordered persistent map represented as a red-black tree.
///
/// Carries the ordering policy it was created with; the policy is shared
/// into every derived map and used only for key comparisons.
#[derive(Clone)]
pub(crate) struct OrderedMap<K, V> {
    root: Option<ReferenceCounter<Node<K, V>>>,
    comparator: Comparator<K>,
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty ordered map driven by `comparator`.
    #[inline]
    pub(crate) const fn new(comparator: Comparator<K>) -> Self {
        Self {
            root: None,
            comparator,
        }
    }

    /// Returns `true` if the tree has no entries.
    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of entries.
    ///
    /// O(1): reads the root's precomputed size field.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        subtree_size(self.root.as_ref())
    }

    /// Returns the value stored for `key`, walking the tree with the
    /// ordering policy.
    ///
    /// O(log n).
    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.get_from_node(self.root.as_ref(), key)
    }

    /// Recursive helper for get.
    fn get_from_node<'a>(
        &self,
        node: Option<&'a ReferenceCounter<Node<K, V>>>,
        key: &K,
    ) -> Option<&'a V> {
        node.and_then(|node_ref| match (self.comparator)(key, &node_ref.key) {
            Ordering::Less => self.get_from_node(node_ref.left.as_ref(), key),
            Ordering::Greater => self.get_from_node(node_ref.right.as_ref(), key),
            Ordering::Equal => Some(&node_ref.value),
        })
    }

    /// Returns `true` if the tree contains `key`.
    ///
    /// O(log n).
    pub(crate) fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Appends every key to `keys` by in-order traversal (left, node,
    /// right), which emits keys in ascending policy order.
    pub(crate) fn collect_keys(&self, keys: &mut Vec<K>)
    where
        K: Clone,
    {
        Self::collect_node(self.root.as_ref(), keys);
    }

    /// Recursive in-order helper for key collection.
    fn collect_node(node: Option<&ReferenceCounter<Node<K, V>>>, keys: &mut Vec<K>)
    where
        K: Clone,
    {
        if let Some(node_ref) = node {
            Self::collect_node(node_ref.left.as_ref(), keys);
            keys.push(node_ref.key.clone());
            Self::collect_node(node_ref.right.as_ref(), keys);
        }
    }

    /// Collects all keys and sorts them with the stored policy.
    ///
    /// The traversal already emits ascending keys; the explicit sort makes
    /// the sequence order a property of the policy alone, never of tree
    /// shape.
    pub(crate) fn sorted_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut keys = Vec::with_capacity(self.len());
        self.collect_keys(&mut keys);
        keys.sort_by(|first, second| (self.comparator)(first, second));
        keys
    }
}

impl<K: Clone, V: Clone> OrderedMap<K, V> {
    /// Inserts a key-value pair, returning the rebuilt map.
    ///
    /// The original map is unchanged; the path from the root to the
    /// insertion point is rebuilt and everything off that path is shared.
    ///
    /// O(log n).
    #[must_use]
    pub(crate) fn add(&self, key: K, value: V) -> Self {
        let new_root = self.insert_node(self.root.as_ref(), key, value);
        Self {
            root: Some(ReferenceCounter::new(new_root)),
            comparator: self.comparator,
        }
    }

    /// Recursive helper for add.
    ///
    /// A fresh key enters as a red leaf; each level on the way back up runs
    /// the one-step repair for the side it descended into. An existing key
    /// has its node rebuilt with the new entry and recolored red outright,
    /// with no repair at this level. The returned subtree root keeps
    /// whatever color these rules produce — in particular the tree root is
    /// never forced back to black.
    fn insert_node(
        &self,
        node: Option<&ReferenceCounter<Node<K, V>>>,
        key: K,
        value: V,
    ) -> Node<K, V> {
        match node {
            None => Node::red_leaf(key, value),
            Some(node_ref) => match (self.comparator)(&key, &node_ref.key) {
                Ordering::Less => {
                    let new_left = self.insert_node(node_ref.left.as_ref(), key, value);
                    let rebuilt = Node::new(
                        node_ref.key.clone(),
                        node_ref.value.clone(),
                        node_ref.color,
                        Some(ReferenceCounter::new(new_left)),
                        node_ref.right.clone(),
                    );
                    Self::balance_left(rebuilt)
                }
                Ordering::Equal => Node::new(
                    key,
                    value,
                    Color::Red,
                    node_ref.left.clone(),
                    node_ref.right.clone(),
                ),
                Ordering::Greater => {
                    let new_right = self.insert_node(node_ref.right.as_ref(), key, value);
                    let rebuilt = Node::new(
                        node_ref.key.clone(),
                        node_ref.value.clone(),
                        node_ref.color,
                        node_ref.left.clone(),
                        Some(ReferenceCounter::new(new_right)),
                    );
                    Self::balance_right(rebuilt)
                }
            },
        }
    }

    /// One-step repair after descending into the left subtree.
    ///
    /// Inspects only the left child: a red left child with a red grandchild
    /// in either slot becomes a red node with two black children via the
    /// matching rotation. Any other shape is returned unchanged.
    fn balance_left(node: Node<K, V>) -> Node<K, V> {
        // Red left child with a red outer (left-left) grandchild.
        if is_red(node.left.as_ref())
            && let Some(left) = &node.left
            && is_red(left.left.as_ref())
            && let Some(outer) = &left.left
        {
            let new_left = outer.with_color(Color::Black);
            let new_right = Node::new(
                node.key.clone(),
                node.value.clone(),
                Color::Black,
                left.right.clone(),
                node.right.clone(),
            );
            return Node::new(
                left.key.clone(),
                left.value.clone(),
                Color::Red,
                Some(ReferenceCounter::new(new_left)),
                Some(ReferenceCounter::new(new_right)),
            );
        }

        // Red left child with a red inner (left-right) grandchild.
        if is_red(node.left.as_ref())
            && let Some(left) = &node.left
            && is_red(left.right.as_ref())
            && let Some(inner) = &left.right
        {
            let new_left = Node::new(
                left.key.clone(),
                left.value.clone(),
                Color::Black,
                left.left.clone(),
                inner.left.clone(),
            );
            let new_right = Node::new(
                node.key.clone(),
                node.value.clone(),
                Color::Black,
                inner.right.clone(),
                node.right.clone(),
            );
            return Node::new(
                inner.key.clone(),
                inner.value.clone(),
                Color::Red,
                Some(ReferenceCounter::new(new_left)),
                Some(ReferenceCounter::new(new_right)),
            );
        }

        node
    }

    /// One-step repair after descending into the right subtree, the mirror
    /// image of [`balance_left`](Self::balance_left).
    fn balance_right(node: Node<K, V>) -> Node<K, V> {
        // Red right child with a red inner (right-left) grandchild.
        if is_red(node.right.as_ref())
            && let Some(right) = &node.right
            && is_red(right.left.as_ref())
            && let Some(inner) = &right.left
        {
            let new_left = Node::new(
                node.key.clone(),
                node.value.clone(),
                Color::Black,
                node.left.clone(),
                inner.left.clone(),
            );
            let new_right = Node::new(
                right.key.clone(),
                right.value.clone(),
                Color::Black,
                inner.right.clone(),
                right.right.clone(),
            );
            return Node::new(
                inner.key.clone(),
                inner.value.clone(),
                Color::Red,
                Some(ReferenceCounter::new(new_left)),
                Some(ReferenceCounter::new(new_right)),
            );
        }

        // Red right child with a red outer (right-right) grandchild.
        if is_red(node.right.as_ref())
            && let Some(right) = &node.right
            && is_red(right.right.as_ref())
            && let Some(outer) = &right.right
        {
            let new_left = Node::new(
                node.key.clone(),
                node.value.clone(),
                Color::Black,
                node.left.clone(),
                right.left.clone(),
            );
            let new_right = outer.with_color(Color::Black);
            return Node::new(
                right.key.clone(),
                right.value.clone(),
                Color::Red,
                Some(ReferenceCounter::new(new_left)),
                Some(ReferenceCounter::new(new_right)),
            );
        }

        node
    }

    /// Rebuilds the tree with identical shape, colors and sizes, replacing
    /// each value with `visit(&key, &value)`. Entries are visited in
    /// ascending key order.
    #[must_use]
    pub(crate) fn accept<F>(&self, visit: &mut F) -> Self
    where
        F: FnMut(&K, &V) -> V,
    {
        Self {
            root: Self::accept_node(self.root.as_ref(), visit),
            comparator: self.comparator,
        }
    }

    /// Recursive helper for accept.
    fn accept_node<F>(
        node: Option<&ReferenceCounter<Node<K, V>>>,
        visit: &mut F,
    ) -> Option<ReferenceCounter<Node<K, V>>>
    where
        F: FnMut(&K, &V) -> V,
    {
        node.map(|node_ref| {
            let left = Self::accept_node(node_ref.left.as_ref(), visit);
            let value = visit(&node_ref.key, &node_ref.value);
            let right = Self::accept_node(node_ref.right.as_ref(), visit);
            ReferenceCounter::new(Node {
                key: node_ref.key.clone(),
                value,
                color: node_ref.color,
                size: node_ref.size,
                left,
                right,
            })
        })
    }
}
