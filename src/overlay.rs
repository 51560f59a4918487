//! Unordered overlay-chain map representation.
//!
//! An overlay map is a linked chain of entries in which each `add` prepends
//! a new entry in front of the existing chain. An older entry for the same
//! key is *shadowed*, not removed: lookups stop at the nearest entry, while
//! the shadowed one stays physically present deeper in the chain.
//!
//! The chain behind a new entry is shared with every map the entry was
//! derived from, so `add` is O(1) in time and space. The price is paid on
//! the reading side: lookups walk the chain, and counting distinct keys has
//! to rescan the remainder of the chain for every entry.
//!
//! Chains grow one entry per `add` with no balancing, so their depth is
//! O(n). All walks below are therefore iterative; recursing here could
//! exhaust the call stack on long chains.

use crate::ReferenceCounter;

/// Entry node of the overlay chain.
///
/// `rest` is the entire remainder of the chain. It is never mutated and may
/// be shared by arbitrarily many other maps.
struct Entry<K, V> {
    key: K,
    value: V,
    rest: Option<ReferenceCounter<Self>>,
}

/// An unordered persistent map represented as a shadowing entry chain.
#[derive(Clone)]
pub(crate) struct OverlayMap<K, V> {
    head: Option<ReferenceCounter<Entry<K, V>>>,
}

impl<K, V> OverlayMap<K, V> {
    /// Creates an empty overlay map.
    #[inline]
    pub(crate) const fn new() -> Self {
        Self { head: None }
    }

    /// Returns `true` if the chain has no entries at all.
    ///
    /// An overlay map without entries cannot contain keys, so this agrees
    /// with the distinct-key count being zero.
    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Prepends an entry, shadowing any older entry for the same key.
    ///
    /// O(1); the existing chain is shared, not copied.
    #[must_use]
    pub(crate) fn add(&self, key: K, value: V) -> Self {
        Self {
            head: Some(ReferenceCounter::new(Entry {
                key,
                value,
                rest: self.head.clone(),
            })),
        }
    }
}

impl<K, V> Drop for OverlayMap<K, V> {
    /// Unwinds the chain iteratively.
    ///
    /// Chains are O(n) deep; the compiler-generated drop would recurse once
    /// per entry and overflow the stack on long chains. Entries still shared
    /// with other maps are left alone — whichever map drops them last will
    /// unwind the remainder the same way.
    fn drop(&mut self) {
        let mut current = self.head.take();
        while let Some(entry) = current {
            match ReferenceCounter::try_unwrap(entry) {
                Ok(mut entry) => current = entry.rest.take(),
                Err(_) => break,
            }
        }
    }
}

impl<K: PartialEq, V> OverlayMap<K, V> {
    /// Walks a chain looking for `key`.
    fn chain_contains(mut current: Option<&ReferenceCounter<Entry<K, V>>>, key: &K) -> bool {
        while let Some(entry) = current {
            if entry.key == *key {
                return true;
            }
            current = entry.rest.as_ref();
        }
        false
    }

    /// Returns `true` if any entry in the chain carries `key`.
    ///
    /// O(depth).
    pub(crate) fn contains_key(&self, key: &K) -> bool {
        Self::chain_contains(self.head.as_ref(), key)
    }

    /// Returns the value of the nearest (most recently added) entry for
    /// `key`, or `None` if no entry carries it.
    ///
    /// O(depth).
    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        let mut current = self.head.as_ref();
        while let Some(entry) = current {
            if entry.key == *key {
                return Some(&entry.value);
            }
            current = entry.rest.as_ref();
        }
        None
    }

    /// Counts distinct keys in the chain.
    ///
    /// An entry counts only if its key does not occur again deeper in the
    /// chain, so every entry triggers a rescan of its own remainder. That
    /// makes this O(n²) over the chain length in the worst case — a known
    /// cost of the overlay representation, paid for the O(1) `add`.
    pub(crate) fn len(&self) -> usize {
        let mut count = 0;
        let mut current = self.head.as_ref();
        while let Some(entry) = current {
            if !Self::chain_contains(entry.rest.as_ref(), &entry.key) {
                count += 1;
            }
            current = entry.rest.as_ref();
        }
        count
    }

    /// Appends every distinct key to `keys`.
    ///
    /// Each key is emitted exactly once, at its deepest occurrence: an entry
    /// whose key occurs again deeper in the chain is skipped, exactly as in
    /// [`len`](Self::len). The emission order is an artifact of the chain
    /// and carries no meaning for an unordered map.
    pub(crate) fn collect_keys(&self, keys: &mut Vec<K>)
    where
        K: Clone,
    {
        let mut current = self.head.as_ref();
        while let Some(entry) = current {
            if !Self::chain_contains(entry.rest.as_ref(), &entry.key) {
                keys.push(entry.key.clone());
            }
            current = entry.rest.as_ref();
        }
    }
}
