//! The persistent map facade.
//!
//! [`PersistentMap`] hides the two internal representations behind one
//! operation set. Everything cross-cutting — equality, hashing, display,
//! iteration, the value transform — is implemented on top of that shared
//! operation set alone, never by inspecting representation internals, which
//! is what makes maps of different representations mutually comparable and
//! substitutable.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use crate::comparator::{self, Comparator};
use crate::error::KeyNotFound;
use crate::keys::Keys;
use crate::ordered::OrderedMap;
use crate::overlay::OverlayMap;

/// The two interchangeable representations behind the facade.
#[derive(Clone)]
enum Repr<K, V> {
    /// Unordered shadowing entry chain.
    Overlay(OverlayMap<K, V>),
    /// Red-black tree driven by a caller-supplied ordering policy.
    Ordered(OrderedMap<K, V>),
}

/// A persistent (immutable) associative map.
///
/// A `PersistentMap` is a value: [`add`](Self::add) returns a new map and
/// never modifies the receiver, and any number of derived maps share their
/// unchanged interior with the maps they came from. Cloning a map copies
/// pointers, not contents.
///
/// The representation is fixed at construction time:
///
/// - [`new`](Self::new) builds an **overlay map** — an association chain
///   with O(1) `add`, linear lookups, and a size count that must skip
///   shadowed entries;
/// - [`ordered_by`](Self::ordered_by) / [`ordered`](Self::ordered) build an
///   **ordered map** — a persistent red-black tree with O(log n) `add` and
///   lookups, O(1) size, and sorted key iteration.
///
/// Both representations satisfy the same contract; equality, hashing and
/// iteration are defined on logical contents, so maps of either
/// representation (or trees with different ordering policies) compare equal
/// whenever their contents match.
///
/// # Time Complexity
///
/// | Operation      | Overlay          | Ordered     |
/// |----------------|------------------|-------------|
/// | `add`          | O(1)             | O(log n)    |
/// | `get`          | O(depth)         | O(log n)    |
/// | `contains_key` | O(depth)         | O(log n)    |
/// | `len`          | O(n²) worst case | O(1)        |
/// | `keys`         | O(n²) worst case | O(n log n)  |
///
/// The overlay `len` cost is real: counting distinct keys rescans the
/// remainder of the chain for every entry. It is the price of the O(1)
/// `add`.
///
/// # Examples
///
/// ```rust
/// use permap::PersistentMap;
///
/// let map = PersistentMap::new()
///     .add(1, "Alice")
///     .add(2, "Bob")
///     .add(3, "Carol");
///
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.get(&2), Ok(&"Bob"));
/// assert!(!map.contains_key(&4));
/// ```
#[derive(Clone)]
pub struct PersistentMap<K, V> {
    repr: Repr<K, V>,
}

impl<K, V> PersistentMap<K, V> {
    /// Creates an empty unordered (overlay) map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permap::PersistentMap;
    ///
    /// let map: PersistentMap<i32, String> = PersistentMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            repr: Repr::Overlay(OverlayMap::new()),
        }
    }

    /// Creates an empty ordered map driven by `comparator`.
    ///
    /// The policy is assumed to be a valid strict total order over keys and
    /// is not validated; it is shared into every map derived from this one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permap::PersistentMap;
    ///
    /// let map = PersistentMap::ordered_by(|a: &i32, b: &i32| b.cmp(a))
    ///     .add(1, "a")
    ///     .add(3, "c")
    ///     .add(2, "b");
    ///
    /// let keys: Vec<i32> = map.keys().collect();
    /// assert_eq!(keys, vec![3, 2, 1]);
    /// ```
    #[inline]
    #[must_use]
    pub const fn ordered_by(comparator: Comparator<K>) -> Self {
        Self {
            repr: Repr::Ordered(OrderedMap::new(comparator)),
        }
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permap::PersistentMap;
    ///
    /// let empty: PersistentMap<i32, &str> = PersistentMap::new();
    /// assert!(empty.is_empty());
    /// assert!(!empty.add(1, "one").is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match &self.repr {
            Repr::Overlay(chain) => chain.is_empty(),
            Repr::Ordered(tree) => tree.is_empty(),
        }
    }
}

impl<K: Ord, V> PersistentMap<K, V> {
    /// Creates an empty ordered map using the natural order of `K`.
    ///
    /// Shorthand for `ordered_by` with `K::cmp`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permap::PersistentMap;
    ///
    /// let map = PersistentMap::ordered().add(3, "c").add(1, "a").add(2, "b");
    /// let keys: Vec<i32> = map.keys().collect();
    /// assert_eq!(keys, vec![1, 2, 3]);
    /// ```
    #[inline]
    #[must_use]
    pub fn ordered() -> Self {
        Self::ordered_by(comparator::natural)
    }
}

impl<K: Clone + PartialEq, V: Clone> PersistentMap<K, V> {
    /// Returns a new map that additionally associates `key` with `value`.
    ///
    /// The receiver is unchanged. If the key is already present, the new
    /// map yields the new value for it and the size stays the same;
    /// otherwise the size grows by exactly one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permap::PersistentMap;
    ///
    /// let map1 = PersistentMap::new().add(1, "one");
    /// let map2 = map1.add(1, "ONE");
    ///
    /// assert_eq!(map1.get(&1), Ok(&"one")); // Original unchanged
    /// assert_eq!(map2.get(&1), Ok(&"ONE")); // New version
    /// ```
    #[must_use]
    pub fn add(&self, key: K, value: V) -> Self {
        match &self.repr {
            Repr::Overlay(chain) => Self {
                repr: Repr::Overlay(chain.add(key, value)),
            },
            Repr::Ordered(tree) => Self {
                repr: Repr::Ordered(tree.add(key, value)),
            },
        }
    }

    /// Returns the number of distinct keys in the map.
    ///
    /// O(1) for an ordered map. For an overlay map this walks the whole
    /// chain and rescans it per entry to skip shadowed duplicates — O(n²)
    /// over the chain length in the worst case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permap::PersistentMap;
    ///
    /// let map = PersistentMap::new().add(1, "X").add(1, "Y");
    /// assert_eq!(map.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Overlay(chain) => chain.len(),
            Repr::Ordered(tree) => tree.len(),
        }
    }

    /// Returns `true` if the map contains `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permap::PersistentMap;
    ///
    /// let map = PersistentMap::new().add(1, "one");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        match &self.repr {
            Repr::Overlay(chain) => chain.contains_key(key),
            Repr::Ordered(tree) => tree.contains_key(key),
        }
    }

    /// Returns the value associated with `key`.
    ///
    /// For an overlay map with shadowed entries this is the most recently
    /// added value.
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFound`] if the map does not contain `key` — in
    /// particular, every lookup on an empty map fails. Guard with
    /// [`contains_key`](Self::contains_key) or handle the error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permap::{KeyNotFound, PersistentMap};
    ///
    /// let map = PersistentMap::new().add(2, "Bob");
    /// assert_eq!(map.get(&2), Ok(&"Bob"));
    /// assert_eq!(map.get(&4), Err(KeyNotFound));
    /// ```
    pub fn get(&self, key: &K) -> Result<&V, KeyNotFound> {
        match &self.repr {
            Repr::Overlay(chain) => chain.get(key).ok_or(KeyNotFound),
            Repr::Ordered(tree) => tree.get(key).ok_or(KeyNotFound),
        }
    }

    /// Returns an iterator over the map's keys, each exactly once.
    ///
    /// The key domain is materialized eagerly: for an ordered map the
    /// sequence is sorted with the map's ordering policy; for an overlay
    /// map the order is unspecified. Every call produces a brand-new,
    /// independent one-shot sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permap::PersistentMap;
    ///
    /// let map = PersistentMap::ordered().add(3, "C").add(1, "A").add(2, "B");
    /// let keys: Vec<i32> = map.keys().collect();
    /// assert_eq!(keys, vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn keys(&self) -> Keys<K> {
        match &self.repr {
            Repr::Overlay(chain) => {
                let mut keys = Vec::new();
                chain.collect_keys(&mut keys);
                Keys::new(keys)
            }
            Repr::Ordered(tree) => Keys::new(tree.sorted_keys()),
        }
    }

    /// Applies a visitor to every entry, producing a new map with the same
    /// keys, representation and ordering policy, and each value replaced by
    /// `visit(&key, &value)`.
    ///
    /// An ordered map is rebuilt node for node with identical shape and
    /// colors. An overlay map is folded into a fresh chain through its own
    /// key iterator, so shadowed duplicates in the source are normalized
    /// away.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use permap::PersistentMap;
    ///
    /// let map = PersistentMap::new().add(1, 10).add(2, 20);
    /// let shifted = map.accept(|key, value| value + key);
    ///
    /// assert_eq!(shifted.get(&1), Ok(&11));
    /// assert_eq!(shifted.get(&2), Ok(&22));
    /// assert_eq!(map.get(&1), Ok(&10)); // Original unchanged
    /// ```
    #[must_use]
    pub fn accept<F>(&self, mut visit: F) -> Self
    where
        F: FnMut(&K, &V) -> V,
    {
        match &self.repr {
            Repr::Ordered(tree) => Self {
                repr: Repr::Ordered(tree.accept(&mut visit)),
            },
            Repr::Overlay(_) => {
                let mut result = Self::new();
                for key in self.keys() {
                    if let Ok(value) = self.get(&key) {
                        let transformed = visit(&key, value);
                        result = result.add(key, transformed);
                    }
                }
                result
            }
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for PersistentMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + PartialEq, V: Clone> FromIterator<(K, V)> for PersistentMap<K, V> {
    /// Folds the pairs into an unordered map; later pairs win on key
    /// collisions.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map = map.add(key, value);
        }
        map
    }
}

impl<'a, K: Clone + PartialEq, V: Clone> IntoIterator for &'a PersistentMap<K, V> {
    type Item = K;
    type IntoIter = Keys<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}

impl<K: Clone + PartialEq, V: Clone + PartialEq> PartialEq for PersistentMap<K, V> {
    /// Structural equality over logical contents.
    ///
    /// Two maps are equal iff each contains every key of the other and the
    /// values stored for every shared key compare equal. Only the shared
    /// operation set is consulted, so the result is independent of
    /// representation: an overlay map, a tree map, and trees built with
    /// different ordering policies all compare equal when their contents
    /// match.
    fn eq(&self, other: &Self) -> bool {
        for key in self.keys() {
            if !other.contains_key(&key) {
                return false;
            }
        }
        for key in other.keys() {
            if !self.contains_key(&key) {
                return false;
            }
        }
        // Both key sets match; compare the values they map to.
        self.keys().all(|key| match (self.get(&key), other.get(&key)) {
            (Ok(mine), Ok(theirs)) => mine == theirs,
            _ => false,
        })
    }
}

impl<K: Clone + Eq, V: Clone + Eq> Eq for PersistentMap<K, V> {}

/// Hashes one entry component with the standard hasher, which uses fixed
/// keys and therefore produces stable hashes for equal components.
fn hash_component<T: Hash>(component: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    component.hash(&mut hasher);
    hasher.finish()
}

impl<K: Clone + PartialEq + Hash, V: Clone + Hash> Hash for PersistentMap<K, V> {
    /// Computes an order-independent hash of the map's contents.
    ///
    /// Each entry contributes `7·h(key) + 47·h(value)` to a wrapping sum.
    /// Addition commutes, so the result does not depend on iteration order,
    /// and equal maps — of either representation — hash equally.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sum: u64 = 0;
        for key in self.keys() {
            if let Ok(value) = self.get(&key) {
                sum = sum
                    .wrapping_add(hash_component(&key).wrapping_mul(7))
                    .wrapping_add(hash_component(value).wrapping_mul(47));
            }
        }
        state.write_u64(sum);
    }
}

impl<K: Clone + PartialEq, V: Clone> fmt::Display for PersistentMap<K, V> {
    /// Formats the map as the fixed diagnostic string
    /// `{...(<N> entries)...}` where `N` is the number of distinct keys.
    /// Entries are never enumerated; use `Debug` ( `{:?}` ) for that.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{...({} entries)...}}", self.len())
    }
}

impl<K: Clone + PartialEq + fmt::Debug, V: Clone + fmt::Debug> fmt::Debug for PersistentMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = formatter.debug_map();
        for key in self.keys() {
            if let Ok(value) = self.get(&key) {
                map.entry(&key, value);
            }
        }
        map.finish()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for PersistentMap<K, V>
where
    K: serde::Serialize + Clone + PartialEq,
    V: serde::Serialize + Clone,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for key in self.keys() {
            if let Ok(value) = self.get(&key) {
                map.serialize_entry(&key, value)?;
            }
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentMapVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> PersistentMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for PersistentMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + PartialEq,
    V: serde::Deserialize<'de> + Clone,
{
    type Value = PersistentMap<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = PersistentMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map = map.add(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for PersistentMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + PartialEq,
    V: serde::Deserialize<'de> + Clone,
{
    /// Deserializes into an unordered (overlay) map: an ordering policy is
    /// code and cannot come off the wire.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentMapVisitor::new())
    }
}

// =============================================================================
// Send/Sync expectations
// =============================================================================

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentMap<i32, String>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentMap<i32, String>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
