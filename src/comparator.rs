//! Caller-supplied key-ordering policies.

use std::cmp::Ordering;

/// A caller-supplied total order over keys.
///
/// An ordered [`PersistentMap`](crate::PersistentMap) stores the policy it
/// was created with and shares it into every map derived from it. The policy
/// drives key comparisons only; it takes no part in equality or hashing of
/// the maps themselves, so two maps with equal contents but different
/// policies still compare equal.
///
/// Non-capturing closures coerce to this type:
///
/// ```rust
/// use permap::PersistentMap;
///
/// let descending = PersistentMap::ordered_by(|a: &i32, b: &i32| b.cmp(a));
/// let keys: Vec<i32> = descending.add(1, "a").add(2, "b").keys().collect();
/// assert_eq!(keys, vec![2, 1]);
/// ```
///
/// The function is assumed to be a valid strict total order. The map does
/// not validate it; a malformed policy yields unspecified tree structure,
/// not a detected error.
pub type Comparator<K> = fn(&K, &K) -> Ordering;

/// The natural ascending order of `K`.
pub(crate) fn natural<K: Ord>(first: &K, second: &K) -> Ordering {
    first.cmp(second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_natural_order() {
        assert_eq!(natural(&1, &2), Ordering::Less);
        assert_eq!(natural(&2, &2), Ordering::Equal);
        assert_eq!(natural(&3, &2), Ordering::Greater);
    }

    #[rstest]
    fn test_closures_coerce_to_comparators() {
        let descending: Comparator<i32> = |a, b| b.cmp(a);
        assert_eq!(descending(&1, &2), Ordering::Greater);
    }
}
