//! Error types for map lookups.

/// The error returned by a failed lookup.
///
/// [`PersistentMap::get`](crate::PersistentMap::get) returns this for a key
/// the map does not contain — including every lookup on an empty map. The
/// lookup itself is the only failing operation; callers either guard with
/// [`contains_key`](crate::PersistentMap::contains_key) or handle the error.
///
/// # Examples
///
/// ```rust
/// use permap::{KeyNotFound, PersistentMap};
///
/// let map = PersistentMap::new().add(1, "one");
/// assert_eq!(map.get(&2), Err(KeyNotFound));
/// assert_eq!(format!("{}", KeyNotFound), "key not found in map");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNotFound;

impl std::fmt::Display for KeyNotFound {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "key not found in map")
    }
}

impl std::error::Error for KeyNotFound {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_not_found_display() {
        assert_eq!(format!("{KeyNotFound}"), "key not found in map");
    }

    #[test]
    fn test_key_not_found_is_error() {
        let error: Box<dyn std::error::Error> = Box::new(KeyNotFound);
        assert_eq!(error.to_string(), "key not found in map");
    }
}
