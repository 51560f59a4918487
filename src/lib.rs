//! # permap
//!
//! Persistent (immutable) associative maps with two interchangeable internal
//! representations behind a single facade type.
//!
//! ## Overview
//!
//! [`PersistentMap`] is an immutable map value: every update returns a new
//! map and the original is never modified. Structural sharing keeps updates
//! cheap — derived maps share their unchanged interior with the maps they
//! were derived from.
//!
//! The representation is chosen at construction time:
//!
//! - [`PersistentMap::new`] builds an **overlay map**: an association chain
//!   where each `add` prepends a possibly-shadowing entry in O(1).
//! - [`PersistentMap::ordered_by`] (or [`PersistentMap::ordered`] for
//!   `K: Ord`) builds an **ordered map**: a persistent red-black tree keyed
//!   by a caller-supplied total order, with O(log n) updates and lookups.
//!
//! Both representations satisfy the same contract and compare equal whenever
//! their logical contents match, regardless of how either was built:
//!
//! ```rust
//! use permap::PersistentMap;
//!
//! let overlay = PersistentMap::new().add(1, "one").add(2, "two");
//! let ordered = PersistentMap::ordered().add(2, "two").add(1, "one");
//!
//! assert_eq!(overlay, ordered);
//! assert_eq!(ordered.keys().collect::<Vec<_>>(), vec![1, 2]);
//! ```
//!
//! ## Feature Flags
//!
//! - `arc`: share map interiors with `Arc` instead of `Rc`, making maps
//!   usable across threads
//! - `serde`: `Serialize`/`Deserialize` support for [`PersistentMap`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod comparator;
mod error;
mod keys;
mod map;
mod ordered;
mod overlay;

pub use comparator::Comparator;
pub use error::KeyNotFound;
pub use keys::Keys;
pub use map::PersistentMap;
