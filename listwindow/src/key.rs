//! Item identity. Heights, selection, and per-row state are keyed by item id, never by index,
//! so reordering a list cannot attach one row's height to another.

#[cfg(not(feature = "std"))]
use alloc::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "std")]
use std::collections::{HashMap, HashSet};

/// Bounds on an item id: hashable with `std` (ordered without), and cloneable into row state.
#[cfg(feature = "std")]
pub trait ItemKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> ItemKey for K {}

#[cfg(not(feature = "std"))]
pub trait ItemKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> ItemKey for K {}

#[cfg(feature = "std")]
pub type KeyMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub type KeyMap<K, V> = BTreeMap<K, V>;

/// A set of item ids, e.g. the caller-owned selection.
#[cfg(feature = "std")]
pub type KeySet<K> = HashSet<K>;
#[cfg(not(feature = "std"))]
pub type KeySet<K> = BTreeSet<K>;
