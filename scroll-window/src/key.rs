#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Map keyed by datum identity: `HashMap` with `std`, `BTreeMap` without.
#[cfg(feature = "std")]
pub type IdentityMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub type IdentityMap<K, V> = BTreeMap<K, V>;

/// Bound for datum identities returned by the caller's identity function.
#[cfg(feature = "std")]
pub trait IdentityKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> IdentityKey for K {}

#[cfg(not(feature = "std"))]
pub trait IdentityKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> IdentityKey for K {}
