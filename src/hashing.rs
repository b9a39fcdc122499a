//! This module provides a deterministic hasher and `HashMap` and `HashSet` variants that use
//! it. The hashing data structures in the standard library are not deterministic:
//!
//! > By default, HashMap uses a hashing algorithm selected to provide
//! > resistance against HashDoS attacks. The algorithm is randomly seeded, and a
//! > reasonable best-effort is made to generate this seed from a high quality,
//! > secure source of randomness provided by the host without blocking the program.
//!
//! The registry is an in-process configuration table, not an attack surface, so we
//! trade HashDoS resistance for deterministic iteration, which keeps log output and
//! test failures reproducible across runs.
//!
//! `HashMap<K, V, S>` does not have a `new` method for a non-default hasher; use
//! `HashMap::default()` to create an empty map.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type HashSet<T> = rustc_hash::FxHashSet<T>;

/// A convenience method to compute the hash of any `T: Hash`.
#[must_use]
pub fn hash_one<T: Hash>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}
