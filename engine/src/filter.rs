//! Key filters restricting which fields take part in a call.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::BuildHasher;

/// A set of field keys. Only membership is ever asked.
pub trait KeySet {
    fn contains_key(&self, key: &str) -> bool;
}

impl<V, S: BuildHasher> KeySet for HashMap<String, V, S> {
    fn contains_key(&self, key: &str) -> bool {
        HashMap::contains_key(self, key)
    }
}

impl<V> KeySet for BTreeMap<String, V> {
    fn contains_key(&self, key: &str) -> bool {
        BTreeMap::contains_key(self, key)
    }
}

impl<S: BuildHasher> KeySet for HashSet<String, S> {
    fn contains_key(&self, key: &str) -> bool {
        self.contains(key)
    }
}

impl KeySet for BTreeSet<String> {
    fn contains_key(&self, key: &str) -> bool {
        self.contains(key)
    }
}

/// The keys of a decoded JSON object, e.g. the body of a PATCH request.
impl KeySet for serde_json::Map<String, serde_json::Value> {
    fn contains_key(&self, key: &str) -> bool {
        serde_json::Map::contains_key(self, key)
    }
}

impl<T: AsRef<str>> KeySet for Vec<T> {
    fn contains_key(&self, key: &str) -> bool {
        self.iter().any(|k| k.as_ref() == key)
    }
}

impl<T: AsRef<str>, const N: usize> KeySet for [T; N] {
    fn contains_key(&self, key: &str) -> bool {
        self.iter().any(|k| k.as_ref() == key)
    }
}

/// Which keyed fields a call considers.
#[derive(Clone, Copy, Default)]
pub enum KeyFilter<'a> {
    /// Every keyed field
    #[default]
    All,
    /// Only fields whose key is in the set. An empty set selects nothing.
    Only(&'a dyn KeySet),
}

impl KeyFilter<'_> {
    pub fn contains(&self, key: &str) -> bool {
        match self {
            KeyFilter::All => true,
            KeyFilter::Only(keys) => keys.contains_key(key),
        }
    }
}

impl fmt::Debug for KeyFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyFilter::All => write!(f, "All"),
            KeyFilter::Only(_) => write!(f, "Only(..)"),
        }
    }
}

impl<'a, K: KeySet> From<&'a K> for KeyFilter<'a> {
    fn from(keys: &'a K) -> Self {
        KeyFilter::Only(keys)
    }
}

impl<'a, K: KeySet> From<Option<&'a K>> for KeyFilter<'a> {
    fn from(keys: Option<&'a K>) -> Self {
        match keys {
            Some(keys) => KeyFilter::Only(keys),
            None => KeyFilter::All,
        }
    }
}
