//! Dynamic keyed records and the key sets that project them.

use std::collections::BTreeMap;
use std::fmt;

use smallvec::SmallVec;

use crate::projection::{MirrorTarget, Projection};

/// Ordered `(key, value)` pairs carried by a keyed mirror request. `None`
/// marks a tracked key absent from the parent.
pub type Pairs<K, V> = SmallVec<[(K, Option<V>); 4]>;

/// Immutable-by-convention keyed state record.
#[derive(Clone, PartialEq, Eq)]
pub struct Record<K: Ord, V> {
    entries: BTreeMap<K, V>,
}

impl<K: Ord, V> Record<K, V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Builder-style insert for constructing snapshots.
    pub fn with(mut self, key: K, value: V) -> Self {
        self.entries.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }
}

impl<K: Ord, V> Default for Record<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for Record<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for Record<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Carried pairs are compared one by one; absent keys compare as `None`.
impl<K, V> MirrorTarget<Pairs<K, V>> for Record<K, V>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    fn differs(&self, slice: &Pairs<K, V>) -> bool {
        slice
            .iter()
            .any(|(key, value)| self.get(key) != value.as_ref())
    }

    fn merged(&self, slice: &Pairs<K, V>) -> Self {
        let mut next = self.clone();
        for (key, value) in slice {
            match value {
                Some(value) => {
                    next.insert(key.clone(), value.clone());
                }
                None => {
                    next.remove(key);
                }
            }
        }
        next
    }
}

/// Ordered list of parent keys to mirror, fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySet<K> {
    keys: SmallVec<[K; 4]>,
}

impl<K> KeySet<K> {
    pub fn new<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            keys: SmallVec::new(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.keys.iter()
    }
}

impl<K> Default for KeySet<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K, V> Projection<Record<K, V>> for KeySet<K>
where
    K: Ord + Clone + Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    type Slice = Pairs<K, V>;

    fn project(&self, parent: &Record<K, V>) -> Self::Slice {
        self.keys
            .iter()
            .map(|key| (key.clone(), parent.get(key).cloned()))
            .collect()
    }
}
