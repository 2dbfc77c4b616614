use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    borrow::Borrow,
    iter::FromIterator,
    ops::{Deref, Index},
    slice::{Iter, SliceIndex},
};

/// A small set which remembers insertion order. Lookups are linear, which is fine for the handful
/// of cards a player picks per round.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VecSet<T> {
    inner: Vec<T>,
}

impl<T> VecSet<T> {
    pub fn new() -> Self {
        VecSet { inner: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.inner.iter()
    }
}

impl<T: Eq> VecSet<T> {
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.inner.iter().any(|v| v.borrow() == value)
    }

    /// Appends `value` unless it's already present. Returns whether the set changed.
    pub fn insert(&mut self, value: T) -> bool {
        if self.inner.contains(&value) {
            return false;
        }

        self.inner.push(value);
        true
    }

    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        Some(
            self.inner
                .remove(self.inner.iter().position(|v| v.borrow() == value)?),
        )
    }

    pub fn retain<F>(&mut self, f: F)
    where F: FnMut(&T) -> bool {
        self.inner.retain(f);
    }
}

impl<T> Default for VecSet<T> {
    fn default() -> Self {
        VecSet::new()
    }
}

impl<T> Deref for VecSet<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.inner)
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for VecSet<T> {
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        Index::index(&self.inner, index)
    }
}

impl<T: Eq> FromIterator<T> for VecSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = VecSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<T: Eq> Extend<T> for VecSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a VecSet<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<T> IntoIterator for VecSet<T> {
    type IntoIter = std::vec::IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<T: Serialize> Serialize for VecSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        self.inner.serialize(serializer)
    }
}

// Duplicates in a stored document are dropped rather than rejected
impl<'de, T: Deserialize<'de> + Eq> Deserialize<'de> for VecSet<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de> {
        let values: Vec<T> = Deserialize::deserialize(deserializer)?;
        Ok(values.into_iter().collect())
    }
}
