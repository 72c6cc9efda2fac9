//! Ordered unique collections for transitive dependency aggregation.
//!
//! Link-time resolution is order-sensitive, so the aggregate sets built by
//! the dependency collector must be deterministic. A `TransitiveSet` keeps
//! first-insertion order and rejects duplicates, which makes every union
//! reproducible regardless of how the host schedules target evaluation.

use std::collections::HashSet;
use std::hash::Hash;

/// An insertion-ordered, deduplicating set.
///
/// Two merge strategies are exposed:
/// - [`TransitiveSet::merge_topological`] for order-sensitive unions, where
///   a child's elements must precede the uniting target's own additions
///   (the transitive dynamic-library set);
/// - [`TransitiveSet::merge`] for order-insensitive unions, which stay
///   deterministic because callers insert in declaration order.
#[derive(Debug, Clone)]
pub struct TransitiveSet<T> {
    items: Vec<T>,
    index: HashSet<T>,
}

impl<T: Clone + Eq + Hash> TransitiveSet<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        TransitiveSet {
            items: Vec::new(),
            index: HashSet::new(),
        }
    }

    /// Insert an element, keeping the first occurrence's position.
    ///
    /// Returns `true` if the element was not already present.
    pub fn insert(&mut self, item: T) -> bool {
        if self.index.contains(&item) {
            return false;
        }
        self.index.insert(item.clone());
        self.items.push(item);
        true
    }

    /// Union another set into this one, preserving the other set's relative
    /// order ahead of any later insertions.
    ///
    /// Callers must merge every child set before inserting the uniting
    /// target's own elements; the result is then topological.
    pub fn merge_topological(&mut self, other: &TransitiveSet<T>) {
        for item in &other.items {
            self.insert(item.clone());
        }
    }

    /// Union another set into this one where element order carries no
    /// meaning. Duplicates are dropped; first-seen order is kept so the
    /// result is still deterministic.
    pub fn merge(&mut self, other: &TransitiveSet<T>) {
        for item in &other.items {
            self.insert(item.clone());
        }
    }

    /// Whether the element is already present.
    pub fn contains(&self, item: &T) -> bool {
        self.index.contains(item)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Number of distinct elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// View the elements as a slice, in insertion order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone + Eq + Hash> Default for TransitiveSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> FromIterator<T> for TransitiveSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = TransitiveSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<T> IntoIterator for TransitiveSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a TransitiveSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
