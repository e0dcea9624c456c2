use std::collections::HashSet;
use std::ops::{BitAnd, BitOr};

use smallvec::SmallVec;

use crate::term::TermId;

/// A set of [`TermId`]s representing a group of terms
///
/// Each term can occur only once in the group and the group is always
/// sorted, which makes `contains` a binary search.
///
/// This group is used e.g. for having a set of parent, child or ancestor terms
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TermGroup {
    ids: SmallVec<[TermId; 8]>,
}

impl TermGroup {
    /// Constructs a new, empty [`TermGroup`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`TermGroup`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: SmallVec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no [`TermId`]s
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`TermId`]s in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`TermId`] to the group
    ///
    /// Returns whether the `TermId` was newly inserted. That is:
    ///
    /// - If the group did not previously contain this `TermId`, true is returned.
    /// - If the group already contained this `TermId`, false is returned.
    pub fn insert(&mut self, id: TermId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Returns `true` if the group contains the [`TermId`]
    pub fn contains(&self, id: &TermId) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    /// Returns an Iterator of the [`TermId`]s inside the group
    pub fn iter(&self) -> TermIds<'_> {
        TermIds {
            inner: self.ids.iter(),
        }
    }
}

impl From<HashSet<TermId>> for TermGroup {
    fn from(s: HashSet<TermId>) -> Self {
        s.into_iter().collect()
    }
}

impl FromIterator<TermId> for TermGroup {
    fn from_iter<T: IntoIterator<Item = TermId>>(iter: T) -> Self {
        let mut group = TermGroup::new();
        for id in iter {
            group.insert(id);
        }
        group
    }
}

impl<'a> IntoIterator for &'a TermGroup {
    type Item = &'a TermId;
    type IntoIter = TermIds<'a>;

    fn into_iter(self) -> TermIds<'a> {
        self.iter()
    }
}

impl IntoIterator for TermGroup {
    type Item = TermId;
    type IntoIter = smallvec::IntoIter<[TermId; 8]>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

/// An iterator over [`TermId`]s
pub struct TermIds<'a> {
    inner: std::slice::Iter<'a, TermId>,
}

impl<'a> Iterator for TermIds<'a> {
    type Item = &'a TermId;
    fn next(&mut self) -> Option<&'a TermId> {
        self.inner.next()
    }
}

impl BitOr for &TermGroup {
    type Output = TermGroup;

    fn bitor(self, rhs: &TermGroup) -> TermGroup {
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut group = large.clone();
        for id in &small.ids {
            group.insert(id.clone());
        }
        group
    }
}

impl BitAnd for &TermGroup {
    type Output = TermGroup;

    fn bitand(self, rhs: &TermGroup) -> TermGroup {
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };

        let mut group = TermGroup::with_capacity(small.len());
        for id in &small.ids {
            if large.contains(id) {
                // `small` is sorted, pushing keeps the order intact
                group.ids.push(id.clone());
            }
        }
        group
    }
}
