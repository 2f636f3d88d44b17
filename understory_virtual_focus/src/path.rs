// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus paths: one key per open level, root first.

use core::fmt;

use smallvec::SmallVec;

/// Key stored at one depth of a [`FocusPath`].
///
/// A key is only meaningful relative to the level it sits at: `Index(2)` at
/// depth 1 names the third slot of whatever list is registered at depth 1.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LevelKey<L> {
    /// A plain addressable slot of the level.
    Index(usize),
    /// A sub-list opener, identified by the id of the list it opens.
    ///
    /// While the sub-list is open this key occupies the opener's slot in the
    /// parent level, and the next entry of the path addresses the sub-list.
    List(L),
    /// The first selectable slot of the level, not yet resolved.
    ///
    /// Produced by [`ListState::open`](crate::ListState::open) and
    /// [`ListState::open_sub_list`](crate::ListState::open_sub_list) before the
    /// target level has registered. It is replaced by an `Index` as soon as
    /// the level registers its slots.
    First,
}

impl<L> LevelKey<L> {
    /// Returns the slot index if this is an `Index` key.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::Index(idx) => Some(*idx),
            _ => None,
        }
    }

    /// Returns the list id if this is a `List` key.
    #[must_use]
    pub const fn list(&self) -> Option<&L> {
        match self {
            Self::List(id) => Some(id),
            _ => None,
        }
    }

    /// Whether this key is still waiting for its level to register.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::First)
    }
}

impl<L> From<usize> for LevelKey<L> {
    fn from(idx: usize) -> Self {
        Self::Index(idx)
    }
}

/// The virtually focused path through a tree of nested lists.
///
/// The length of the path is the number of open levels; an empty path means
/// the whole list is closed. Paths are small and usually shallow, so the keys
/// are stored inline for the first few levels.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FocusPath<L>(SmallVec<[LevelKey<L>; 4]>);

impl<L> FocusPath<L> {
    /// Create an empty (closed) path.
    #[must_use]
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Create a path from keys, root first.
    pub fn from_keys(keys: impl IntoIterator<Item = LevelKey<L>>) -> Self {
        Self(keys.into_iter().collect())
    }

    /// Create a path of plain slot indices, root first.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self(indices.into_iter().map(LevelKey::Index).collect())
    }

    /// Number of open levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path is closed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key at `level`, if that level is open.
    #[must_use]
    pub fn get(&self, level: usize) -> Option<&LevelKey<L>> {
        self.0.get(level)
    }

    /// Key of the deepest open level.
    #[must_use]
    pub fn tip(&self) -> Option<&LevelKey<L>> {
        self.0.last()
    }

    /// Depth index of the deepest open level.
    #[must_use]
    pub fn tip_level(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }

    /// Keys root first.
    #[must_use]
    pub fn as_slice(&self) -> &[LevelKey<L>] {
        &self.0
    }

    /// Iterate keys root first.
    pub fn iter(&self) -> core::slice::Iter<'_, LevelKey<L>> {
        self.0.iter()
    }

    /// Append a key as a new deepest level.
    pub fn push(&mut self, key: LevelKey<L>) {
        self.0.push(key);
    }

    /// Replace the key at `level`. Does nothing if `level` is not open.
    pub fn set(&mut self, level: usize, key: LevelKey<L>) {
        if let Some(slot) = self.0.get_mut(level) {
            *slot = key;
        }
    }

    /// Keep the first `len` levels and drop everything deeper.
    pub fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    /// Mutable access to the key at `level`.
    pub(crate) fn get_mut(&mut self, level: usize) -> Option<&mut LevelKey<L>> {
        self.0.get_mut(level)
    }
}

impl<L: Clone> FocusPath<L> {
    /// A copy of this path keeping only the first `len` levels.
    #[must_use]
    pub fn truncated(&self, len: usize) -> Self {
        Self(self.0.iter().take(len).cloned().collect())
    }
}

impl<L> Default for FocusPath<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> FromIterator<LevelKey<L>> for FocusPath<L> {
    fn from_iter<I: IntoIterator<Item = LevelKey<L>>>(iter: I) -> Self {
        Self::from_keys(iter)
    }
}

impl<'a, L> IntoIterator for &'a FocusPath<L> {
    type Item = &'a LevelKey<L>;
    type IntoIter = core::slice::Iter<'a, LevelKey<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<L: fmt::Debug> fmt::Debug for FocusPath<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
