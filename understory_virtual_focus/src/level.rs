// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-level registration state.
//!
//! Every rendered list level announces how many addressable slots it has,
//! which of those slots are sticky children, and which slots open sub-lists.
//! [`Levels`] keeps one [`LevelState`] per depth and enforces the nesting rule:
//! removing a level removes everything below it.

use alloc::collections::BTreeMap;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// A focusable, non-item control embedded at a fixed slot of a level.
///
/// Typical examples are filter inputs or inline "create" fields inside a
/// listbox. The host owns the actual control; `handle` is whatever the host
/// needs to move real input focus to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StickyChild<H> {
    /// Host handle used to give the control real input focus.
    pub handle: H,
    /// Skip this slot during next/prev traversal.
    ///
    /// Skipped children are never virtually focused, but they keep real input
    /// focus while the virtual focus rests on a later slot of their level
    /// (for example, a filter input stays focused while arrowing through the
    /// filtered items below it).
    pub skip_virtual_focus: bool,
}

/// Registration state of a single level.
#[derive(Clone, Debug)]
pub struct LevelState<L, H> {
    /// Number of addressable slots (items, sticky children, and sub-list openers).
    pub count: usize,
    /// Sticky children keyed by slot.
    pub sticky: BTreeMap<usize, StickyChild<H>>,
    /// Slots that open a sub-list, keyed by the sub-list id.
    pub sub_lists: HashMap<L, usize>,
    /// Slot of the host's currently selected option, if it lives in this level.
    ///
    /// Only consulted when the level's first focus is resolved after opening.
    pub selected: Option<usize>,
}

impl<L, H> Default for LevelState<L, H> {
    fn default() -> Self {
        Self {
            count: 0,
            sticky: BTreeMap::new(),
            sub_lists: HashMap::new(),
            selected: None,
        }
    }
}

impl<L, H> LevelState<L, H> {
    /// A level with `count` plain slots.
    #[must_use]
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    /// Add a sticky child at `index`.
    #[must_use]
    pub fn with_sticky(mut self, index: usize, handle: H, skip_virtual_focus: bool) -> Self {
        self.sticky.insert(
            index,
            StickyChild {
                handle,
                skip_virtual_focus,
            },
        );
        self
    }

    /// Mark the slot holding the host's selected option.
    #[must_use]
    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    /// Whether traversal must step over `index`.
    #[must_use]
    pub fn is_skipped(&self, index: usize) -> bool {
        self.sticky
            .get(&index)
            .is_some_and(|child| child.skip_virtual_focus)
    }

    /// Sticky child registered at `index`.
    #[must_use]
    pub fn sticky_at(&self, index: usize) -> Option<&StickyChild<H>> {
        self.sticky.get(&index)
    }
}

impl<L: Eq + Hash, H> LevelState<L, H> {
    /// Mark `index` as the opener of sub-list `id`.
    #[must_use]
    pub fn with_sub_list(mut self, id: L, index: usize) -> Self {
        self.sub_lists.insert(id, index);
        self
    }

    /// Slot of the opener for sub-list `id`.
    #[must_use]
    pub fn index_of_list(&self, id: &L) -> Option<usize> {
        self.sub_lists.get(id).copied()
    }

    /// Id of the sub-list opened from `index`, if any.
    #[must_use]
    pub fn list_at(&self, index: usize) -> Option<&L> {
        self.sub_lists
            .iter()
            .find_map(|(id, &idx)| (idx == index).then_some(id))
    }
}

/// Registered levels, indexed by depth.
///
/// Depths may be registered out of order (a nested level can mount before
/// its parent finishes registering), so gaps are represented as `None` and
/// behave like empty levels.
#[derive(Clone, Debug)]
pub struct Levels<L, H> {
    slots: SmallVec<[Option<LevelState<L, H>>; 4]>,
}

impl<L, H> Default for Levels<L, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, H> Levels<L, H> {
    /// No registered levels.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: SmallVec::new(),
        }
    }

    /// State registered at `level`.
    #[must_use]
    pub fn get(&self, level: usize) -> Option<&LevelState<L, H>> {
        self.slots.get(level).and_then(Option::as_ref)
    }

    /// One past the deepest registered level.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Whether `level` currently has a registration.
    #[must_use]
    pub fn is_registered(&self, level: usize) -> bool {
        self.get(level).is_some()
    }

    /// Number of addressable slots at `level`; unknown levels count as empty.
    #[must_use]
    pub fn count(&self, level: usize) -> usize {
        self.get(level).map_or(0, |state| state.count)
    }

    /// Register or update `level`.
    ///
    /// Returns the previous registration, if any.
    pub fn register(
        &mut self,
        level: usize,
        state: LevelState<L, H>,
    ) -> Option<LevelState<L, H>> {
        if self.slots.len() <= level {
            if self.slots.len() < level {
                log::trace!(
                    "level {level} registered before its parent; {} gap(s) pending",
                    level - self.slots.len()
                );
            }
            self.slots.resize_with(level + 1, || None);
        }
        self.slots[level].replace(state)
    }

    /// Remove `level` and every deeper level.
    ///
    /// Returns `false` if nothing was registered at `level`.
    pub fn unregister(&mut self, level: usize) -> bool {
        let was_registered = self.is_registered(level);
        self.slots.truncate(level);
        // Drop trailing gaps so `depth` reflects the deepest live level.
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        was_registered
    }
}
