// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening declarative list children into indexed descriptors.
//!
//! Hosts describe a level as a tree of [`Entry`] values: items, groups with a
//! label, sticky children, and sub-list openers. [`flatten`] walks that tree
//! once and assigns running slot indices. Groups are presentational only:
//! their members share the index space of the containing level, and the
//! group label itself takes no slot.
//!
//! ```rust
//! use understory_virtual_focus::flatten::{Entry, flatten};
//!
//! let entries: Vec<Entry<&str, &str, &str>> = vec![
//!     Entry::Sticky { handle: "filter", skip_virtual_focus: true },
//!     Entry::Group {
//!         label: "Fruit",
//!         children: vec![Entry::Item("Apple"), Entry::Item("Pear")],
//!     },
//!     Entry::SubList { id: "more", trigger: "More", children: vec![Entry::Item("Kiwi")] },
//! ];
//!
//! let level = flatten(&entries);
//! assert_eq!(level.count(), 4);
//! let state = level.level_state();
//! assert!(state.is_skipped(0));
//! assert_eq!(state.index_of_list(&"more"), Some(3));
//! assert_eq!(level.sub_list(&"more").map(|l| l.count()), Some(1));
//! ```

use alloc::vec::Vec;
use core::hash::Hash;

use crate::level::LevelState;

/// One child in a declarative list description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry<L, H, T> {
    /// A selectable item.
    Item(T),
    /// A labelled group of entries sharing the parent's index space.
    Group {
        /// The group's label; takes no slot.
        label: T,
        /// Members of the group.
        children: Vec<Entry<L, H, T>>,
    },
    /// A sticky child (for example a filter input).
    Sticky {
        /// Host handle of the control.
        handle: H,
        /// Whether traversal skips this slot.
        skip_virtual_focus: bool,
    },
    /// An item that opens a nested list.
    SubList {
        /// Id of the nested list.
        id: L,
        /// The opener item shown in this level.
        trigger: T,
        /// Entries of the nested list.
        children: Vec<Entry<L, H, T>>,
    },
}

/// What a [`Descriptor`] stands for.
#[derive(Debug)]
pub enum DescriptorKind<'a, L, H, T> {
    /// A selectable item.
    Item(&'a T),
    /// A group label.
    GroupLabel(&'a T),
    /// A sticky child.
    Sticky {
        /// Host handle of the control.
        handle: &'a H,
        /// Whether traversal skips this slot.
        skip_virtual_focus: bool,
    },
    /// A sub-list opener.
    SubList {
        /// Id of the nested list.
        id: &'a L,
        /// The opener item.
        trigger: &'a T,
        /// Entries of the nested list, flattened on demand.
        children: &'a [Entry<L, H, T>],
    },
}

impl<L, H, T> Clone for DescriptorKind<'_, L, H, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L, H, T> Copy for DescriptorKind<'_, L, H, T> {}

/// A flattened entry in render order.
#[derive(Debug)]
pub struct Descriptor<'a, L, H, T> {
    /// What this entry is.
    pub kind: DescriptorKind<'a, L, H, T>,
    /// Slot index within the level; `None` for group labels.
    pub index: Option<usize>,
    /// Number of enclosing groups.
    pub group_depth: usize,
}

impl<L, H, T> Clone for Descriptor<'_, L, H, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L, H, T> Copy for Descriptor<'_, L, H, T> {}

/// One level of a list, flattened.
#[derive(Clone, Debug)]
pub struct FlatLevel<'a, L, H, T> {
    descriptors: Vec<Descriptor<'a, L, H, T>>,
    // Position in `descriptors` of each slot.
    slots: Vec<usize>,
}

/// Flatten `entries` into one indexed level.
#[must_use]
pub fn flatten<L, H, T>(entries: &[Entry<L, H, T>]) -> FlatLevel<'_, L, H, T> {
    let mut level = FlatLevel {
        descriptors: Vec::new(),
        slots: Vec::new(),
    };
    level.push_entries(entries, 0);
    level
}

impl<'a, L, H, T> FlatLevel<'a, L, H, T> {
    fn push_entries(&mut self, entries: &'a [Entry<L, H, T>], group_depth: usize) {
        for entry in entries {
            let kind = match entry {
                Entry::Group { label, children } => {
                    self.descriptors.push(Descriptor {
                        kind: DescriptorKind::GroupLabel(label),
                        index: None,
                        group_depth,
                    });
                    self.push_entries(children, group_depth + 1);
                    continue;
                }
                Entry::Item(item) => DescriptorKind::Item(item),
                Entry::Sticky {
                    handle,
                    skip_virtual_focus,
                } => DescriptorKind::Sticky {
                    handle,
                    skip_virtual_focus: *skip_virtual_focus,
                },
                Entry::SubList {
                    id,
                    trigger,
                    children,
                } => DescriptorKind::SubList {
                    id,
                    trigger,
                    children,
                },
            };
            self.slots.push(self.descriptors.len());
            self.descriptors.push(Descriptor {
                kind,
                index: Some(self.slots.len() - 1),
                group_depth,
            });
        }
    }

    /// Number of addressable slots.
    #[must_use]
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// All descriptors in render order, including group labels.
    #[must_use]
    pub fn descriptors(&self) -> &[Descriptor<'a, L, H, T>] {
        &self.descriptors
    }

    /// Descriptor occupying slot `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&Descriptor<'a, L, H, T>> {
        self.slots.get(index).map(|&pos| &self.descriptors[pos])
    }

    /// Slot of the first item (or sub-list opener) whose value satisfies `pred`.
    ///
    /// Hosts use this to map their selected value to
    /// [`LevelState::selected`].
    pub fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.descriptors.iter().find_map(|d| match d.kind {
            DescriptorKind::Item(item) | DescriptorKind::SubList { trigger: item, .. } => {
                if pred(item) { d.index } else { None }
            }
            _ => None,
        })
    }
}

impl<'a, L: Clone + Eq + Hash, H: Clone, T> FlatLevel<'a, L, H, T> {
    /// Registration state describing this level.
    #[must_use]
    pub fn level_state(&self) -> LevelState<L, H> {
        let mut state = LevelState::with_count(self.count());
        for descriptor in &self.descriptors {
            let Some(index) = descriptor.index else {
                continue;
            };
            match descriptor.kind {
                DescriptorKind::Sticky {
                    handle,
                    skip_virtual_focus,
                } => state = state.with_sticky(index, handle.clone(), skip_virtual_focus),
                DescriptorKind::SubList { id, .. } => {
                    state = state.with_sub_list(id.clone(), index);
                }
                DescriptorKind::Item(_) | DescriptorKind::GroupLabel(_) => {}
            }
        }
        state
    }

    /// Flatten the children of sub-list `id`.
    #[must_use]
    pub fn sub_list(&self, id: &L) -> Option<FlatLevel<'a, L, H, T>> {
        self.descriptors.iter().find_map(|d| match d.kind {
            DescriptorKind::SubList {
                id: list, children, ..
            } if list == id => Some(flatten(children)),
            _ => None,
        })
    }
}
