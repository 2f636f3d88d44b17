// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested dismissible overlays.
//!
//! Overlays open on top of each other: a dialog hosts a popout, the popout
//! hosts a menu, the menu opens a submenu. Closing an overlay closes
//! everything opened above it. When an item action in a list reports
//! [`ActionOutcome::Closed`], the list's overlay closes together with the
//! transient overlays ([`OverlayKind::Popout`], [`OverlayKind::Menu`]) that
//! were only open to reach it.
//!
//! ```
//! use understory_overlay::stack::{OverlayKind, OverlayStack};
//! use understory_virtual_focus::ActionOutcome;
//!
//! let mut stack = OverlayStack::new();
//! stack.push("settings", OverlayKind::Dialog);
//! stack.push("more", OverlayKind::Popout);
//! stack.push("menu", OverlayKind::Menu);
//!
//! // Picking a menu item closes the menu and the popout, not the dialog.
//! let closed = stack.apply(&"menu", ActionOutcome::Closed);
//! assert_eq!(closed, ["menu", "more"]);
//! assert_eq!(stack.top(), Some(&"settings"));
//! ```

use alloc::vec::Vec;

use smallvec::SmallVec;
use understory_virtual_focus::ActionOutcome;

/// What kind of overlay an entry is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// A modal dialog.
    Dialog,
    /// A sliding tray or sheet.
    Tray,
    /// A non-modal popout anchored to a trigger.
    Popout,
    /// A menu or listbox popup.
    Menu,
}

impl OverlayKind {
    /// Whether the overlay exists only to reach something inside it.
    ///
    /// Transient overlays close along with a list whose action closed it.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Popout | Self::Menu)
    }
}

/// Open overlays, bottom first.
#[derive(Clone, Debug)]
pub struct OverlayStack<K> {
    entries: SmallVec<[(K, OverlayKind); 4]>,
}

impl<K> Default for OverlayStack<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> OverlayStack<K> {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Number of open overlays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no overlay is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The topmost overlay.
    #[must_use]
    pub fn top(&self) -> Option<&K> {
        self.entries.last().map(|(id, _)| id)
    }

    /// Open overlays with their kinds, bottom first.
    pub fn iter(&self) -> impl Iterator<Item = (&K, OverlayKind)> + '_ {
        self.entries.iter().map(|(id, kind)| (id, *kind))
    }

    /// Close the topmost overlay, as Escape does.
    pub fn close_top(&mut self) -> Option<K> {
        self.entries.pop().map(|(id, _)| id)
    }

    /// Close every overlay. Returns the closed ids, topmost first.
    pub fn close_all(&mut self) -> Vec<K> {
        self.entries.drain(..).rev().map(|(id, _)| id).collect()
    }
}

impl<K: PartialEq> OverlayStack<K> {
    fn position(&self, id: &K) -> Option<usize> {
        self.entries.iter().position(|(open, _)| open == id)
    }

    /// Whether `id` is open.
    #[must_use]
    pub fn contains(&self, id: &K) -> bool {
        self.position(id).is_some()
    }

    /// Kind of the open overlay `id`.
    #[must_use]
    pub fn kind_of(&self, id: &K) -> Option<OverlayKind> {
        self.position(id).map(|idx| self.entries[idx].1)
    }

    /// Open `id` on top of the stack.
    ///
    /// Returns `false` and leaves the stack unchanged if `id` is already open.
    pub fn push(&mut self, id: K, kind: OverlayKind) -> bool {
        if self.contains(&id) {
            log::warn!("{kind:?} overlay is already open");
            return false;
        }
        self.entries.push((id, kind));
        true
    }

    /// Close `id` and every overlay above it.
    ///
    /// Returns the closed ids, topmost first; empty if `id` is not open.
    pub fn close(&mut self, id: &K) -> Vec<K> {
        let Some(idx) = self.position(id) else {
            return Vec::new();
        };
        let closed: Vec<K> = self.entries.drain(idx..).rev().map(|(id, _)| id).collect();
        log::debug!("closed {} overlay(s)", closed.len());
        closed
    }

    /// React to the outcome of an action run in the list hosted by `owner`.
    ///
    /// On [`ActionOutcome::Closed`], closes `owner` and everything above it,
    /// then keeps closing transient overlays below it. Other outcomes close
    /// nothing. Returns the closed ids, topmost first.
    pub fn apply(&mut self, owner: &K, outcome: ActionOutcome) -> Vec<K> {
        if outcome != ActionOutcome::Closed {
            return Vec::new();
        }
        let mut closed = self.close(owner);
        if closed.is_empty() {
            return closed;
        }
        while let Some(&(_, kind)) = self.entries.last()
            && kind.is_transient()
        {
            if let Some((id, _)) = self.entries.pop() {
                closed.push(id);
            }
        }
        closed
    }
}
