// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Action registry: the single action of the virtually focused item.
//!
//! Items register their action when they gain virtual focus and clear it
//! when they lose it or unmount. Registrations are last-wins, and clearing
//! is keyed by the [`ActionToken`] returned from [`ActionRegistry::set`], so
//! an item that loses focus can never wipe out the registration of the item
//! that just gained it.
//!
//! ```rust
//! use understory_virtual_focus::{ActionRegistry, AfterAction};
//!
//! let mut actions: ActionRegistry<u32, &str> = ActionRegistry::new();
//! let old = actions.set(|_| AfterAction::Close, "old");
//! let new = actions.set(|_| AfterAction::KeepOpen, "new");
//!
//! // The stale owner cannot clear the new registration.
//! assert!(!actions.clear(old));
//! assert_eq!(actions.value(), Some(&"new"));
//! assert_eq!(actions.trigger(None), Some(AfterAction::KeepOpen));
//! assert!(actions.clear(new));
//! assert_eq!(actions.trigger(None), None);
//! ```

use alloc::boxed::Box;
use core::fmt;

/// What the list should do after an action ran.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AfterAction<L> {
    /// Close the whole list and let enclosing overlays close.
    #[default]
    Close,
    /// Keep the list open with the current focus (pickers, toggles).
    KeepOpen,
    /// Keep the list open and descend into the sub-list with this id.
    OpenSubList(L),
}

impl<L> From<bool> for AfterAction<L> {
    /// `true` closes the list, `false` keeps it open.
    fn from(close: bool) -> Self {
        if close { Self::Close } else { Self::KeepOpen }
    }
}

impl<L> From<()> for AfterAction<L> {
    fn from((): ()) -> Self {
        Self::Close
    }
}

/// Proof of a registration, used to clear exactly that registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActionToken(u64);

/// Boxed action handler.
pub type ActionHandler<L, V> = Box<dyn FnMut(V) -> AfterAction<L>>;

struct ActiveAction<L, V> {
    token: ActionToken,
    handler: Option<ActionHandler<L, V>>,
    value: V,
}

/// Holds at most one active action.
pub struct ActionRegistry<L, V> {
    active: Option<ActiveAction<L, V>>,
    next_token: u64,
}

impl<L, V> fmt::Debug for ActionRegistry<L, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("active", &self.active.as_ref().map(|a| a.token))
            .finish_non_exhaustive()
    }
}

impl<L, V> Default for ActionRegistry<L, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, V> ActionRegistry<L, V> {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: None,
            next_token: 0,
        }
    }

    /// Register `handler` with `value` as the active action, replacing any
    /// previous registration.
    pub fn set(
        &mut self,
        handler: impl FnMut(V) -> AfterAction<L> + 'static,
        value: V,
    ) -> ActionToken {
        self.install(Some(Box::new(handler)), value)
    }

    /// Register a value without a handler.
    ///
    /// Triggering such a registration runs nothing and closes the list, like
    /// a menu item without a click handler.
    pub fn set_value(&mut self, value: V) -> ActionToken {
        self.install(None, value)
    }

    fn install(&mut self, handler: Option<ActionHandler<L, V>>, value: V) -> ActionToken {
        let token = ActionToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.active = Some(ActiveAction {
            token,
            handler,
            value,
        });
        token
    }

    /// Clear the registration identified by `token`.
    ///
    /// Returns `false` and leaves the registry untouched if a later
    /// registration has already replaced it.
    pub fn clear(&mut self, token: ActionToken) -> bool {
        if self.is_active(token) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Whether `token` identifies the active registration.
    #[must_use]
    pub fn is_active(&self, token: ActionToken) -> bool {
        self.active.as_ref().is_some_and(|a| a.token == token)
    }

    /// Whether any action is registered.
    #[must_use]
    pub fn has_action(&self) -> bool {
        self.active.is_some()
    }

    /// Registered value of the active action.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.active.as_ref().map(|a| &a.value)
    }
}

impl<L, V: Clone> ActionRegistry<L, V> {
    /// Run the active action with `value`, or with its registered value.
    ///
    /// Returns `None` without doing anything when no action is registered.
    pub fn trigger(&mut self, value: Option<V>) -> Option<AfterAction<L>> {
        let active = self.active.as_mut()?;
        let value = value.unwrap_or_else(|| active.value.clone());
        Some(match active.handler.as_mut() {
            Some(handler) => handler(value),
            None => AfterAction::Close,
        })
    }
}
