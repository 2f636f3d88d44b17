// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_virtual_focus --heading-base-level=0

//! Understory Virtual Focus: hierarchical virtual focus for nested lists.
//!
//! ## Overview
//!
//! Listboxes, menus, submenus, comboboxes, and multi-level pickers all share one
//! problem: real input focus must sit on a single control (a text field, or an
//! invisible focus trap), while the highlighted *virtual* focus moves freely over
//! plain, non-focusable rows, possibly several levels deep.
//!
//! This crate models that as a [`FocusPath`]: one [`LevelKey`] per open level,
//! root first. It does not render anything and does not know about any UI
//! framework. Hosts are responsible for:
//!
//! - registering each rendered level's slots with [`ListState::register_level`]
//!   (and unregistering on unmount, child levels first);
//! - keeping the focused item's action registered (see
//!   [`ListState::sync_item_action`]);
//! - feeding key events through [`KeyboardNav`] and pointer hover through
//!   [`ListState::set_focus`];
//! - moving real focus when the store asks through its [`FocusSink`].
//!
//! ## Levels and slots
//!
//! A level is one list: the root list, a submenu, a sub-sublist. Each level has
//! `count` addressable slots. Most slots are items; some are *sticky children*
//! (for example a filter input), and some open a sub-list. Sticky children
//! marked `skip_virtual_focus` are stepped over by arrow keys but keep real input
//! focus while the virtual focus rests below them, so typing into a filter keeps
//! working while arrowing through its results.
//!
//! Groups are presentational: use [`flatten`](flatten::flatten) to turn a tree of
//! items, groups, sticky children, and sub-list openers into one flat, indexed
//! level.
//!
//! ## Example
//!
//! ```rust
//! use understory_virtual_focus::{
//!     ActionOutcome, AfterAction, FocusPath, LevelKey, LevelState, ListState,
//! };
//!
//! // A menu with three items; the last one opens a submenu with two items.
//! let mut menu: ListState<&str, ()> = ListState::new();
//! menu.register_level(0, LevelState::with_count(3).with_sub_list("share", 2));
//!
//! menu.open();
//! menu.focus_next();
//! menu.focus_next();
//! assert_eq!(menu.path(), &FocusPath::from_indices([2]));
//!
//! // The focused opener registers an action that descends into its submenu.
//! menu.actions_mut().set(|()| AfterAction::OpenSubList("share"), ());
//! assert_eq!(menu.trigger_action(None), ActionOutcome::OpenedSubList);
//! menu.register_level(1, LevelState::with_count(2));
//! assert_eq!(
//!     menu.path().as_slice(),
//!     &[LevelKey::List("share"), LevelKey::Index(0)]
//! );
//!
//! // Going back closes the submenu and leaves the opener focused.
//! menu.close_level(1);
//! assert!(menu.is_virtually_focused(0, &LevelKey::Index(2)));
//! ```
//!
//! ## Failure model
//!
//! Nothing in the store fails. Unregistered levels behave as empty levels,
//! focus that falls out of range is clamped, and triggering without a
//! registered action is a no-op reported as [`ActionOutcome::NoAction`]. The
//! only fallible API is parsing key names ([`ParseKeyError`]).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod action;
pub mod flatten;
mod keyboard;
mod level;
mod nav;
mod path;
mod store;

pub use action::{ActionHandler, ActionRegistry, ActionToken, AfterAction};
pub use keyboard::{Key, KeyEvent, KeyHandling, KeyboardNav, Modifiers, ParseKeyError, TextCaret};
pub use level::{LevelState, Levels, StickyChild};
pub use nav::{
    RealFocus, first_focusable_index, next_focusable_index, prev_focusable_index,
    resolve_real_focus, slot_of,
};
pub use path::{FocusPath, LevelKey};
pub use store::{ActionOutcome, FocusSink, ListState, NoFocusSink};
