// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_overlay --heading-base-level=0

//! Understory Overlay: coordination for tooltips and nested dismissible overlays.
//!
//! ## Overview
//!
//! Menus, popouts, trays, and dialogs stack on top of each other, and closing
//! one has consequences for the rest. This crate keeps that bookkeeping out of
//! widget code:
//!
//! - [`TooltipCoordinator`](tooltip::TooltipCoordinator) keeps at most one
//!   tooltip open and skips the show delay when the pointer moves straight
//!   from one tooltip trigger to the next.
//! - [`OverlayStack`](stack::OverlayStack) tracks open overlays bottom to top,
//!   closes an overlay together with everything opened above it, and unwinds
//!   transient overlays when a list action closes its list.
//!
//! Neither type renders, positions, or animates anything. Both return the ids
//! of what must hide or unmount, and the host acts on them.
//!
//! ## Closing on item actions
//!
//! A menu's [`ListState`](understory_virtual_focus::ListState) reports
//! [`ActionOutcome::Closed`](understory_virtual_focus::ActionOutcome::Closed)
//! when an item action closes the list. Feed that outcome to
//! [`OverlayStack::apply`](stack::OverlayStack::apply):
//!
//! ```
//! use understory_overlay::stack::{OverlayKind, OverlayStack};
//! use understory_virtual_focus::{
//!     AfterAction, Key, KeyEvent, KeyboardNav, LevelState, ListState,
//! };
//!
//! let mut overlays = OverlayStack::new();
//! overlays.push("toolbar-more", OverlayKind::Popout);
//! overlays.push("menu", OverlayKind::Menu);
//!
//! let mut menu: ListState<u32, ()> = ListState::new();
//! menu.register_level(0, LevelState::with_count(2));
//! menu.open();
//! menu.actions_mut().set(|()| AfterAction::Close, ());
//!
//! let handling = KeyboardNav::dismissible().handle(&mut menu, &KeyEvent::new(Key::Enter));
//! if let Some(outcome) = handling.outcome() {
//!     let closed = overlays.apply(&"menu", outcome);
//!     assert_eq!(closed, ["menu", "toolbar-more"]);
//! }
//! assert!(overlays.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod stack;
pub mod tooltip;
