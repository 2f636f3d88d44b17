// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard command mapper.
//!
//! [`KeyboardNav`] turns key events into [`ListState`] operations:
//!
//! | Key | Closed | Open |
//! |---|---|---|
//! | ArrowDown | open | next |
//! | ArrowUp | – | previous |
//! | Home / End | – | first / last |
//! | ArrowRight | – | trigger action |
//! | Space / Enter | open | trigger action |
//! | ArrowLeft | – | close deepest level |
//! | Escape | – | close |
//!
//! A *fixed* list (an always-open inline listbox) never collapses its root
//! level: ArrowLeft and Escape only close nested sub-lists there.
//!
//! Text fields hosting a list (comboboxes, filter inputs) use
//! [`KeyboardNav::handle_text`], which leaves caret movement and typing to the
//! text field.
//!
//! ```rust
//! use understory_virtual_focus::{Key, KeyEvent, KeyHandling, KeyboardNav, LevelState, ListState};
//!
//! let mut state: ListState<u32, ()> = ListState::new();
//! state.register_level(0, LevelState::with_count(2));
//! let nav = KeyboardNav::dismissible();
//!
//! let down: KeyEvent = "ArrowDown".parse().unwrap();
//! assert_eq!(nav.handle(&mut state, &down), KeyHandling::Handled);
//! assert!(state.is_open());
//!
//! assert_eq!(nav.handle(&mut state, &KeyEvent::new(Key::Escape)), KeyHandling::Handled);
//! assert!(!state.is_open());
//! ```

use alloc::string::{String, ToString};
use core::hash::Hash;
use core::str::FromStr;

use crate::store::{ActionOutcome, FocusSink, ListState};

/// Keys the mapper understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Down arrow.
    ArrowDown,
    /// Up arrow.
    ArrowUp,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Home.
    Home,
    /// End.
    End,
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
    /// Tab. Never handled; focus leaves the list normally.
    Tab,
    /// Any other printable character.
    Character(char),
}

/// Error returned when a key name is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized key name `{0}`")]
pub struct ParseKeyError(String);

impl ParseKeyError {
    /// The name that failed to parse.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl FromStr for Key {
    type Err = ParseKeyError;

    /// Parse a DOM-style key name (`KeyboardEvent.key`), including the legacy
    /// `"Down"`, `"Esc"`, and `"Spacebar"` spellings.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key = match name {
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => return Err(ParseKeyError(name.to_string())),
                }
            }
        };
        Ok(key)
    }
}

bitflags::bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT   = 0b0000_0001;
        /// Control.
        const CONTROL = 0b0000_0010;
        /// Alt / Option.
        const ALT     = 0b0000_0100;
        /// Meta / Command / Windows.
        const META    = 0b0000_1000;
    }
}

/// A key press delivered to the mapper.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key pressed.
    pub key: Key,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    /// The same key press with `modifiers` held.
    #[must_use]
    pub const fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    /// Whether a chord modifier (Control, Alt, or Meta) is held.
    #[must_use]
    pub fn is_chord(&self) -> bool {
        self.modifiers
            .intersects(Modifiers::CONTROL | Modifiers::ALT | Modifiers::META)
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

impl FromStr for KeyEvent {
    type Err = ParseKeyError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        name.parse().map(Self::new)
    }
}

/// Whether the host must stop the key event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyHandling {
    /// The mapper acted on the key; prevent the default action and stop propagation.
    Handled,
    /// The key ran the focused item's action.
    ///
    /// Handled like [`Handled`](Self::Handled); hosts forward the outcome to
    /// enclosing overlays.
    Triggered(ActionOutcome),
    /// The key was not for the list; let it through.
    Ignored,
}

impl KeyHandling {
    /// Whether the key was handled.
    #[must_use]
    pub const fn is_handled(self) -> bool {
        !matches!(self, Self::Ignored)
    }

    /// Outcome of the action the key triggered, if any.
    #[must_use]
    pub const fn outcome(self) -> Option<ActionOutcome> {
        match self {
            Self::Triggered(outcome) => Some(outcome),
            Self::Handled | Self::Ignored => None,
        }
    }
}

impl From<bool> for KeyHandling {
    fn from(handled: bool) -> Self {
        if handled { Self::Handled } else { Self::Ignored }
    }
}

/// Caret state of the text field hosting a list.
///
/// Offsets are in whatever unit the host's text field uses; only their
/// relation to each other and to `len` matters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextCaret {
    /// Selection start.
    pub selection_start: usize,
    /// Selection end; equal to `selection_start` for a collapsed caret.
    pub selection_end: usize,
    /// Length of the text.
    pub len: usize,
}

impl TextCaret {
    /// A collapsed caret at `position` in text of length `len`.
    #[must_use]
    pub const fn collapsed(position: usize, len: usize) -> Self {
        Self {
            selection_start: position,
            selection_end: position,
            len,
        }
    }

    /// Whether the caret is collapsed at the very start of the text.
    #[must_use]
    pub const fn at_start(&self) -> bool {
        self.selection_start == self.selection_end && self.selection_start == 0
    }

    /// Whether the caret is collapsed at the very end of the text.
    #[must_use]
    pub const fn at_end(&self) -> bool {
        self.selection_start == self.selection_end && self.selection_end >= self.len
    }
}

/// Key handler configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyboardNav {
    /// The root level is always open (inline listbox) and must not collapse.
    pub fixed: bool,
}

impl KeyboardNav {
    /// Mapper for a popup list that opens and closes.
    #[must_use]
    pub const fn dismissible() -> Self {
        Self { fixed: false }
    }

    /// Mapper for an always-open inline list.
    #[must_use]
    pub const fn fixed() -> Self {
        Self { fixed: true }
    }

    /// Apply `event` to `state`.
    pub fn handle<L, H, V, F>(&self, state: &mut ListState<L, H, V, F>, event: &KeyEvent) -> KeyHandling
    where
        L: Clone + Eq + Hash,
        H: Clone + PartialEq,
        V: Clone,
        F: FocusSink<H>,
    {
        if event.is_chord() {
            return KeyHandling::Ignored;
        }
        if !state.is_open() {
            return match event.key {
                Key::ArrowDown | Key::Space | Key::Enter => {
                    state.open();
                    KeyHandling::Handled
                }
                _ => KeyHandling::Ignored,
            };
        }
        match event.key {
            Key::ArrowDown => state.focus_next(),
            Key::ArrowUp => state.focus_prev(),
            Key::Home => state.focus_first(),
            Key::End => state.focus_last(),
            Key::ArrowRight | Key::Space | Key::Enter => {
                let outcome = state.trigger_action(None);
                log::trace!("{:?} triggered action: {outcome:?}", event.key);
                return KeyHandling::Triggered(outcome);
            }
            Key::ArrowLeft => return self.collapse_deepest(state).into(),
            Key::Escape => return self.dismiss(state).into(),
            Key::Tab | Key::Character(_) => return KeyHandling::Ignored,
        }
        KeyHandling::Handled
    }

    /// Apply `event` to `state` on behalf of a text field with `caret`.
    ///
    /// ArrowLeft/ArrowRight only navigate when the caret is collapsed at the
    /// start/end of the text; Space, Home, and End always stay with the text
    /// field. Everything else behaves as in [`handle`](Self::handle).
    pub fn handle_text<L, H, V, F>(
        &self,
        state: &mut ListState<L, H, V, F>,
        event: &KeyEvent,
        caret: &TextCaret,
    ) -> KeyHandling
    where
        L: Clone + Eq + Hash,
        H: Clone + PartialEq,
        V: Clone,
        F: FocusSink<H>,
    {
        match event.key {
            Key::ArrowLeft if !caret.at_start() => KeyHandling::Ignored,
            Key::ArrowRight if !caret.at_end() => KeyHandling::Ignored,
            Key::Space | Key::Home | Key::End => KeyHandling::Ignored,
            _ => self.handle(state, event),
        }
    }

    fn collapse_deepest<L, H, V, F>(&self, state: &mut ListState<L, H, V, F>) -> bool
    where
        L: Clone + Eq + Hash,
        H: Clone + PartialEq,
        F: FocusSink<H>,
    {
        let depth = state.depth();
        if self.fixed && depth <= 1 {
            return false;
        }
        state.close_level(depth - 1);
        true
    }

    fn dismiss<L, H, V, F>(&self, state: &mut ListState<L, H, V, F>) -> bool
    where
        L: Clone + Eq + Hash,
        H: Clone + PartialEq,
        F: FocusSink<H>,
    {
        if !self.fixed {
            state.close();
            return true;
        }
        if state.depth() <= 1 {
            return false;
        }
        state.close_level(1);
        true
    }
}
