// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A filterable multi-select picker with a search field inside the list.
//!
//! This demo shows how to:
//! - embed a sticky search field that keeps real focus while arrowing,
//! - route keys through the text-field variant of the key mapper,
//! - reset focus when the filter text changes,
//! - keep the list open after picking with `AfterAction::KeepOpen`.
//!
//! Run:
//! - `cargo run -p understory_demos --example combobox_filter`

use std::cell::RefCell;
use std::rc::Rc;

use understory_virtual_focus::{
    AfterAction, FocusSink, Key, KeyEvent, KeyboardNav, LevelKey, LevelState, ListState,
    TextCaret,
};

const FRUIT: &[&str] = &["Apple", "Apricot", "Banana", "Blueberry", "Cherry"];

/// Prints where real input focus goes.
#[derive(Debug, Default)]
struct PrintSink;

impl FocusSink<&'static str> for PrintSink {
    fn focus_sticky(&mut self, handle: &&'static str) {
        println!("  real focus -> {handle}");
    }

    fn focus_trap(&mut self) {
        println!("  real focus -> list");
    }
}

type Picker = ListState<u32, &'static str, usize, PrintSink>;

/// Slot 0 is the search field; matches follow it.
fn register(picker: &mut Picker, query: &str) -> Vec<&'static str> {
    let matches: Vec<&'static str> = FRUIT
        .iter()
        .copied()
        .filter(|name| name.to_lowercase().starts_with(&query.to_lowercase()))
        .collect();
    picker.register_level(
        0,
        LevelState::with_count(matches.len() + 1).with_sticky(0, "search", true),
    );
    matches
}

fn main() {
    let picked = Rc::new(RefCell::new(Vec::new()));
    let mut picker = Picker::with_sink(PrintSink);
    let nav = KeyboardNav::dismissible();

    let mut query = String::new();
    let mut matches = register(&mut picker, &query);
    picker.open();
    println!("opened with {} match(es)", matches.len());

    for typed in ["a", "p"] {
        query.push_str(typed);
        println!("typed {typed:?}");
        matches = register(&mut picker, &query);
        picker.reset_focus();
        println!("  {} match(es): {matches:?}", matches.len());
    }

    let caret = TextCaret::collapsed(query.len(), query.len());
    for key in [Key::ArrowDown, Key::Enter, Key::ArrowLeft, Key::Space] {
        // The focused row registers its pick action, as a render pass would.
        if let Some(row) = picker
            .path()
            .tip()
            .and_then(LevelKey::index)
            .and_then(|slot| slot.checked_sub(1))
        {
            let sink = Rc::clone(&picked);
            picker.actions_mut().set(
                move |row: usize| {
                    sink.borrow_mut().push(row);
                    AfterAction::KeepOpen
                },
                row,
            );
        }
        let handling = nav.handle_text(&mut picker, &KeyEvent::new(key), &caret);
        println!("{key:?}: {handling:?}, path {:?}", picker.path());
    }

    let names: Vec<&str> = picked
        .borrow()
        .iter()
        .filter_map(|&row| matches.get(row).copied())
        .collect();
    println!("picked {names:?}, still open: {}", picker.is_open());
}
