// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard navigation through a menu with a submenu, hosted in a popout.
//!
//! This demo shows how to:
//! - describe a menu as entries and flatten it into levels,
//! - keep the focused item's action registered as focus moves,
//! - drive the menu from DOM-style key names,
//! - unwind enclosing overlays when an item closes the menu.
//!
//! Run:
//! - `cargo run -p understory_demos --example menu_keyboard`

use understory_overlay::stack::{OverlayKind, OverlayStack};
use understory_virtual_focus::flatten::{DescriptorKind, Entry, FlatLevel, flatten};
use understory_virtual_focus::{
    ActionToken, AfterAction, KeyEvent, KeyHandling, KeyboardNav, LevelKey, ListState,
};

type Menu = ListState<&'static str, (), &'static str>;

/// What each rendered row remembers between frames.
struct Row {
    level: usize,
    index: usize,
    label: &'static str,
    opens: Option<&'static str>,
    token: Option<ActionToken>,
}

fn rows_for(level: usize, flat: &FlatLevel<'_, &'static str, (), &'static str>) -> Vec<Row> {
    flat.descriptors()
        .iter()
        .filter_map(|d| {
            let index = d.index?;
            let (label, opens) = match d.kind {
                DescriptorKind::Item(label) => (*label, None),
                DescriptorKind::SubList { id, trigger, .. } => (*trigger, Some(*id)),
                DescriptorKind::GroupLabel(_) | DescriptorKind::Sticky { .. } => return None,
            };
            Some(Row {
                level,
                index,
                label,
                opens,
                token: None,
            })
        })
        .collect()
}

/// Mirrors a render pass: every row re-syncs its action registration.
fn render(menu: &mut Menu, rows: &mut [Row]) {
    for row in rows.iter_mut() {
        let opens = row.opens;
        let label = row.label;
        menu.sync_item_action(row.level, &LevelKey::Index(row.index), &mut row.token, |actions| {
            match opens {
                Some(id) => actions.set(move |_| AfterAction::OpenSubList(id), label),
                None => actions.set(
                    |picked| {
                        println!("  picked {picked:?}");
                        AfterAction::Close
                    },
                    label,
                ),
            }
        });
    }
    let focused = rows
        .iter()
        .find(|row| menu.is_virtually_focused(row.level, &LevelKey::Index(row.index)))
        .map_or("-", |row| row.label);
    println!("  path {:?}, focused {focused}", menu.path());
}

fn main() {
    let entries: Vec<Entry<&str, (), &str>> = vec![
        Entry::Item("Copy"),
        Entry::Item("Paste"),
        Entry::Group {
            label: "Sharing",
            children: vec![Entry::SubList {
                id: "share",
                trigger: "Share",
                children: vec![Entry::Item("Email"), Entry::Item("Link")],
            }],
        },
    ];
    let root = flatten(&entries);
    let Some(share) = root.sub_list(&"share") else {
        return;
    };

    let mut overlays = OverlayStack::new();
    overlays.push("toolbar-more", OverlayKind::Popout);
    overlays.push("menu", OverlayKind::Menu);

    let mut menu = Menu::new();
    menu.register_level(0, root.level_state());
    let mut rows = rows_for(0, &root);

    let nav = KeyboardNav::dismissible();
    for name in ["ArrowDown", "ArrowDown", "ArrowDown", "ArrowRight", "ArrowDown", "Enter"] {
        let Ok(event) = name.parse::<KeyEvent>() else {
            println!("unknown key {name}");
            continue;
        };
        println!("{name}:");
        let handling = nav.handle(&mut menu, &event);

        // Mount the submenu level when the path reaches it.
        if menu.depth() > 1 && !menu.levels().is_registered(1) {
            menu.register_level(1, share.level_state());
            rows.extend(rows_for(1, &share));
        }
        render(&mut menu, &mut rows);

        if let KeyHandling::Triggered(outcome) = handling {
            for id in overlays.apply(&"menu", outcome) {
                println!("  unmount overlay {id}");
            }
        }
    }
    println!("overlays still open: {}", overlays.len());
}
