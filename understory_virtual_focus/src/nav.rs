// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation resolver.
//!
//! Pure functions over [`Levels`] and [`FocusPath`]:
//!
//! - [`next_focusable_index`] / [`prev_focusable_index`] step within one level,
//!   skipping sticky children marked `skip_virtual_focus`.
//! - [`first_focusable_index`] picks where a freshly opened level starts.
//! - [`resolve_real_focus`] decides which host control must hold real input
//!   focus for a given path.
//!
//! None of these ever fail. Unknown levels behave as empty levels, and
//! out-of-range starts are clamped.

use core::hash::Hash;

use crate::level::{LevelState, Levels};
use crate::path::{FocusPath, LevelKey};

/// First slot at or after `start` in `level` that traversal may land on.
///
/// Returns `0` for unregistered levels. If `start` is past the end of the
/// level, returns the level's `count`. The result equals `count` when no
/// focusable slot exists at or after `start`, so callers must bounds-check
/// it before storing it in a path.
#[must_use]
pub fn next_focusable_index<L, H>(levels: &Levels<L, H>, start: usize, level: usize) -> usize {
    let Some(state) = levels.get(level) else {
        return 0;
    };
    if start > state.count {
        return state.count;
    }
    let mut idx = start;
    while idx < state.count && state.is_skipped(idx) {
        idx += 1;
    }
    idx
}

/// Last slot at or before `start` in `level` that traversal may land on.
///
/// Returns `0` for unregistered or empty levels. `start` is clamped to the
/// last slot. If every slot from `start` down to `0` is skipped, the search
/// turns around and returns [`next_focusable_index`] from `0`, so moving past
/// the top lands on the first real slot instead of a skipped one.
#[must_use]
pub fn prev_focusable_index<L, H>(levels: &Levels<L, H>, start: usize, level: usize) -> usize {
    let Some(state) = levels.get(level) else {
        return 0;
    };
    let Some(last) = state.count.checked_sub(1) else {
        return 0;
    };
    let mut idx = start.min(last);
    while idx > 0 && state.is_skipped(idx) {
        idx -= 1;
    }
    if state.is_skipped(idx) {
        next_focusable_index(levels, 0, level)
    } else {
        idx
    }
}

/// Slot a newly opened `level` should focus first.
///
/// Prefers the level's [`selected`](LevelState::selected) slot when it is in
/// range and not skipped, else the first focusable slot.
#[must_use]
pub fn first_focusable_index<L, H>(levels: &Levels<L, H>, level: usize) -> usize {
    if let Some(state) = levels.get(level)
        && let Some(selected) = state.selected
        && selected < state.count
        && !state.is_skipped(selected)
    {
        return selected;
    }
    next_focusable_index(levels, 0, level)
}

/// Slot addressed by `key` within `state`.
///
/// `List` keys are translated through the level's sub-list openers. Pending
/// keys have no slot yet.
#[must_use]
pub fn slot_of<L: Eq + Hash, H>(state: &LevelState<L, H>, key: &LevelKey<L>) -> Option<usize> {
    match key {
        LevelKey::Index(idx) => Some(*idx),
        LevelKey::List(id) => state.index_of_list(id),
        LevelKey::First => None,
    }
}

/// Where real input focus should go for a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RealFocus<H> {
    /// The path is closed; the list does not claim focus.
    None,
    /// No control qualifies; the host's focus trap holds focus so key events
    /// keep arriving while the highlight follows the virtual focus.
    Trap,
    /// The sticky child with this handle holds focus.
    Sticky(H),
}

/// Resolve which control holds real input focus for `path`.
///
/// Levels are walked bottom-up, starting from the deepest registered or open
/// level. At each level, among the sticky children at or before the focused
/// slot:
///
/// 1. the nearest one that traversal does not skip holds focus;
/// 2. failing that, the nearest skipped one does, so a filter input keeps
///    focus while the virtual focus rests on the results below it.
///
/// Registered levels deeper than the path have no focused slot; all of their
/// sticky children are candidates, first slot first.
///
/// The deepest level producing a candidate wins. If none does, focus goes to
/// the trap.
#[must_use]
pub fn resolve_real_focus<L, H>(levels: &Levels<L, H>, path: &FocusPath<L>) -> RealFocus<H>
where
    L: Eq + Hash,
    H: Clone,
{
    if path.is_empty() {
        return RealFocus::None;
    }
    let deepest = levels.depth().max(path.len());
    for level in (0..deepest).rev() {
        let Some(state) = levels.get(level) else {
            continue;
        };
        let holder = match path.get(level) {
            Some(key) => {
                let Some(focused) = slot_of(state, key) else {
                    continue;
                };
                let behind = || state.sticky.range(..=focused).rev().map(|(_, child)| child);
                behind()
                    .find(|child| !child.skip_virtual_focus)
                    .or_else(|| behind().next())
            }
            None => {
                let below = || state.sticky.values();
                below()
                    .find(|child| !child.skip_virtual_focus)
                    .or_else(|| below().next())
            }
        };
        if let Some(child) = holder {
            return RealFocus::Sticky(child.handle.clone());
        }
    }
    RealFocus::Trap
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels_with(state: LevelState<u32, &'static str>) -> Levels<u32, &'static str> {
        let mut levels = Levels::new();
        levels.register(0, state);
        levels
    }

    #[test]
    fn next_without_sticky_is_identity_then_clamps() {
        let levels = levels_with(LevelState::with_count(3));
        assert_eq!(next_focusable_index(&levels, 0, 0), 0);
        assert_eq!(next_focusable_index(&levels, 2, 0), 2);
        assert_eq!(next_focusable_index(&levels, 3, 0), 3);
        assert_eq!(next_focusable_index(&levels, 9, 0), 3);
    }

    #[test]
    fn unknown_level_resolves_to_zero() {
        let levels = levels_with(LevelState::with_count(3));
        assert_eq!(next_focusable_index(&levels, 2, 4), 0);
        assert_eq!(prev_focusable_index(&levels, 2, 4), 0);
        assert_eq!(first_focusable_index(&levels, 4), 0);
    }

    #[test]
    fn next_skips_skipped_sticky_children() {
        let levels = levels_with(
            LevelState::with_count(4)
                .with_sticky(0, "filter", true)
                .with_sticky(2, "inline", true),
        );
        assert_eq!(next_focusable_index(&levels, 0, 0), 1);
        assert_eq!(next_focusable_index(&levels, 2, 0), 3);
    }

    #[test]
    fn next_does_not_skip_focusable_sticky_children() {
        let levels = levels_with(LevelState::with_count(3).with_sticky(1, "create", false));
        assert_eq!(next_focusable_index(&levels, 1, 0), 1);
    }

    #[test]
    fn prev_clamps_and_turns_around_at_top() {
        let levels = levels_with(LevelState::with_count(3).with_sticky(0, "filter", true));
        assert_eq!(prev_focusable_index(&levels, 7, 0), 2);
        assert_eq!(prev_focusable_index(&levels, 1, 0), 1);
        // Slot 0 is skipped: turn around to the first real item.
        assert_eq!(prev_focusable_index(&levels, 0, 0), 1);
    }

    #[test]
    fn prev_on_empty_level_is_zero() {
        let levels = levels_with(LevelState::with_count(0));
        assert_eq!(prev_focusable_index(&levels, 3, 0), 0);
    }

    #[test]
    fn first_prefers_selected_slot() {
        let levels = levels_with(LevelState::with_count(5).with_selected(3));
        assert_eq!(first_focusable_index(&levels, 0), 3);

        // Out-of-range or skipped selections fall back to the first slot.
        let levels = levels_with(LevelState::with_count(2).with_selected(8));
        assert_eq!(first_focusable_index(&levels, 0), 0);
        let levels = levels_with(
            LevelState::with_count(3)
                .with_sticky(0, "filter", true)
                .with_selected(0),
        );
        assert_eq!(first_focusable_index(&levels, 0), 1);
    }

    #[test]
    fn real_focus_closed_path_claims_nothing() {
        let levels = levels_with(LevelState::with_count(3));
        assert_eq!(resolve_real_focus(&levels, &FocusPath::new()), RealFocus::None);
    }

    #[test]
    fn real_focus_falls_back_to_trap() {
        let levels = levels_with(LevelState::with_count(3));
        let path = FocusPath::from_indices([1]);
        assert_eq!(resolve_real_focus(&levels, &path), RealFocus::Trap);
    }

    #[test]
    fn skipped_filter_keeps_focus_while_items_below_are_focused() {
        let levels = levels_with(LevelState::with_count(3).with_sticky(0, "filter", true));
        let path = FocusPath::from_indices([2]);
        assert_eq!(
            resolve_real_focus(&levels, &path),
            RealFocus::Sticky("filter")
        );
    }

    #[test]
    fn focusable_sticky_holds_focus_on_and_behind_virtual_focus() {
        let levels = levels_with(LevelState::with_count(4).with_sticky(2, "create", false));
        assert_eq!(
            resolve_real_focus(&levels, &FocusPath::from_indices([2])),
            RealFocus::Sticky("create")
        );
        assert_eq!(
            resolve_real_focus(&levels, &FocusPath::from_indices([3])),
            RealFocus::Sticky("create")
        );
        assert_eq!(
            resolve_real_focus(&levels, &FocusPath::from_indices([1])),
            RealFocus::Trap
        );
    }

    #[test]
    fn nearest_sticky_before_focus_wins() {
        let levels = levels_with(
            LevelState::with_count(5)
                .with_sticky(0, "filter", true)
                .with_sticky(2, "create", false),
        );
        assert_eq!(
            resolve_real_focus(&levels, &FocusPath::from_indices([1])),
            RealFocus::Sticky("filter")
        );
        assert_eq!(
            resolve_real_focus(&levels, &FocusPath::from_indices([4])),
            RealFocus::Sticky("create")
        );
    }

    #[test]
    fn focusable_sticky_outranks_nearer_skipped_one() {
        let levels = levels_with(
            LevelState::with_count(4)
                .with_sticky(0, "create", false)
                .with_sticky(1, "hint", true),
        );
        assert_eq!(
            resolve_real_focus(&levels, &FocusPath::from_indices([3])),
            RealFocus::Sticky("create")
        );
    }

    #[test]
    fn level_below_path_prefers_focusable_sticky() {
        let mut levels = levels_with(LevelState::with_count(2));
        levels.register(
            1,
            LevelState::with_count(4)
                .with_sticky(0, "search", true)
                .with_sticky(3, "create", false),
        );
        assert_eq!(
            resolve_real_focus(&levels, &FocusPath::from_indices([0])),
            RealFocus::Sticky("create")
        );
    }

    #[test]
    fn sticky_after_focus_does_not_hold_focus() {
        let levels = levels_with(LevelState::with_count(4).with_sticky(3, "footer", true));
        assert_eq!(
            resolve_real_focus(&levels, &FocusPath::from_indices([1])),
            RealFocus::Trap
        );
    }

    #[test]
    fn deepest_level_wins() {
        let mut levels = levels_with(
            LevelState::with_count(3)
                .with_sticky(0, "root-filter", true)
                .with_sub_list(9, 2),
        );
        levels.register(1, LevelState::with_count(3).with_sticky(0, "sub-filter", true));
        let path = FocusPath::from_keys([LevelKey::List(9), LevelKey::Index(1)]);
        assert_eq!(
            resolve_real_focus(&levels, &path),
            RealFocus::Sticky("sub-filter")
        );

        // Without a sticky child in the sub-list, the parent's filter holds focus.
        levels.register(1, LevelState::with_count(3));
        assert_eq!(
            resolve_real_focus(&levels, &path),
            RealFocus::Sticky("root-filter")
        );
    }

    #[test]
    fn level_below_path_contributes_its_first_sticky() {
        let mut levels = levels_with(LevelState::with_count(2));
        levels.register(1, LevelState::with_count(4).with_sticky(2, "search", true));
        let path = FocusPath::from_indices([0]);
        assert_eq!(
            resolve_real_focus(&levels, &path),
            RealFocus::Sticky("search")
        );
    }

    #[test]
    fn pending_level_is_ignored() {
        let levels = levels_with(LevelState::with_count(3).with_sticky(0, "filter", true));
        let path: FocusPath<u32> = FocusPath::from_keys([LevelKey::First]);
        assert_eq!(resolve_real_focus(&levels, &path), RealFocus::Trap);
    }
}
