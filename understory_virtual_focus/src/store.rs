// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The focus path store.
//!
//! [`ListState`] is the handle a host passes down to every rendered level of a
//! listbox, menu, or combobox. It owns:
//!
//! - the current [`FocusPath`];
//! - the per-level registrations ([`Levels`]);
//! - the [`ActionRegistry`] of the virtually focused item;
//! - a [`FocusSink`] through which it moves real input focus.
//!
//! All operations take `&mut self` and derive the next path from the latest
//! committed one, so consecutive updates within one event never act on a
//! stale snapshot. When a change closes a sub-list, the registrations of the
//! closed levels are dropped at once; the root registration is kept. After
//! every change the store re-resolves real focus with [`resolve_real_focus`]
//! and notifies the sink if the target changed.

use core::fmt;
use core::hash::Hash;

use crate::action::{ActionRegistry, ActionToken, AfterAction};
use crate::level::{LevelState, Levels};
use crate::nav::{
    RealFocus, first_focusable_index, next_focusable_index, prev_focusable_index,
    resolve_real_focus, slot_of,
};
use crate::path::{FocusPath, LevelKey};

/// Receiver of real input focus requests.
///
/// Hosts implement this over their focus primitive (for example calling
/// `focus()` on a DOM element, or setting the focused widget in a retained
/// toolkit).
pub trait FocusSink<H> {
    /// Give real input focus to the sticky child identified by `handle`.
    fn focus_sticky(&mut self, handle: &H);
    /// Give real input focus to the list's focus trap.
    fn focus_trap(&mut self);
}

/// A [`FocusSink`] that ignores all requests.
///
/// Useful when the host polls [`ListState::real_focus`] instead.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoFocusSink;

impl<H> FocusSink<H> for NoFocusSink {
    fn focus_sticky(&mut self, _: &H) {}
    fn focus_trap(&mut self) {}
}

/// Result of [`ListState::trigger_action`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActionOutcome {
    /// No action was registered; nothing happened.
    NoAction,
    /// The action ran and the list closed. Enclosing overlays should close too.
    Closed,
    /// The action ran and the list stayed open.
    KeptOpen,
    /// The action ran and opened a sub-list.
    OpenedSubList,
}

/// Virtual focus state for one listbox-derived widget.
///
/// Type parameters:
/// - `L`: sub-list identifier.
/// - `H`: host handle of sticky children.
/// - `V`: value passed to item actions.
/// - `F`: real focus receiver.
///
/// ```rust
/// use understory_virtual_focus::{FocusPath, LevelState, ListState};
///
/// let mut state: ListState<u32, ()> = ListState::new();
/// state.register_level(0, LevelState::with_count(3));
///
/// state.open();
/// assert_eq!(state.path(), &FocusPath::from_indices([0]));
/// state.focus_next();
/// state.focus_next();
/// state.focus_next();
/// assert_eq!(state.path(), &FocusPath::from_indices([2]));
/// state.close();
/// assert!(!state.is_open());
/// ```
pub struct ListState<L, H, V = (), F = NoFocusSink> {
    path: FocusPath<L>,
    levels: Levels<L, H>,
    actions: ActionRegistry<L, V>,
    real_focus: RealFocus<H>,
    sink: F,
}

impl<L: fmt::Debug, H: fmt::Debug, V, F> fmt::Debug for ListState<L, H, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListState")
            .field("path", &self.path)
            .field("levels", &self.levels)
            .field("actions", &self.actions)
            .field("real_focus", &self.real_focus)
            .finish_non_exhaustive()
    }
}

impl<L, H, V> ListState<L, H, V, NoFocusSink> {
    /// A closed list with no registered levels and no focus sink.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(NoFocusSink)
    }
}

impl<L, H, V> Default for ListState<L, H, V, NoFocusSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, H, V, F> ListState<L, H, V, F> {
    /// A closed list that reports real focus changes to `sink`.
    pub fn with_sink(sink: F) -> Self {
        Self {
            path: FocusPath::new(),
            levels: Levels::new(),
            actions: ActionRegistry::new(),
            real_focus: RealFocus::None,
            sink,
        }
    }

    /// The current focus path.
    #[must_use]
    pub fn path(&self) -> &FocusPath<L> {
        &self.path
    }

    /// Number of open levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Whether any level is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.path.is_empty()
    }

    /// All level registrations.
    #[must_use]
    pub fn levels(&self) -> &Levels<L, H> {
        &self.levels
    }

    /// Registration of `level`.
    #[must_use]
    pub fn level(&self, level: usize) -> Option<&LevelState<L, H>> {
        self.levels.get(level)
    }

    /// The last resolved real focus target.
    #[must_use]
    pub fn real_focus(&self) -> &RealFocus<H> {
        &self.real_focus
    }

    /// The action registry.
    #[must_use]
    pub fn actions(&self) -> &ActionRegistry<L, V> {
        &self.actions
    }

    /// Mutable access to the action registry, for item registration.
    pub fn actions_mut(&mut self) -> &mut ActionRegistry<L, V> {
        &mut self.actions
    }

    /// The focus sink.
    #[must_use]
    pub fn sink(&self) -> &F {
        &self.sink
    }

    /// Mutable access to the focus sink.
    pub fn sink_mut(&mut self) -> &mut F {
        &mut self.sink
    }
}

impl<L, H, V, F> ListState<L, H, V, F>
where
    L: Clone + Eq + Hash,
    H: Clone + PartialEq,
    F: FocusSink<H>,
{
    /// Open the root level, focusing its first selectable slot.
    ///
    /// If the root level is not registered yet, the path holds a pending
    /// [`LevelKey::First`] until it is.
    pub fn open(&mut self) {
        self.commit(FocusPath::from_keys([LevelKey::First]));
    }

    /// Close every level.
    pub fn close(&mut self) {
        self.commit(FocusPath::new());
    }

    /// Close `level` and everything deeper, keeping its ancestors open.
    ///
    /// Registrations of the closed sub-lists are dropped. `close_level(0)` is
    /// equivalent to [`close`](Self::close).
    pub fn close_level(&mut self, level: usize) {
        let path = self.path.truncated(level);
        self.commit(path);
    }

    /// Replace the whole path, for example from pointer hover.
    pub fn set_focus(&mut self, path: FocusPath<L>) {
        self.commit(path);
    }

    /// Derive the next path from the current one.
    pub fn update_focus(&mut self, f: impl FnOnce(&FocusPath<L>) -> FocusPath<L>) {
        let path = f(&self.path);
        self.commit(path);
    }

    /// Focus the root level's first focusable slot again.
    ///
    /// Intended for external resets such as filter text changes, which
    /// invalidate the indices of previously focused rows. Does nothing while
    /// the list is closed.
    pub fn reset_focus(&mut self) {
        if !self.is_open() {
            return;
        }
        let idx = next_focusable_index(&self.levels, 0, 0);
        self.commit(FocusPath::from_indices([idx]));
    }

    /// Move to the next focusable slot of the deepest open level.
    ///
    /// Stays put at the end of the level.
    pub fn focus_next(&mut self) {
        self.step_tip(|levels, level, current| {
            next_focusable_index(levels, current + 1, level)
        });
    }

    /// Move to the previous focusable slot of the deepest open level.
    ///
    /// Stays put at the start of the level.
    pub fn focus_prev(&mut self) {
        self.step_tip(|levels, level, current| {
            prev_focusable_index(levels, current.saturating_sub(1), level)
        });
    }

    /// Move to the first focusable slot of the deepest open level.
    pub fn focus_first(&mut self) {
        self.step_tip(|levels, level, _| next_focusable_index(levels, 0, level));
    }

    /// Move to the last focusable slot of the deepest open level.
    pub fn focus_last(&mut self) {
        self.step_tip(|levels, level, _| {
            prev_focusable_index(levels, levels.count(level).saturating_sub(1), level)
        });
    }

    fn step_tip(&mut self, step: impl FnOnce(&Levels<L, H>, usize, usize) -> usize) {
        let Some(level) = self.path.tip_level() else {
            return;
        };
        let Some(state) = self.levels.get(level) else {
            return;
        };
        let Some(current) = self.path.tip().and_then(|key| slot_of(state, key)) else {
            return;
        };
        let target = step(&self.levels, level, current);
        if target >= state.count || target == current {
            return;
        }
        let mut path = self.path.clone();
        path.set(level, LevelKey::Index(target));
        self.commit(path);
    }

    /// Open sub-list `id` from its opener at `level`.
    ///
    /// The path becomes `[.., List(id), first]`: everything below `level` is
    /// closed, the opener's slot holds the sub-list id, and the new level
    /// focuses its first selectable slot once the sub-list registers.
    /// Whatever was registered below `level` belongs to a list that is no
    /// longer open and is dropped. Requests for a level deeper than the open
    /// path are ignored.
    pub fn open_sub_list(&mut self, level: usize, id: L) {
        if level > self.path.len() {
            log::warn!(
                "ignoring sub-list open at level {level}; only {} level(s) open",
                self.path.len()
            );
            return;
        }
        self.levels.unregister(level + 1);
        let mut path = self.path.truncated(level);
        path.push(LevelKey::List(id));
        path.push(LevelKey::First);
        self.commit(path);
    }

    /// Register or update the slots of `level`.
    ///
    /// Resolves a pending first focus at that level and clamps a focused
    /// index that fell out of range (for example after filtering).
    pub fn register_level(&mut self, level: usize, state: LevelState<L, H>) {
        log::trace!(
            "register level {level}: {} slot(s), {} sticky",
            state.count,
            state.sticky.len()
        );
        self.levels.register(level, state);
        let path = self.path.clone();
        self.commit(path);
    }

    /// Remove `level` and every deeper level.
    ///
    /// Keys stored in the path for removed levels are kept; they behave as
    /// addressing empty levels until the levels register again or the path
    /// is truncated by a close.
    pub fn unregister_level(&mut self, level: usize) {
        if !self.levels.unregister(level) {
            log::warn!("unregistering level {level}, which was not registered");
        }
        self.refresh_real_focus();
    }

    /// Run the virtually focused item's action.
    ///
    /// `value` overrides the item's registered value. Closing outcomes empty
    /// the path; callers forward [`ActionOutcome::Closed`] to enclosing
    /// overlays.
    pub fn trigger_action(&mut self, value: Option<V>) -> ActionOutcome
    where
        V: Clone,
    {
        let Some(after) = self.actions.trigger(value) else {
            log::debug!("trigger ignored: no active action");
            return ActionOutcome::NoAction;
        };
        match after {
            AfterAction::Close => {
                log::debug!("action closed the list at depth {}", self.depth());
                self.close();
                ActionOutcome::Closed
            }
            AfterAction::KeepOpen => ActionOutcome::KeptOpen,
            AfterAction::OpenSubList(id) => {
                let level = self.path.tip_level().unwrap_or(0);
                self.open_sub_list(level, id);
                ActionOutcome::OpenedSubList
            }
        }
    }

    /// Whether the item at `level` with `key` is the virtually focused item.
    ///
    /// Only the deepest open level has a virtually focused item. `Index` and
    /// `List` keys match each other through the level's sub-list openers, so
    /// an opener matches whether the path names its slot or its list.
    #[must_use]
    pub fn is_virtually_focused(&self, level: usize, key: &LevelKey<L>) -> bool {
        self.path.tip_level() == Some(level) && self.key_matches(level, key)
    }

    /// Whether the item at `level` with `key` lies on the focus path.
    ///
    /// Unlike [`is_virtually_focused`](Self::is_virtually_focused), this is
    /// also true for the openers of open sub-lists.
    #[must_use]
    pub fn is_on_path(&self, level: usize, key: &LevelKey<L>) -> bool {
        level < self.path.len() && self.key_matches(level, key)
    }

    fn key_matches(&self, level: usize, key: &LevelKey<L>) -> bool {
        let (Some(current), Some(state)) = (self.path.get(level), self.levels.get(level)) else {
            return false;
        };
        // A level without selectable slots parks focus on a skipped slot;
        // nothing there is focused.
        match (slot_of(state, current), slot_of(state, key)) {
            (Some(a), Some(b)) => a == b && a < state.count && !state.is_skipped(a),
            _ => false,
        }
    }

    /// Keep an item's action registration in sync with its focus.
    ///
    /// Items call this whenever they re-render. `slot` is the item's own
    /// storage for its [`ActionToken`]. When the item is virtually focused and
    /// holds no registration, `register` runs and its token is stored; when it
    /// is not focused, its registration (and only its own) is cleared.
    pub fn sync_item_action(
        &mut self,
        level: usize,
        key: &LevelKey<L>,
        slot: &mut Option<ActionToken>,
        register: impl FnOnce(&mut ActionRegistry<L, V>) -> ActionToken,
    ) {
        let focused = self.is_virtually_focused(level, key);
        if let Some(token) = *slot
            && (!focused || !self.actions.is_active(token))
        {
            self.actions.clear(token);
            *slot = None;
        }
        if focused && slot.is_none() {
            *slot = Some(register(&mut self.actions));
        }
    }

    /// Release an item's registration on unmount.
    pub fn release_item_action(&mut self, slot: &mut Option<ActionToken>) {
        if let Some(token) = slot.take() {
            self.actions.clear(token);
        }
    }

    /// Deliver the current real focus target to the sink again.
    ///
    /// Useful after the host moved real focus elsewhere behind the store's
    /// back (for example when a nested popup closed).
    pub fn refocus(&mut self) {
        match &self.real_focus {
            RealFocus::None => {}
            RealFocus::Trap => self.sink.focus_trap(),
            RealFocus::Sticky(handle) => self.sink.focus_sticky(handle),
        }
    }

    fn commit(&mut self, path: FocusPath<L>) {
        self.discard_closed_levels(&path);
        let path = self.normalize(path);
        if path != self.path {
            log::trace!(
                "focus path: depth {} -> depth {}",
                self.path.len(),
                path.len()
            );
            self.path = path;
        }
        self.refresh_real_focus();
    }

    /// Drop the registrations of sub-lists that `next` closes.
    ///
    /// Levels below the first level whose key changes were opened from the
    /// old key and are gone, as are levels the new path no longer reaches.
    /// Levels registered ahead of the current path are left alone.
    fn discard_closed_levels(&mut self, next: &FocusPath<L>) {
        let kept = self
            .path
            .iter()
            .zip(next.iter())
            .take_while(|(old, new)| old == new)
            .count();
        let first_closed = (kept + 1).min(next.len()).max(1);
        if first_closed < self.path.len() && self.levels.unregister(first_closed) {
            log::trace!("dropped registrations from level {first_closed} down");
        }
    }

    /// Resolve pending keys and move indices that are out of range or on a
    /// skipped slot, against the current registrations.
    ///
    /// A level whose slots are all skipped (a filter with no results) keeps
    /// focus on its last slot, which matches no item.
    fn normalize(&self, mut path: FocusPath<L>) -> FocusPath<L> {
        for level in 0..path.len() {
            let Some(state) = self.levels.get(level) else {
                continue;
            };
            let Some(key) = path.get_mut(level) else {
                break;
            };
            let last = state.count.saturating_sub(1);
            let resolved = match &*key {
                LevelKey::First => first_focusable_index(&self.levels, level),
                LevelKey::Index(idx) if *idx >= state.count || state.is_skipped(*idx) => {
                    let next = next_focusable_index(&self.levels, *idx, level);
                    let moved = if next < state.count {
                        next
                    } else {
                        prev_focusable_index(&self.levels, last, level)
                    };
                    log::trace!("moving level {level} focus from {idx} to {moved}");
                    moved
                }
                _ => continue,
            };
            *key = LevelKey::Index(resolved.min(last));
        }
        path
    }

    fn refresh_real_focus(&mut self) {
        let target = resolve_real_focus(&self.levels, &self.path);
        if target == self.real_focus {
            return;
        }
        self.real_focus = target;
        self.refocus();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[derive(Debug, Default)]
    struct RecordingSink {
        events: Vec<RealFocus<&'static str>>,
    }

    impl FocusSink<&'static str> for RecordingSink {
        fn focus_sticky(&mut self, handle: &&'static str) {
            self.events.push(RealFocus::Sticky(*handle));
        }
        fn focus_trap(&mut self) {
            self.events.push(RealFocus::Trap);
        }
    }

    type State = ListState<&'static str, &'static str, u32, RecordingSink>;

    fn state_with_root(count: usize) -> State {
        let mut state = ListState::with_sink(RecordingSink::default());
        state.register_level(0, LevelState::with_count(count));
        state
    }

    #[test]
    fn open_then_step_and_clamp() {
        let mut state = state_with_root(3);
        state.open();
        assert_eq!(state.path(), &FocusPath::from_indices([0]));
        state.focus_next();
        state.focus_next();
        assert_eq!(state.path(), &FocusPath::from_indices([2]));
        state.focus_next();
        assert_eq!(state.path(), &FocusPath::from_indices([2]));
        state.focus_prev();
        assert_eq!(state.path(), &FocusPath::from_indices([1]));
    }

    #[test]
    fn prev_at_top_stays() {
        let mut state = state_with_root(3);
        state.open();
        state.focus_prev();
        assert_eq!(state.path(), &FocusPath::from_indices([0]));
    }

    #[test]
    fn open_skips_leading_filter() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.register_level(0, LevelState::with_count(3).with_sticky(0, "filter", true));
        state.open();
        assert_eq!(state.path(), &FocusPath::from_indices([1]));
        // The filter keeps real focus so typing keeps working.
        assert_eq!(state.real_focus(), &RealFocus::Sticky("filter"));
        // Moving up past the first item turns around instead of landing on the filter.
        state.focus_prev();
        assert_eq!(state.path(), &FocusPath::from_indices([1]));
    }

    #[test]
    fn open_before_registration_resolves_on_register() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.open();
        assert_eq!(state.path().as_slice(), &[LevelKey::First]);
        state.register_level(0, LevelState::with_count(4).with_selected(2));
        assert_eq!(state.path(), &FocusPath::from_indices([2]));
    }

    #[test]
    fn shrinking_level_clamps_focus() {
        let mut state = state_with_root(5);
        state.set_focus(FocusPath::from_indices([4]));
        state.register_level(0, LevelState::with_count(2));
        assert_eq!(state.path(), &FocusPath::from_indices([1]));
        state.register_level(0, LevelState::with_count(0));
        assert_eq!(state.path(), &FocusPath::from_indices([0]));
    }

    #[test]
    fn focus_first_and_last() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.register_level(
            0,
            LevelState::with_count(5)
                .with_sticky(0, "filter", true)
                .with_sticky(4, "footer", true),
        );
        state.set_focus(FocusPath::from_indices([2]));
        state.focus_last();
        assert_eq!(state.path(), &FocusPath::from_indices([3]));
        state.focus_first();
        assert_eq!(state.path(), &FocusPath::from_indices([1]));
    }

    #[test]
    fn sub_list_open_and_close() {
        let mut state = state_with_root(4);
        state.open();
        state.open_sub_list(0, "more");
        assert_eq!(
            state.path().as_slice(),
            &[LevelKey::List("more"), LevelKey::First]
        );
        state.register_level(1, LevelState::with_count(2));
        assert_eq!(
            state.path().as_slice(),
            &[LevelKey::List("more"), LevelKey::Index(0)]
        );
        state.close_level(1);
        assert_eq!(state.path().as_slice(), &[LevelKey::List("more")]);
    }

    #[test]
    fn navigation_continues_from_closed_sub_list_opener() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.register_level(0, LevelState::with_count(4).with_sub_list("more", 1));
        state.set_focus(FocusPath::from_keys([LevelKey::List("more")]));
        state.focus_next();
        assert_eq!(state.path(), &FocusPath::from_indices([2]));
    }

    #[test]
    fn switching_sub_lists_starts_the_new_one_fresh() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.register_level(
            0,
            LevelState::with_count(2)
                .with_sub_list("a", 0)
                .with_sub_list("b", 1),
        );
        state.open();
        state.open_sub_list(0, "a");
        state.register_level(1, LevelState::with_count(4).with_sticky(0, "a-filter", true));
        assert_eq!(
            state.path().as_slice(),
            &[LevelKey::List("a"), LevelKey::Index(1)]
        );
        state.focus_next();
        assert_eq!(state.real_focus(), &RealFocus::Sticky("a-filter"));

        // The sibling opens within the same event, before the first one unmounts.
        state.open_sub_list(0, "b");
        assert_eq!(
            state.path().as_slice(),
            &[LevelKey::List("b"), LevelKey::First]
        );
        assert!(!state.levels().is_registered(1));
        assert_eq!(state.real_focus(), &RealFocus::Trap);

        state.unregister_level(1);
        state.register_level(1, LevelState::with_count(3));
        assert_eq!(
            state.path().as_slice(),
            &[LevelKey::List("b"), LevelKey::Index(0)]
        );
    }

    #[test]
    fn leaving_a_sub_list_drops_its_registration() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.register_level(0, LevelState::with_count(2).with_sub_list("a", 0));
        state.open();
        state.open_sub_list(0, "a");
        state.register_level(1, LevelState::with_count(3).with_sticky(0, "a-filter", true));

        // Hovering a sibling in the parent closes the sub-list.
        state.set_focus(FocusPath::from_indices([1]));
        assert!(!state.levels().is_registered(1));
        assert_eq!(state.real_focus(), &RealFocus::Trap);

        state.open_sub_list(0, "a");
        state.register_level(1, LevelState::with_count(3));
        state.close_level(1);
        assert!(!state.levels().is_registered(1));
        assert!(state.levels().is_registered(0));

        state.open_sub_list(0, "a");
        state.register_level(1, LevelState::with_count(3));
        state.close();
        assert_eq!(state.levels().depth(), 1);
        // The root list survives a close and reopens without re-registering.
        state.open();
        assert_eq!(state.path(), &FocusPath::from_indices([0]));
    }

    #[test]
    fn filter_without_results_focuses_no_item() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.register_level(0, LevelState::with_count(1).with_sticky(0, "filter", true));
        state.open();
        assert_eq!(state.path(), &FocusPath::from_indices([0]));
        assert!(!state.is_virtually_focused(0, &LevelKey::Index(0)));
        assert!(!state.is_virtually_focused(0, &LevelKey::Index(1)));
        assert_eq!(state.real_focus(), &RealFocus::Sticky("filter"));

        state.focus_next();
        assert_eq!(state.path(), &FocusPath::from_indices([0]));

        // Results come back: focus moves off the filter onto the first one.
        state.register_level(0, LevelState::with_count(3).with_sticky(0, "filter", true));
        assert_eq!(state.path(), &FocusPath::from_indices([1]));
        assert!(state.is_virtually_focused(0, &LevelKey::Index(1)));
    }

    #[test]
    fn open_sub_list_beyond_path_is_ignored() {
        let mut state = state_with_root(2);
        state.open();
        state.open_sub_list(3, "deep");
        assert_eq!(state.path(), &FocusPath::from_indices([0]));
    }

    #[test]
    fn trigger_close_empties_path() {
        let mut state = state_with_root(3);
        state.open();
        state.actions_mut().set(|_| AfterAction::Close, 1);
        assert_eq!(state.trigger_action(None), ActionOutcome::Closed);
        assert!(!state.is_open());
    }

    #[test]
    fn trigger_keep_open_leaves_path() {
        let mut state = state_with_root(3);
        state.open();
        state.focus_next();
        state.actions_mut().set(|_| AfterAction::KeepOpen, 1);
        assert_eq!(state.trigger_action(Some(9)), ActionOutcome::KeptOpen);
        assert_eq!(state.path(), &FocusPath::from_indices([1]));
    }

    #[test]
    fn trigger_without_action_is_noop() {
        let mut state = state_with_root(3);
        state.open();
        assert_eq!(state.trigger_action(None), ActionOutcome::NoAction);
        assert!(state.is_open());
    }

    #[test]
    fn trigger_opens_sub_list_at_tip() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.register_level(0, LevelState::with_count(3).with_sub_list("more", 2));
        state.set_focus(FocusPath::from_indices([2]));
        state
            .actions_mut()
            .set(|_| AfterAction::OpenSubList("more"), 0);
        assert_eq!(state.trigger_action(None), ActionOutcome::OpenedSubList);
        state.register_level(1, LevelState::with_count(2));
        assert_eq!(
            state.path().as_slice(),
            &[LevelKey::List("more"), LevelKey::Index(0)]
        );
    }

    #[test]
    fn opener_matches_by_slot_or_id() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.register_level(0, LevelState::with_count(3).with_sub_list("more", 2));
        state.set_focus(FocusPath::from_indices([2]));
        assert!(state.is_virtually_focused(0, &LevelKey::List("more")));
        assert!(state.is_virtually_focused(0, &LevelKey::Index(2)));
        assert!(!state.is_virtually_focused(0, &LevelKey::Index(1)));

        state.open_sub_list(0, "more");
        // The opener is still on the path, but no longer the virtual focus.
        assert!(state.is_on_path(0, &LevelKey::Index(2)));
        assert!(!state.is_virtually_focused(0, &LevelKey::Index(2)));
    }

    #[test]
    fn pending_key_matches_nothing() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.open();
        assert!(!state.is_virtually_focused(0, &LevelKey::First));
        assert!(!state.is_virtually_focused(0, &LevelKey::Index(0)));
    }

    #[test]
    fn item_actions_follow_focus_without_clobbering() {
        let mut state = state_with_root(2);
        state.open();
        let mut first = None;
        let mut second = None;

        let sync = |state: &mut State, idx: usize, slot: &mut Option<ActionToken>| {
            state.sync_item_action(0, &LevelKey::Index(idx), slot, |actions| {
                actions.set(|_| AfterAction::KeepOpen, idx as u32)
            });
        };

        sync(&mut state, 0, &mut first);
        sync(&mut state, 1, &mut second);
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(state.actions().value(), Some(&0));

        // Focus moves; the newly focused item re-renders before the old one.
        state.focus_next();
        sync(&mut state, 1, &mut second);
        sync(&mut state, 0, &mut first);
        assert!(first.is_none());
        assert_eq!(state.actions().value(), Some(&1));

        state.release_item_action(&mut second);
        assert!(!state.actions().has_action());
    }

    #[test]
    fn sink_receives_only_changes() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.register_level(0, LevelState::with_count(4).with_sticky(2, "create", false));
        state.open();
        state.focus_next();
        state.focus_next();
        state.focus_next();
        state.close();
        // Moving past the inline control leaves real focus on it; closing
        // releases focus without a request.
        assert_eq!(
            state.sink().events,
            [RealFocus::Trap, RealFocus::Sticky("create")]
        );
        assert_eq!(state.real_focus(), &RealFocus::None);
    }

    #[test]
    fn refocus_redelivers_current_target() {
        let mut state = state_with_root(2);
        state.open();
        state.refocus();
        assert_eq!(state.sink().events, [RealFocus::Trap, RealFocus::Trap]);
    }

    #[test]
    fn reset_focus_is_idempotent_and_respects_closed() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.register_level(0, LevelState::with_count(3).with_sticky(0, "filter", true));
        state.reset_focus();
        assert!(!state.is_open());

        state.open();
        state.focus_next();
        state.reset_focus();
        let once = state.path().clone();
        state.reset_focus();
        assert_eq!(state.path(), &once);
        assert_eq!(once, FocusPath::from_indices([1]));
    }

    #[test]
    fn update_focus_reads_latest_path() {
        let mut state = state_with_root(5);
        state.open();
        for _ in 0..3 {
            state.update_focus(|path| {
                let next = path.tip().and_then(LevelKey::index).map_or(0, |i| i + 1);
                FocusPath::from_indices([next])
            });
        }
        assert_eq!(state.path(), &FocusPath::from_indices([3]));
    }

    #[test]
    fn unregister_keeps_path_and_drops_sub_level_sticky_focus() {
        let mut state: State = ListState::with_sink(RecordingSink::default());
        state.register_level(0, LevelState::with_count(3).with_sub_list("more", 0));
        state.register_level(1, LevelState::with_count(2).with_sticky(0, "search", true));
        state.set_focus(FocusPath::from_keys([LevelKey::List("more"), LevelKey::Index(1)]));
        assert_eq!(state.real_focus(), &RealFocus::Sticky("search"));

        state.unregister_level(1);
        assert_eq!(state.depth(), 2);
        assert_eq!(state.real_focus(), &RealFocus::Trap);
    }
}
