// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip coordination.
//!
//! At most one tooltip is open at a time. Showing a tooltip reports the one
//! that must hide, and a tooltip shown shortly after another one hid opens
//! without delay, so sweeping the pointer across a toolbar feels continuous.
//!
//! The coordinator is an explicit object owned by the application root and
//! passed to tooltip triggers; there is no global registry.
//!
//! ```
//! use understory_overlay::tooltip::{TooltipConfig, TooltipCoordinator};
//!
//! let mut tips: TooltipCoordinator<&str> = TooltipCoordinator::new();
//! tips.register("save");
//! tips.register("open");
//!
//! // Cold start: wait the full delay.
//! assert_eq!(tips.open_delay(0), TooltipConfig::default().show_delay);
//! assert_eq!(tips.show("save", 700), None);
//!
//! // Moving to a neighbour hides the first tooltip.
//! assert_eq!(tips.show("open", 900), Some("save"));
//! assert!(tips.hide(&"open", 1000));
//!
//! // Warm hand-off: right after a hide there is no delay.
//! assert_eq!(tips.open_delay(1100), 0);
//! assert_eq!(tips.open_delay(2000), 700);
//! ```

use core::hash::Hash;

use hashbrown::HashSet;

/// Timing thresholds, in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TooltipConfig {
    /// Delay before a tooltip opens from cold.
    pub show_delay: u64,
    /// How long after a hide the next tooltip may open without delay.
    pub skip_delay_window: u64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            show_delay: 700,
            skip_delay_window: 300,
        }
    }
}

/// Shared tooltip state for one application.
#[derive(Clone, Debug)]
pub struct TooltipCoordinator<K> {
    /// Thresholds used by [`open_delay`](Self::open_delay).
    pub config: TooltipConfig,
    registered: HashSet<K>,
    open: Option<K>,
    last_hide: Option<u64>,
}

impl<K: Clone + Eq + Hash> Default for TooltipCoordinator<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> TooltipCoordinator<K> {
    /// A coordinator with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TooltipConfig::default())
    }

    /// A coordinator with custom thresholds.
    #[must_use]
    pub fn with_config(config: TooltipConfig) -> Self {
        Self {
            config,
            registered: HashSet::new(),
            open: None,
            last_hide: None,
        }
    }

    /// Add a tooltip. Returns `false` if it was already registered.
    pub fn register(&mut self, id: K) -> bool {
        self.registered.insert(id)
    }

    /// Remove a tooltip, forgetting it if it was open.
    ///
    /// An unmounted tooltip does not start the warm hand-off window.
    pub fn unregister(&mut self, id: &K) -> bool {
        if self.open.as_ref() == Some(id) {
            self.open = None;
        }
        self.registered.remove(id)
    }

    /// Open tooltip `id` at time `now`.
    ///
    /// Returns the tooltip that was open before and must hide now. Unknown
    /// ids are ignored.
    pub fn show(&mut self, id: K, now: u64) -> Option<K> {
        if !self.registered.contains(&id) {
            log::warn!("ignoring show of an unregistered tooltip at {now}");
            return None;
        }
        if self.open.as_ref() == Some(&id) {
            return None;
        }
        log::trace!("tooltip shown at {now}");
        self.open.replace(id)
    }

    /// Close tooltip `id` at time `now`.
    ///
    /// Returns `false` if it was not the open tooltip.
    pub fn hide(&mut self, id: &K, now: u64) -> bool {
        if self.open.as_ref() != Some(id) {
            return false;
        }
        self.open = None;
        self.last_hide = Some(now);
        true
    }

    /// Whether `id` is the open tooltip.
    #[must_use]
    pub fn is_open(&self, id: &K) -> bool {
        self.open.as_ref() == Some(id)
    }

    /// The open tooltip, if any.
    #[must_use]
    pub fn open_tooltip(&self) -> Option<&K> {
        self.open.as_ref()
    }

    /// How long a tooltip asked to show at `now` should wait before opening.
    ///
    /// Zero while another tooltip is open or within
    /// [`skip_delay_window`](TooltipConfig::skip_delay_window) of the last hide.
    #[must_use]
    pub fn open_delay(&self, now: u64) -> u64 {
        if self.open.is_some() {
            return 0;
        }
        match self.last_hide {
            Some(hidden) if now.saturating_sub(hidden) <= self.config.skip_delay_window => 0,
            _ => self.config.show_delay,
        }
    }
}
