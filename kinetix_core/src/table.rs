// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays side-table of per-element tracking state.
//!
//! The table is the typed replacement for state a DOM implementation would
//! stash in attributes: for each tracked element it records whether the
//! entrance has played (`animated`), the current directional label, the
//! previous sample (`history`) and whether the element is currently
//! subscribed to the measurement source.
//!
//! Rows are addressed by [`ElementKey`]. Released rows are recycled through
//! a free list and generation counters turn every outstanding key for a
//! released row into a stale key. [`clear`](ElementTable::clear) releases
//! every row at once, which is how a reset wipes history.

use alloc::vec::Vec;

use crate::classify::{Direction, History};
use crate::key::ElementKey;

/// Per-element state tracked by the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackedElement {
    /// Whether the entrance has played and not been reversed since.
    pub animated: bool,
    /// Current directional label.
    pub direction: Direction,
    /// Previous sample, compared against by the classifier.
    pub history: History,
}

/// Storage for all tracked elements.
#[derive(Debug, Default)]
pub struct ElementTable {
    // -- Row data --
    pub(crate) animated: Vec<bool>,
    pub(crate) direction: Vec<Direction>,
    pub(crate) history: Vec<History>,
    pub(crate) observed: Vec<bool>,

    // -- Allocation --
    pub(crate) live: Vec<bool>,
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
}

impl ElementTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Allocation API --

    /// Allocates a fresh row and returns its key.
    ///
    /// The row starts not animated, with no label, an all-zero history and
    /// not observed.
    pub fn insert(&mut self) -> ElementKey {
        let idx = if let Some(idx) = self.free_list.pop() {
            let slot = idx as usize;
            self.animated[slot] = false;
            self.direction[slot] = Direction::None;
            self.history[slot] = History::default();
            self.observed[slot] = false;
            self.live[slot] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.animated.push(false);
            self.direction.push(Direction::None);
            self.history.push(History::default());
            self.observed.push(false);
            self.live.push(true);
            self.generation.push(0);
            idx
        };

        ElementKey {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Returns `key` if it is still live, otherwise allocates a new row.
    ///
    /// The boolean is `true` when a row was allocated. Hosts pass the key
    /// they had bound to the element (if any) and re-bind the returned key
    /// when it differs.
    pub fn resolve(&mut self, key: Option<ElementKey>) -> (ElementKey, bool) {
        match key {
            Some(key) if self.is_alive(key) => (key, false),
            _ => (self.insert(), true),
        }
    }

    /// Releases a row. Stale keys are ignored.
    pub fn release(&mut self, key: ElementKey) {
        if !self.is_alive(key) {
            return;
        }
        let slot = key.idx as usize;
        self.live[slot] = false;
        self.generation[slot] = self.generation[slot].wrapping_add(1);
        self.free_list.push(key.idx);
    }

    /// Releases every row, invalidating all outstanding keys.
    pub fn clear(&mut self) {
        for idx in 0..self.len {
            let slot = idx as usize;
            if self.live[slot] {
                self.live[slot] = false;
                self.generation[slot] = self.generation[slot].wrapping_add(1);
                self.free_list.push(idx);
            }
        }
    }

    /// Returns whether the key refers to a live row.
    #[must_use]
    pub fn is_alive(&self, key: ElementKey) -> bool {
        key.idx < self.len
            && self.live[key.idx as usize]
            && self.generation[key.idx as usize] == key.generation
    }

    /// Returns the number of live rows.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.iter().filter(|&&live| live).count()
    }

    /// Iterates over the keys of all live rows, in slot order.
    pub fn keys(&self) -> impl Iterator<Item = ElementKey> + '_ {
        (0..self.len)
            .filter(|&idx| self.live[idx as usize])
            .map(|idx| ElementKey {
                idx,
                generation: self.generation[idx as usize],
            })
    }

    // -- Row access --

    /// Returns a copy of the row for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key is stale.
    #[must_use]
    pub fn get(&self, key: ElementKey) -> TrackedElement {
        self.validate(key);
        let slot = key.idx as usize;
        TrackedElement {
            animated: self.animated[slot],
            direction: self.direction[slot],
            history: self.history[slot],
        }
    }

    /// Returns whether the element's entrance has played.
    #[must_use]
    pub fn animated(&self, key: ElementKey) -> bool {
        self.validate(key);
        self.animated[key.idx as usize]
    }

    /// Sets the animated flag, returning the previous value.
    pub fn set_animated(&mut self, key: ElementKey, animated: bool) -> bool {
        self.validate(key);
        core::mem::replace(&mut self.animated[key.idx as usize], animated)
    }

    /// Returns the current directional label.
    #[must_use]
    pub fn direction(&self, key: ElementKey) -> Direction {
        self.validate(key);
        self.direction[key.idx as usize]
    }

    /// Sets the directional label.
    pub fn set_direction(&mut self, key: ElementKey, direction: Direction) {
        self.validate(key);
        self.direction[key.idx as usize] = direction;
    }

    /// Returns the previous sample for mutation by the classifier.
    pub fn history_mut(&mut self, key: ElementKey) -> &mut History {
        self.validate(key);
        &mut self.history[key.idx as usize]
    }

    /// Returns whether the element is subscribed to the measurement source.
    #[must_use]
    pub fn observed(&self, key: ElementKey) -> bool {
        self.validate(key);
        self.observed[key.idx as usize]
    }

    /// Records whether the element is subscribed.
    pub fn set_observed(&mut self, key: ElementKey, observed: bool) {
        self.validate(key);
        self.observed[key.idx as usize] = observed;
    }

    /// Marks every live row as unsubscribed.
    pub fn clear_observed(&mut self) {
        self.observed.iter_mut().for_each(|o| *o = false);
    }

    /// Panics if the key is stale.
    fn validate(&self, key: ElementKey) {
        assert!(
            self.is_alive(key),
            "stale ElementKey: {key:?} (current gen: {})",
            if key.idx < self.len {
                self.generation[key.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}
