// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element identity handles.

use core::fmt;

/// A handle to a tracked element in an [`ElementTable`](crate::table::ElementTable).
///
/// Contains both a slot index and a generation counter so that keys bound to
/// elements before a table wipe are detected as stale instead of aliasing a
/// newer element that reuses the slot.
///
/// Hosts store the key next to the native element (for example in a
/// `WeakMap` keyed by the DOM node), so the key never keeps the element alive.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementKey {
    /// Slot index into the table's rows.
    pub(crate) idx: u32,
    /// Generation counter, must match the table's generation for this slot.
    pub(crate) generation: u32,
}

impl ElementKey {
    /// Rebuilds a key from the parts returned by [`index`](Self::index) and
    /// [`generation`](Self::generation).
    ///
    /// Hosts use this to restore a key they persisted next to a native
    /// element. A forged key is harmless: the table rejects it as stale.
    #[inline]
    #[must_use]
    pub const fn from_parts(index: u32, generation: u32) -> Self {
        Self {
            idx: index,
            generation,
        }
    }

    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementKey({}@gen{})", self.idx, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_round_trip() {
        let key = ElementKey::from_parts(7, 3);
        assert_eq!(ElementKey::from_parts(key.index(), key.generation()), key);
    }

    #[test]
    fn debug_shows_generation() {
        let key = ElementKey::from_parts(2, 5);
        assert_eq!(alloc::format!("{key:?}"), "ElementKey(2@gen5)");
    }
}
