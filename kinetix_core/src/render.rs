// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-coalesced style mutations.
//!
//! Decisions are made synchronously inside a measurement delivery, but the
//! resulting style writes wait for the next paint frame. [`RenderQueue`]
//! holds at most one pending mutation per element: enqueueing again before
//! the frame replaces the earlier mutation (last write wins), so an element
//! is never written twice in one frame.
//!
//! Pending elements are marked on the [`PENDING`] channel of an
//! [`understory_dirty`] tracker, and [`RenderQueue::flush`] drains that
//! channel to find the slots to apply.

use alloc::vec::Vec;

use understory_dirty::{Channel, CycleHandling, DirtyTracker};

use crate::config::Animation;
use crate::decide::Activation;
use crate::host::Presenter;
use crate::key::ElementKey;
use crate::time::HostTime;

/// Element has a style mutation waiting for the next frame.
pub const PENDING: Channel = Channel::new(0);

/// Vertical translation applied by the slide style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Translate {
    /// Resting position, `translateY(0)`.
    Neutral,
    /// Fully off-axis upwards, `translateY(-200%)`.
    Up,
    /// Fully off-axis downwards, `translateY(200%)`.
    Down,
}

impl Translate {
    /// CSS `transform` value.
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::Neutral => "translateY(0)",
            Self::Up => "translateY(-200%)",
            Self::Down => "translateY(200%)",
        }
    }

    /// Edge an element slides out through when deactivated.
    ///
    /// An element whose top edge is above the viewport (`y < 0`) slides up,
    /// anything else slides down. Directional labels do not take part.
    #[must_use]
    pub fn exit_edge(y: f64) -> Self {
        if y < 0.0 { Self::Up } else { Self::Down }
    }
}

/// One visual write.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleMutation {
    /// New `transform`, or `None` to leave it untouched.
    pub translate: Option<Translate>,
    /// New opacity.
    pub opacity: f32,
}

impl StyleMutation {
    /// Builds the write for a transition, or `None` when the style has no
    /// visual for it.
    #[must_use]
    pub fn for_transition(animation: Animation, activation: Activation, y: f64) -> Option<Self> {
        match (animation, activation) {
            (_, Activation::Idle) | (Animation::None, _) => None,
            (Animation::Slide, Activation::Activate) => Some(Self {
                translate: Some(Translate::Neutral),
                opacity: 1.0,
            }),
            (Animation::Slide, Activation::Deactivate) => Some(Self {
                translate: Some(Translate::exit_edge(y)),
                opacity: 0.0,
            }),
            (Animation::Fade, Activation::Activate) => Some(Self {
                translate: None,
                opacity: 1.0,
            }),
            (Animation::Fade, Activation::Deactivate) => Some(Self {
                translate: None,
                opacity: 0.0,
            }),
        }
    }
}

/// A mutation waiting for the next frame.
#[derive(Clone, Debug)]
pub struct PendingMutation<E> {
    /// Target element.
    pub element: E,
    /// Write to apply.
    pub mutation: StyleMutation,
    /// Transition that produced the write.
    pub activation: Activation,
    /// When the write was queued.
    pub queued_at: HostTime,
}

/// Counters reported by one [`RenderQueue::flush`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Mutations applied.
    pub applied: u32,
    /// Mutations replaced before they could be applied.
    pub coalesced: u32,
    /// Oldest `queued_at` among the applied mutations.
    pub oldest: Option<HostTime>,
}

/// Single-slot-per-element queue of pending style mutations.
pub struct RenderQueue<E> {
    slots: Vec<Option<PendingMutation<E>>>,
    dirty: DirtyTracker<u32>,
    pending: usize,
    coalesced: u32,
}

impl<E> core::fmt::Debug for RenderQueue<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderQueue")
            .field("slots_len", &self.slots.len())
            .field("pending", &self.pending)
            .field("coalesced", &self.coalesced)
            .finish_non_exhaustive()
    }
}

impl<E> Default for RenderQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RenderQueue<E> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending: 0,
            coalesced: 0,
        }
    }

    /// Number of elements with a pending mutation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending
    }

    /// Returns `true` when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    /// Returns the pending mutation for `key`, if any.
    #[must_use]
    pub fn pending(&self, key: ElementKey) -> Option<&PendingMutation<E>> {
        self.slots.get(key.idx as usize).and_then(Option::as_ref)
    }

    /// Queues `mutation` for `key`, replacing any mutation already pending
    /// for it.
    ///
    /// Returns `true` when the queue was empty before, i.e. when the caller
    /// must request a frame.
    pub fn enqueue(&mut self, key: ElementKey, mutation: PendingMutation<E>) -> bool {
        let was_empty = self.pending == 0;
        let slot = key.idx as usize;
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        if self.slots[slot].replace(mutation).is_some() {
            self.coalesced += 1;
        } else {
            self.pending += 1;
        }
        self.dirty.mark(key.idx, PENDING);
        was_empty
    }

    /// Applies every pending mutation exactly once through `presenter`.
    pub fn flush<P>(&mut self, presenter: &mut P) -> FlushStats
    where
        P: Presenter<Element = E>,
    {
        let due: Vec<u32> = self
            .dirty
            .drain(PENDING)
            .affected()
            .deterministic()
            .run()
            .collect();

        let mut stats = FlushStats {
            coalesced: core::mem::take(&mut self.coalesced),
            ..FlushStats::default()
        };
        for idx in due {
            let Some(pending) = self.slots.get_mut(idx as usize).and_then(Option::take) else {
                continue;
            };
            presenter.apply(&pending.element, &pending.mutation);
            stats.applied += 1;
            stats.oldest = Some(match stats.oldest {
                Some(t) => t.min(pending.queued_at),
                None => pending.queued_at,
            });
        }
        self.pending = 0;
        stats
    }
}
