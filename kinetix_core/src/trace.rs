// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the visibility pipeline.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! controller calls at each stage: measurement, classification, decision,
//! notification, unobserve, frame flush and lifecycle changes. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::classify::{Direction, Transition};
use crate::config::ProbeError;
use crate::decide::Verdict;
use crate::host::NotificationKind;
use crate::key::ElementKey;
use crate::time::{Duration, HostTime};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which lifecycle step happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    /// A subscription was created and `observed` elements subscribed.
    Enabled {
        /// Elements subscribed during discovery.
        observed: u32,
    },
    /// The subscription was torn down and the disabled marker set.
    Disabled,
    /// A reset started (teardown and wipe).
    Reset {
        /// Elements whose animated flag was cleared.
        cleared: u32,
    },
    /// Discovery ran against the live subscription.
    Updated {
        /// Newly subscribed elements.
        added: u32,
    },
    /// The host could not create a subscription.
    SubscribeFailed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for every measurement in a delivered batch, before classification.
#[derive(Clone, Copy, Debug)]
pub struct MeasurementEvent {
    /// Element the measurement belongs to.
    pub key: ElementKey,
    /// Vertical position.
    pub y: f64,
    /// Intersection ratio.
    pub ratio: f64,
    /// Whether the element overlaps the viewport.
    pub is_intersecting: bool,
    /// Host time of the delivery.
    pub at: HostTime,
}

/// Emitted when the directional label changes.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// Element whose label changed.
    pub key: ElementKey,
    /// Previous label.
    pub from: Direction,
    /// New label.
    pub to: Direction,
}

impl TransitionEvent {
    /// Creates an event from a classifier [`Transition`].
    #[must_use]
    pub fn new(key: ElementKey, transition: &Transition) -> Self {
        Self {
            key,
            from: transition.from,
            to: transition.to,
        }
    }
}

/// Emitted after the activation decision for each measurement.
#[derive(Clone, Copy, Debug)]
pub struct VerdictEvent {
    /// Element the verdict is for.
    pub key: ElementKey,
    /// The verdict.
    pub verdict: Verdict,
    /// Resolved repeat policy.
    pub repeat: bool,
    /// Whether the verdict changed the animated flag (and so fired a
    /// notification).
    pub applied: bool,
}

/// Emitted when a notification is sent.
#[derive(Clone, Copy, Debug)]
pub struct NotifyEvent {
    /// Element the notification is about.
    pub key: ElementKey,
    /// Enter or exit.
    pub kind: NotificationKind,
    /// Host time of emission.
    pub at: HostTime,
}

/// Emitted when a paint frame flushes the render queue.
#[derive(Clone, Copy, Debug)]
pub struct FlushEvent {
    /// Mutations applied.
    pub applied: u32,
    /// Mutations replaced before the frame.
    pub coalesced: u32,
    /// Time between the oldest applied mutation being queued and the flush.
    pub latency: Duration,
    /// Host time of the flush.
    pub at: HostTime,
}

/// Emitted on lifecycle changes.
#[derive(Clone, Copy, Debug)]
pub struct LifecycleEvent {
    /// What happened.
    pub kind: LifecycleKind,
    /// Host time.
    pub at: HostTime,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the controller.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called for each delivered measurement.
    fn on_measurement(&mut self, e: &MeasurementEvent) {
        _ = e;
    }

    /// Called when an element's directional label changes.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called after each activation decision.
    fn on_verdict(&mut self, e: &VerdictEvent) {
        _ = e;
    }

    /// Called when an enter or exit notification is emitted.
    fn on_notify(&mut self, e: &NotifyEvent) {
        _ = e;
    }

    /// Called when a retired element is unsubscribed.
    fn on_unobserve(&mut self, key: ElementKey) {
        _ = key;
    }

    /// Called when a paint frame flushes pending mutations.
    fn on_flush(&mut self, e: &FlushEvent) {
        _ = e;
    }

    /// Called on lifecycle changes.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called when the `disabled` predicate fails (treated as disabled).
    fn on_probe_failed(&mut self, error: &ProbeError) {
        _ = error;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Generates a forwarding method per event.
macro_rules! forward {
    ($(#[$doc:meta] $name:ident => $method:ident($ty:ty);)*) => {
        $(
            #[$doc]
            #[inline]
            pub fn $name(&mut self, e: $ty) {
                #[cfg(feature = "trace")]
                if let Some(s) = &mut self.sink {
                    s.$method(e);
                }
                #[cfg(not(feature = "trace"))]
                {
                    _ = e;
                }
            }
        )*
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward! {
        /// Emits a [`MeasurementEvent`].
        measurement => on_measurement(&MeasurementEvent);
        /// Emits a [`TransitionEvent`].
        transition => on_transition(&TransitionEvent);
        /// Emits a [`VerdictEvent`].
        verdict => on_verdict(&VerdictEvent);
        /// Emits a [`NotifyEvent`].
        notify => on_notify(&NotifyEvent);
        /// Emits an unobserve event.
        unobserve => on_unobserve(ElementKey);
        /// Emits a [`FlushEvent`].
        flush => on_flush(&FlushEvent);
        /// Emits a [`LifecycleEvent`].
        lifecycle => on_lifecycle(&LifecycleEvent);
        /// Emits a predicate failure.
        probe_failed => on_probe_failed(&ProbeError);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decide::decide;

    fn key() -> ElementKey {
        ElementKey::from_parts(1, 0)
    }

    #[test]
    fn transition_event_from_transition() {
        let t = Transition {
            from: Direction::None,
            to: Direction::EnteringFromBottom,
        };
        let e = TransitionEvent::new(key(), &t);
        assert_eq!(e.key, key());
        assert_eq!(e.from, Direction::None);
        assert_eq!(e.to, Direction::EnteringFromBottom);
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_unobserve(key());
        sink.on_verdict(&VerdictEvent {
            key: key(),
            verdict: decide(0.7, 0.5, true, Direction::None),
            repeat: true,
            applied: true,
        });
        sink.on_lifecycle(&LifecycleEvent {
            kind: LifecycleKind::Disabled,
            at: HostTime(0),
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.unobserve(key());
        tracer.flush(&FlushEvent {
            applied: 1,
            coalesced: 0,
            latency: Duration::ZERO,
            at: HostTime(0),
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        use crate::decide::Activation;

        struct RecordingSink {
            verdicts: Vec<Activation>,
        }
        impl TraceSink for RecordingSink {
            fn on_verdict(&mut self, e: &VerdictEvent) {
                self.verdicts.push(e.verdict.activation);
            }
        }

        let mut sink = RecordingSink {
            verdicts: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.verdict(&VerdictEvent {
            key: key(),
            verdict: decide(0.2, 0.5, true, Direction::None),
            repeat: true,
            applied: false,
        });
        drop(tracer);
        assert_eq!(sink.verdicts, &[Activation::Deactivate]);
    }

    #[cfg(not(feature = "trace"))]
    #[test]
    fn tracer_without_feature_discards() {
        struct PanickingSink;
        impl TraceSink for PanickingSink {
            fn on_notify(&mut self, _: &NotifyEvent) {
                panic!("events must not reach the sink without the trace feature");
            }
        }

        let mut sink = PanickingSink;
        let mut tracer = Tracer::new(&mut sink);
        tracer.notify(&NotifyEvent {
            key: key(),
            kind: NotificationKind::Enter,
            at: HostTime(0),
        });
    }
}
