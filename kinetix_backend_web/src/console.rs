// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace sink writing to the browser console.

use alloc::format;

use kinetix_core::config::ProbeError;
use kinetix_core::key::ElementKey;
use kinetix_core::trace::{
    FlushEvent, LifecycleEvent, MeasurementEvent, NotifyEvent, TraceSink, TransitionEvent,
    VerdictEvent,
};
use web_sys::console;

/// A [`TraceSink`] that logs every event with `console.debug`.
///
/// Predicate failures go to `console.warn`. Events only reach the sink when
/// the `trace` feature is enabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

fn debug(line: &str) {
    console::debug_1(&line.into());
}

impl TraceSink for ConsoleSink {
    fn on_measurement(&mut self, e: &MeasurementEvent) {
        debug(&format!(
            "kinetix: measure {:?} y={:.1} ratio={:.3} intersecting={}",
            e.key, e.y, e.ratio, e.is_intersecting
        ));
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        debug(&format!(
            "kinetix: label {:?} {:?} -> {:?}",
            e.key, e.from, e.to
        ));
    }

    fn on_verdict(&mut self, e: &VerdictEvent) {
        debug(&format!(
            "kinetix: verdict {:?} {:?} repeat={} applied={}",
            e.key, e.verdict.activation, e.repeat, e.applied
        ));
    }

    fn on_notify(&mut self, e: &NotifyEvent) {
        debug(&format!("kinetix: notify {:?} {:?}", e.key, e.kind));
    }

    fn on_unobserve(&mut self, key: ElementKey) {
        debug(&format!("kinetix: unobserve {key:?}"));
    }

    fn on_flush(&mut self, e: &FlushEvent) {
        debug(&format!(
            "kinetix: flush applied={} coalesced={} latency={}us",
            e.applied,
            e.coalesced,
            e.latency.ticks()
        ));
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        debug(&format!("kinetix: {:?}", e.kind));
    }

    fn on_probe_failed(&mut self, error: &ProbeError) {
        console::warn_1(&format!("kinetix: {error}; staying disabled").into());
    }
}
