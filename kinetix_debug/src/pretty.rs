// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].

use std::io::Write;

use kinetix_core::config::ProbeError;
use kinetix_core::decide::Activation;
use kinetix_core::host::NotificationKind;
use kinetix_core::key::ElementKey;
use kinetix_core::time::{HostTime, Timebase};
use kinetix_core::trace::{
    FlushEvent, LifecycleEvent, LifecycleKind, MeasurementEvent, NotifyEvent, TraceSink,
    TransitionEvent, VerdictEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
    measurements: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .field("measurements", &self.measurements)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self::with_writer(Box::new(std::io::stderr()), timebase)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self {
            writer,
            timebase,
            measurements: true,
        }
    }

    /// Skips `[measure]` lines, which dominate the output while scrolling.
    #[must_use]
    pub fn without_measurements(mut self) -> Self {
        self.measurements = false;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn us(&self, ticks: u64) -> f64 {
        self.timebase.ticks_to_nanos(ticks) as f64 / 1000.0
    }

    fn at(&self, t: HostTime) -> f64 {
        self.us(t.ticks())
    }
}

fn key(k: ElementKey) -> String {
    format!("#{}.{}", k.index(), k.generation())
}

fn activation_name(a: Activation) -> &'static str {
    match a {
        Activation::Activate => "activate",
        Activation::Deactivate => "deactivate",
        Activation::Idle => "idle",
    }
}

fn label(name: &'static str) -> &'static str {
    if name.is_empty() { "none" } else { name }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_measurement(&mut self, e: &MeasurementEvent) {
        if !self.measurements {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[measure] {} y={:.1} ratio={:.3} intersecting={} at {:.1}µs",
            key(e.key),
            e.y,
            e.ratio,
            e.is_intersecting,
            self.at(e.at),
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[label] {} {} -> {}",
            key(e.key),
            label(e.from.as_str()),
            label(e.to.as_str()),
        );
    }

    fn on_verdict(&mut self, e: &VerdictEvent) {
        let repeat = if e.repeat { "always" } else { "once" };
        let applied = if e.applied { "applied" } else { "skipped" };
        let _ = writeln!(
            self.writer,
            "[verdict] {} {} repeat={repeat} {applied}",
            key(e.key),
            activation_name(e.verdict.activation),
        );
    }

    fn on_notify(&mut self, e: &NotifyEvent) {
        let kind = match e.kind {
            NotificationKind::Enter => "enter",
            NotificationKind::Exit => "exit",
        };
        let _ = writeln!(
            self.writer,
            "[notify] {} {kind} at {:.1}µs",
            key(e.key),
            self.at(e.at),
        );
    }

    fn on_unobserve(&mut self, k: ElementKey) {
        let _ = writeln!(self.writer, "[unobserve] {}", key(k));
    }

    fn on_flush(&mut self, e: &FlushEvent) {
        let _ = writeln!(
            self.writer,
            "[flush] applied={} coalesced={} latency={:.1}µs at {:.1}µs",
            e.applied,
            e.coalesced,
            self.us(e.latency.ticks()),
            self.at(e.at),
        );
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        let what = match e.kind {
            LifecycleKind::Enabled { observed } => format!("enabled observed={observed}"),
            LifecycleKind::Disabled => "disabled".to_owned(),
            LifecycleKind::Reset { cleared } => format!("reset cleared={cleared}"),
            LifecycleKind::Updated { added } => format!("updated added={added}"),
            LifecycleKind::SubscribeFailed => "subscribe FAILED".to_owned(),
        };
        let _ = writeln!(self.writer, "[lifecycle] {what} at {:.1}µs", self.at(e.at));
    }

    fn on_probe_failed(&mut self, error: &ProbeError) {
        let _ = writeln!(self.writer, "[probe] {error}; treated as disabled");
    }
}
