// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines trace output.
//!
//! [`JsonLinesSink`] writes every event as one JSON object per line. Each
//! object has an `"event"` tag and a `"ts"` field in microseconds where the
//! event carries a timestamp.

use std::io::Write;

use serde_json::{Value, json};

use kinetix_core::config::ProbeError;
use kinetix_core::key::ElementKey;
use kinetix_core::time::{HostTime, Timebase};
use kinetix_core::trace::{
    FlushEvent, LifecycleEvent, LifecycleKind, MeasurementEvent, NotifyEvent, TraceSink,
    TransitionEvent, VerdictEvent,
};

/// Writes one JSON object per trace event.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to `writer`.
    #[must_use]
    pub fn new(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ts(&self, t: HostTime) -> u64 {
        self.timebase.ticks_to_micros(t.ticks())
    }

    fn emit(&mut self, value: &Value) {
        let _ = serde_json::to_writer(&mut self.writer, value);
        let _ = self.writer.write_all(b"\n");
    }
}

fn key(k: ElementKey) -> Value {
    json!([k.index(), k.generation()])
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_measurement(&mut self, e: &MeasurementEvent) {
        let v = json!({
            "event": "measurement",
            "key": key(e.key),
            "y": e.y,
            "ratio": e.ratio,
            "intersecting": e.is_intersecting,
            "ts": self.ts(e.at),
        });
        self.emit(&v);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let v = json!({
            "event": "transition",
            "key": key(e.key),
            "from": e.from.as_str(),
            "to": e.to.as_str(),
        });
        self.emit(&v);
    }

    fn on_verdict(&mut self, e: &VerdictEvent) {
        let v = json!({
            "event": "verdict",
            "key": key(e.key),
            "activation": format!("{:?}", e.verdict.activation),
            "continue_observing": e.verdict.continue_observing,
            "repeat": e.repeat,
            "applied": e.applied,
        });
        self.emit(&v);
    }

    fn on_notify(&mut self, e: &NotifyEvent) {
        let v = json!({
            "event": "notify",
            "key": key(e.key),
            "kind": format!("{:?}", e.kind),
            "ts": self.ts(e.at),
        });
        self.emit(&v);
    }

    fn on_unobserve(&mut self, k: ElementKey) {
        self.emit(&json!({ "event": "unobserve", "key": key(k) }));
    }

    fn on_flush(&mut self, e: &FlushEvent) {
        let v = json!({
            "event": "flush",
            "applied": e.applied,
            "coalesced": e.coalesced,
            "latency_us": self.timebase.ticks_to_micros(e.latency.ticks()),
            "ts": self.ts(e.at),
        });
        self.emit(&v);
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        let mut v = json!({ "event": "lifecycle", "ts": self.ts(e.at) });
        let (kind, extra) = match e.kind {
            LifecycleKind::Enabled { observed } => ("enabled", Some(("observed", observed))),
            LifecycleKind::Disabled => ("disabled", None),
            LifecycleKind::Reset { cleared } => ("reset", Some(("cleared", cleared))),
            LifecycleKind::Updated { added } => ("updated", Some(("added", added))),
            LifecycleKind::SubscribeFailed => ("subscribe_failed", None),
        };
        v["kind"] = json!(kind);
        if let Some((field, count)) = extra {
            v[field] = json!(count);
        }
        self.emit(&v);
    }

    fn on_probe_failed(&mut self, error: &ProbeError) {
        self.emit(&json!({ "event": "probe_failed", "reason": error.reason() }));
    }
}
