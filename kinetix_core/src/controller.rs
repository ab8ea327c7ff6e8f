// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifecycle controller.
//!
//! [`Kinetix`] owns the configuration, the element table, the render queue
//! and at most one live subscription. Hosts drive it from two callbacks:
//! [`deliver`](Kinetix::deliver) for measurement batches and
//! [`on_frame`](Kinetix::on_frame) for paint frames.
//!
//! Applying a verdict is edge-triggered on the element's animated flag: an
//! activation only does something for an element that is not animated yet,
//! a deactivation only for one that is. Flag, class and notification change
//! synchronously inside the delivery; the style write waits for the frame.

use alloc::boxed::Box;
use core::fmt;

use crate::classify::{Direction, classify};
use crate::config::{Config, ConfigPatch};
use crate::decide::{Activation, Verdict, decide, resolve_repeat};
use crate::host::{Host, Notification, NotificationKind, ObserverOptions, Subscription};
use crate::key::ElementKey;
use crate::measurement::Measurement;
use crate::render::{PendingMutation, RenderQueue, StyleMutation};
use crate::table::ElementTable;
use crate::time::{Duration, HostTime};
use crate::trace::{
    FlushEvent, LifecycleEvent, LifecycleKind, MeasurementEvent, NotifyEvent, TraceSink, Tracer,
    TransitionEvent, VerdictEvent,
};

/// Where the controller is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// No subscription; deliveries are ignored.
    #[default]
    Disabled,
    /// A subscription is live.
    Enabled,
    /// Inside [`Kinetix::reset`], between teardown and re-enable.
    Resetting,
}

/// Scroll-triggered animation controller.
pub struct Kinetix<H: Host> {
    host: H,
    config: Config<H::Element>,
    table: ElementTable,
    queue: RenderQueue<H::Element>,
    subscription: Option<H::Subscription>,
    state: LifecycleState,
    frame_requested: bool,
    sink: Option<Box<dyn TraceSink>>,
}

impl<H: Host> fmt::Debug for Kinetix<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kinetix")
            .field("state", &self.state)
            .field("tracked", &self.table.live_count())
            .field("pending", &self.queue.len())
            .field("subscribed", &self.subscription.is_some())
            .field("frame_requested", &self.frame_requested)
            .finish_non_exhaustive()
    }
}

impl<H> Kinetix<H>
where
    H: Host,
    H::Element: Clone,
{
    /// Creates a disabled controller with the default configuration.
    pub fn new(host: H) -> Self {
        Self {
            host,
            config: Config::default(),
            table: ElementTable::new(),
            queue: RenderQueue::new(),
            subscription: None,
            state: LifecycleState::Disabled,
            frame_requested: false,
            sink: None,
        }
    }

    /// Routes trace events to `sink`. Events are only emitted when the
    /// `trace` feature is enabled.
    #[must_use]
    pub fn with_sink(self, sink: impl TraceSink + 'static) -> Self {
        self.with_boxed_sink(Box::new(sink))
    }

    /// Like [`with_sink`](Self::with_sink), for an already boxed sink.
    #[must_use]
    pub fn with_boxed_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &Config<H::Element> {
        &self.config
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Per-element tracking state.
    #[must_use]
    pub fn table(&self) -> &ElementTable {
        &self.table
    }

    /// Number of style mutations waiting for a frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Merges `patch` and enables unless the configuration says disabled.
    pub fn start(&mut self, patch: ConfigPatch<H::Element>) {
        self.config.merge(patch);
        if !self.is_disabled() {
            self.enable();
        }
    }

    /// Whether the configuration asks for the controller to stay off.
    ///
    /// A predicate is evaluated fresh on every call. A failing predicate
    /// counts as disabled.
    pub fn is_disabled(&mut self) -> bool {
        match self.config.disabled.evaluate() {
            Ok(disabled) => disabled,
            Err(error) => {
                self.tracer().probe_failed(&error);
                true
            }
        }
    }

    /// Removes the disabled marker, replaces any live subscription with a
    /// fresh one and subscribes every eligible element.
    pub fn enable(&mut self) {
        self.host
            .set_disabled_marker(&self.config.disabled_class_name, false);
        self.teardown();

        let options = ObserverOptions {
            root: self.config.root.as_ref(),
            root_margin: &self.config.root_margin,
            threshold: self.config.threshold,
        };
        let Some(subscription) = self.host.subscribe(options) else {
            self.state = LifecycleState::Disabled;
            self.lifecycle(LifecycleKind::SubscribeFailed);
            return;
        };
        self.subscription = Some(subscription);
        self.state = LifecycleState::Enabled;

        let observed = self.discover();
        self.lifecycle(LifecycleKind::Enabled { observed });
    }

    /// Sets the disabled marker and tears the subscription down. Calling it
    /// again is harmless.
    pub fn disable(&mut self) {
        self.host
            .set_disabled_marker(&self.config.disabled_class_name, true);
        self.teardown();
        self.state = LifecycleState::Disabled;
        self.lifecycle(LifecycleKind::Disabled);
    }

    /// Tears down, forgets every element, merges `patch` and enables again.
    ///
    /// Elements matched by the selector in effect before the merge get their
    /// animated flag and directional label cleared on the host.
    pub fn reset(&mut self, patch: ConfigPatch<H::Element>) {
        self.state = LifecycleState::Resetting;
        self.teardown();

        let mut cleared = 0;
        for element in self.host.query(&self.config.selector) {
            if let Some(key) = self.host.key_of(&element)
                && self.table.is_alive(key)
                && self.table.animated(key)
            {
                cleared += 1;
            }
            self.host
                .set_animated(&element, &self.config.animate_class_name, false);
            self.host.set_direction(&element, Direction::None);
        }
        self.table.clear();
        self.lifecycle(LifecycleKind::Reset { cleared });

        self.config.merge(patch);
        self.enable();
    }

    /// Subscribes elements that started matching the selector since the
    /// last discovery. Does nothing while disabled.
    pub fn update(&mut self) {
        if self.subscription.is_none() {
            return;
        }
        let added = self.discover();
        self.lifecycle(LifecycleKind::Updated { added });
    }

    /// Processes a measurement batch in source order.
    ///
    /// Batches arriving without a live subscription are ignored.
    pub fn deliver<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = Measurement<H::Element>>,
    {
        if self.subscription.is_none() {
            return;
        }
        let at = self.host.now();
        for measurement in batch {
            self.process(&measurement, at);
        }
    }

    /// Applies pending style mutations. Call from the frame callback
    /// requested through [`Host::request_frame`].
    pub fn on_frame(&mut self) {
        self.frame_requested = false;
        self.flush();
    }

    fn process(&mut self, measurement: &Measurement<H::Element>, at: HostTime) {
        let element = &measurement.target;
        let key = self.key_for(element);
        self.tracer().measurement(&MeasurementEvent {
            key,
            y: measurement.y(),
            ratio: measurement.ratio,
            is_intersecting: measurement.is_intersecting,
            at,
        });

        let current = self.table.direction(key);
        let transition = classify(measurement, self.table.history_mut(key), current);
        if transition.changed() {
            self.table.set_direction(key, transition.to);
            self.host.set_direction(element, transition.to);
            self.tracer()
                .transition(&TransitionEvent::new(key, &transition));
        }

        let repeat = resolve_repeat(self.host.repeat_override(element), self.config.once);
        let verdict = decide(
            measurement.ratio,
            self.config.threshold,
            repeat,
            transition.to,
        );
        let animated = self.table.animated(key);
        let kind = match verdict.activation {
            Activation::Activate if !animated => Some(NotificationKind::Enter),
            Activation::Deactivate if animated => Some(NotificationKind::Exit),
            _ => None,
        };
        if let Some(kind) = kind {
            self.apply(key, measurement, &verdict, kind, at);
        }
        self.tracer().verdict(&VerdictEvent {
            key,
            verdict,
            repeat,
            applied: kind.is_some(),
        });

        if !verdict.continue_observing {
            if let Some(subscription) = &mut self.subscription {
                subscription.unobserve(element);
            }
            self.table.set_observed(key, false);
            self.tracer().unobserve(key);
        }
    }

    fn apply(
        &mut self,
        key: ElementKey,
        measurement: &Measurement<H::Element>,
        verdict: &Verdict,
        kind: NotificationKind,
        at: HostTime,
    ) {
        let element = &measurement.target;
        let entering = kind == NotificationKind::Enter;
        self.table.set_animated(key, entering);
        self.host
            .set_animated(element, &self.config.animate_class_name, entering);

        if let Some(mutation) =
            StyleMutation::for_transition(self.config.animation, verdict.activation, measurement.y())
        {
            let pending = PendingMutation {
                element: element.clone(),
                mutation,
                activation: verdict.activation,
                queued_at: at,
            };
            if self.queue.enqueue(key, pending) && !self.frame_requested {
                self.frame_requested = true;
                self.host.request_frame();
            }
        }

        let name = match kind {
            NotificationKind::Enter => &self.config.enter_event_name,
            NotificationKind::Exit => &self.config.exit_event_name,
        };
        self.host.notify(Notification {
            kind,
            name,
            measurement,
        });
        self.tracer().notify(&NotifyEvent { key, kind, at });
    }

    /// Subscribes every selector match that is neither observed already nor
    /// retired (animated with no repeat).
    fn discover(&mut self) -> u32 {
        let Some(subscription) = &mut self.subscription else {
            return 0;
        };
        let mut added = 0;
        for element in self.host.query(&self.config.selector) {
            let (key, inserted) = self.table.resolve(self.host.key_of(&element));
            if inserted {
                self.host.bind_key(&element, key);
            }
            let retired = self.table.animated(key)
                && !resolve_repeat(self.host.repeat_override(&element), self.config.once);
            if retired || self.table.observed(key) {
                continue;
            }
            subscription.observe(&element);
            self.table.set_observed(key, true);
            added += 1;
        }
        added
    }

    fn teardown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.disconnect();
        }
        self.table.clear_observed();
        self.flush();
        if core::mem::take(&mut self.frame_requested) {
            self.host.cancel_frame();
        }
    }

    fn flush(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let stats = self.queue.flush(&mut self.host);
        let at = self.host.now();
        let latency = stats
            .oldest
            .map_or(Duration::ZERO, |oldest| at.saturating_duration_since(oldest));
        self.tracer().flush(&FlushEvent {
            applied: stats.applied,
            coalesced: stats.coalesced,
            latency,
            at,
        });
    }

    fn key_for(&mut self, element: &H::Element) -> ElementKey {
        let (key, inserted) = self.table.resolve(self.host.key_of(element));
        if inserted {
            self.host.bind_key(element, key);
        }
        key
    }

    fn lifecycle(&mut self, kind: LifecycleKind) {
        let at = self.host.now();
        self.tracer().lifecycle(&LifecycleEvent { kind, at });
    }

    fn tracer(&mut self) -> Tracer<'_> {
        match self.sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;

    use super::*;
    use crate::config::{Animation, Disabled, ProbeError};
    use crate::decide::RepeatOverride;
    use crate::render::Translate;
    use crate::testing::{NodeId, TestHost, sample};

    const SEL: &str = ".kinetix";

    fn started(host: TestHost, patch: ConfigPatch<NodeId>) -> Kinetix<TestHost> {
        let mut kinetix = Kinetix::new(host);
        kinetix.start(patch);
        kinetix
    }

    fn once() -> ConfigPatch<NodeId> {
        ConfigPatch {
            once: Some(true),
            ..ConfigPatch::default()
        }
    }

    fn label(kinetix: &Kinetix<TestHost>, id: NodeId) -> Direction {
        let key = kinetix.host().node(id).key.expect("element was keyed");
        kinetix.table().direction(key)
    }

    fn animated(kinetix: &Kinetix<TestHost>, id: NodeId) -> bool {
        let key = kinetix.host().node(id).key.expect("element was keyed");
        kinetix.table().animated(key)
    }

    #[test]
    fn start_subscribes_every_match() {
        let mut host = TestHost::new();
        let a = host.add(SEL);
        let b = host.add(SEL);
        let other = host.add(".other");

        let kinetix = started(host, ConfigPatch::default());
        assert_eq!(kinetix.state(), LifecycleState::Enabled);
        let host = kinetix.host();
        assert!(host.is_observed(a));
        assert!(host.is_observed(b));
        assert!(!host.is_observed(other));
        assert_eq!(host.subscribed_threshold, Some(0.5));
        assert_eq!(host.disabled_marker, None);
    }

    #[test]
    fn start_while_disabled_does_not_subscribe() {
        let mut host = TestHost::new();
        host.add(SEL);
        let kinetix = started(
            host,
            ConfigPatch {
                disabled: Some(Disabled::Static(true)),
                ..ConfigPatch::default()
            },
        );
        assert_eq!(kinetix.state(), LifecycleState::Disabled);
        assert_eq!(kinetix.host().log.borrow().connected, 0);
    }

    #[test]
    fn entering_from_bottom_once() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(host, once());

        kinetix.deliver([sample(el, 300.0, 0.0, false)]);
        assert_eq!(kinetix.host().enters(), 0);

        kinetix.deliver([sample(el, 100.0, 0.6, true)]);
        assert_eq!(label(&kinetix, el), Direction::EnteringFromBottom);
        assert!(animated(&kinetix, el));
        assert_eq!(kinetix.host().enters(), 1);
        assert_eq!(
            kinetix.host().notifications[0],
            (NotificationKind::Enter, String::from("animation:in"), el)
        );
        assert!(!kinetix.host().is_observed(el), "retired after one entrance");
        assert_eq!(kinetix.host().node(el).state, "slide-in-bottom");

        kinetix.on_frame();
        assert_eq!(
            kinetix.host().writes,
            vec![(
                el,
                StyleMutation {
                    translate: Some(Translate::Neutral),
                    opacity: 1.0
                }
            )]
        );

        // A straggling record above threshold changes nothing.
        kinetix.deliver([sample(el, 50.0, 0.9, true)]);
        kinetix.on_frame();
        assert_eq!(kinetix.host().enters(), 1);
        assert_eq!(kinetix.host().writes.len(), 1);
    }

    #[test]
    fn leaving_to_top_with_repeat() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(host, ConfigPatch::default());

        kinetix.deliver([sample(el, 100.0, 0.7, true)]);
        assert_eq!(kinetix.host().enters(), 1);

        kinetix.deliver([sample(el, 400.0, 0.3, false)]);
        assert_eq!(label(&kinetix, el), Direction::LeavingToTop);
        assert!(!animated(&kinetix, el));
        assert_eq!(kinetix.host().exits(), 1);
        assert!(kinetix.host().is_observed(el), "repeating elements stay subscribed");

        kinetix.on_frame();
        let (_, last) = *kinetix.host().writes.last().expect("exit was written");
        assert_eq!(last.translate, Some(Translate::Down), "below the viewport");
        assert_eq!(last.opacity, 0.0);
    }

    #[test]
    fn scrolling_past_slides_out_through_the_top() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(host, ConfigPatch::default());

        kinetix.deliver([sample(el, 100.0, 0.9, true)]);
        kinetix.on_frame();
        kinetix.deliver([sample(el, -60.0, 0.3, true)]);
        assert_eq!(label(&kinetix, el), Direction::LeavingToBottom);
        assert_eq!(kinetix.host().exits(), 1);

        kinetix.on_frame();
        let (_, last) = *kinetix.host().writes.last().expect("exit was written");
        assert_eq!(last.translate, Some(Translate::Up), "above the viewport");
        assert_eq!(last.opacity, 0.0);
    }

    #[test]
    fn label_stabilizes_while_entering_from_bottom() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(host, ConfigPatch::default());
        kinetix.deliver([sample(el, 600.0, 0.0, false)]);

        let mut y = 500.0;
        let mut ratio = 0.05;
        for _ in 0..8 {
            kinetix.deliver([sample(el, y, ratio, true)]);
            assert_eq!(label(&kinetix, el), Direction::EnteringFromBottom);
            y -= 40.0;
            ratio += 0.1;
        }
    }

    #[test]
    fn repeat_fires_once_per_crossing() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(host, ConfigPatch::default());

        kinetix.deliver([sample(el, 300.0, 0.6, true)]);
        kinetix.on_frame();
        kinetix.deliver([sample(el, 250.0, 0.8, true)]);
        kinetix.on_frame();
        kinetix.deliver([sample(el, 280.0, 0.55, true)]);
        kinetix.on_frame();
        kinetix.deliver([sample(el, 320.0, 0.9, true)]);
        kinetix.on_frame();
        assert_eq!(kinetix.host().enters(), 1);
        assert_eq!(kinetix.host().writes.len(), 1);

        kinetix.deliver([sample(el, 600.0, 0.1, true)]);
        kinetix.on_frame();
        kinetix.deliver([sample(el, 650.0, 0.0, false)]);
        kinetix.on_frame();

        let kinds: Vec<_> = kinetix.host().notifications.iter().map(|n| n.0).collect();
        assert_eq!(kinds, vec![NotificationKind::Enter, NotificationKind::Exit]);
        let opacities: Vec<_> = kinetix.host().writes.iter().map(|w| w.1.opacity).collect();
        assert_eq!(opacities, vec![1.0, 0.0]);
    }

    #[test]
    fn same_frame_mutations_collapse_to_latest() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(host, ConfigPatch::default());

        kinetix.deliver([sample(el, 200.0, 0.6, true), sample(el, 260.0, 0.2, true)]);
        assert_eq!(kinetix.pending(), 1);
        assert_eq!(kinetix.host().frame_requests, 1);
        assert_eq!(kinetix.host().enters(), 1);
        assert_eq!(kinetix.host().exits(), 1);

        kinetix.on_frame();
        assert_eq!(kinetix.host().writes.len(), 1);
        assert_eq!(kinetix.host().writes[0].1.opacity, 0.0, "latest verdict wins");
    }

    #[test]
    fn one_frame_request_per_frame() {
        let mut host = TestHost::new();
        let a = host.add(SEL);
        let b = host.add(SEL);
        let mut kinetix = started(host, ConfigPatch::default());

        kinetix.deliver([sample(a, 100.0, 0.9, true)]);
        kinetix.deliver([sample(b, 120.0, 0.9, true)]);
        assert_eq!(kinetix.host().frame_requests, 1);

        kinetix.on_frame();
        assert_eq!(kinetix.host().writes.len(), 2);

        kinetix.deliver([sample(a, 400.0, 0.1, true)]);
        assert_eq!(kinetix.host().frame_requests, 2);
    }

    #[test]
    fn reset_clears_animated_state() {
        let mut host = TestHost::new();
        let a = host.add(SEL);
        let b = host.add(SEL);
        let mut kinetix = started(host, once());

        kinetix.deliver([sample(a, 100.0, 0.9, true), sample(b, 300.0, 0.0, false)]);
        assert!(kinetix.host().node(a).animated);

        kinetix.reset(ConfigPatch::default());
        kinetix.enable();

        for id in [a, b] {
            let node = kinetix.host().node(id);
            assert!(!node.animated);
            assert_eq!(node.state, "");
            assert!(!animated(&kinetix, id));
            assert_eq!(label(&kinetix, id), Direction::None);
            assert!(kinetix.host().is_observed(id));
        }
    }

    #[test]
    fn reset_applies_new_settings() {
        let mut host = TestHost::new();
        let old = host.add(SEL);
        let new = host.add(".reveal");
        let mut kinetix = started(host, ConfigPatch::default());

        kinetix.reset(ConfigPatch {
            selector: Some(".reveal".into()),
            threshold: Some(0.25),
            ..ConfigPatch::default()
        });
        assert_eq!(kinetix.state(), LifecycleState::Enabled);
        assert_eq!(kinetix.host().subscribed_threshold, Some(0.25));
        assert!(kinetix.host().is_observed(new));
        assert!(!kinetix.host().is_observed(old));
    }

    #[test]
    fn disable_is_idempotent() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(host, ConfigPatch::default());

        kinetix.disable();
        kinetix.disable();
        assert_eq!(kinetix.state(), LifecycleState::Disabled);
        assert_eq!(kinetix.host().disabled_marker.as_deref(), Some("kinetix-disabled"));
        assert_eq!(kinetix.host().log.borrow().disconnects, 1);
        assert!(!kinetix.host().is_observed(el));
    }

    #[test]
    fn enable_replaces_the_live_subscription() {
        let mut host = TestHost::new();
        host.add(SEL);
        let mut kinetix = started(host, ConfigPatch::default());

        kinetix.enable();
        kinetix.enable();
        let log = kinetix.host().log.borrow();
        assert_eq!(log.connected, 1, "at most one subscription");
        assert_eq!(log.disconnects, 2);
    }

    #[test]
    fn deliveries_after_disable_are_ignored() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(host, ConfigPatch::default());

        kinetix.disable();
        kinetix.deliver([sample(el, 100.0, 0.9, true)]);
        assert_eq!(kinetix.host().enters(), 0);
        assert_eq!(kinetix.pending(), 0);
    }

    #[test]
    fn teardown_applies_pending_writes() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(host, ConfigPatch::default());

        kinetix.deliver([sample(el, 100.0, 0.9, true)]);
        assert_eq!(kinetix.pending(), 1);

        kinetix.disable();
        assert_eq!(kinetix.pending(), 0);
        assert_eq!(kinetix.host().writes.len(), 1);
        assert_eq!(kinetix.host().frames_cancelled, 1);

        // The cancelled frame may still fire on some hosts.
        kinetix.on_frame();
        assert_eq!(kinetix.host().writes.len(), 1);
    }

    #[test]
    fn update_only_adds_new_elements() {
        let mut host = TestHost::new();
        let first = host.add(SEL);
        let mut kinetix = started(host, once());
        kinetix.deliver([sample(first, 100.0, 0.9, true)]);

        let late = kinetix.host_mut().add(SEL);
        kinetix.update();

        let log = kinetix.host().log.borrow();
        assert_eq!(log.observe_calls, vec![first, late]);
        assert!(log.active.contains(&late));
        assert!(!log.active.contains(&first), "retired element stays unsubscribed");
    }

    #[test]
    fn update_while_disabled_does_nothing() {
        let mut host = TestHost::new();
        host.add(SEL);
        let mut kinetix = Kinetix::new(host);
        kinetix.update();
        assert!(kinetix.host().log.borrow().observe_calls.is_empty());
    }

    #[test]
    fn repeating_animated_elements_are_resubscribed_after_disable() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(host, ConfigPatch::default());
        kinetix.deliver([sample(el, 100.0, 0.9, true)]);

        kinetix.disable();
        kinetix.enable();
        assert!(kinetix.host().is_observed(el));
        assert!(animated(&kinetix, el), "flag survives disable");
    }

    #[test]
    fn element_markers_override_global_policy() {
        let mut host = TestHost::new();
        let always = host.add_with(SEL, RepeatOverride::Repeat);
        let single = host.add_with(SEL, RepeatOverride::Once);
        let mut kinetix = started(host, once());

        kinetix.deliver([sample(always, 100.0, 0.9, true), sample(single, 100.0, 0.9, true)]);
        assert!(kinetix.host().is_observed(always));
        assert!(!kinetix.host().is_observed(single));

        kinetix.deliver([sample(always, 400.0, 0.1, true)]);
        assert_eq!(kinetix.host().exits(), 1);
    }

    #[test]
    fn once_elements_below_threshold_keep_waiting() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(host, once());

        kinetix.deliver([sample(el, 300.0, 0.2, true)]);
        assert!(kinetix.host().is_observed(el));
        assert_eq!(kinetix.host().enters() + kinetix.host().exits(), 0);
        assert_eq!(kinetix.pending(), 0);
    }

    #[test]
    fn unknown_style_still_notifies() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(
            host,
            ConfigPatch {
                animation: Some(Animation::from_name("spin")),
                ..ConfigPatch::default()
            },
        );

        kinetix.deliver([sample(el, 100.0, 0.9, true)]);
        assert_eq!(kinetix.host().enters(), 1);
        assert_eq!(kinetix.pending(), 0);
        assert_eq!(kinetix.host().frame_requests, 0);
    }

    #[test]
    fn custom_event_names_are_used() {
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = started(
            host,
            ConfigPatch {
                enter_event_name: Some("reveal:show".into()),
                exit_event_name: Some("reveal:hide".into()),
                ..ConfigPatch::default()
            },
        );

        kinetix.deliver([sample(el, 100.0, 0.9, true), sample(el, 300.0, 0.1, true)]);
        let names: Vec<_> = kinetix
            .host()
            .notifications
            .iter()
            .map(|n| n.1.as_str())
            .collect();
        assert_eq!(names, vec!["reveal:show", "reveal:hide"]);
    }

    #[test]
    fn predicate_is_evaluated_on_every_call() {
        let flag = Rc::new(Cell::new(false));
        let probe = Rc::clone(&flag);
        let mut kinetix = started(
            TestHost::new(),
            ConfigPatch {
                disabled: Some(Disabled::predicate(move || Ok(probe.get()))),
                ..ConfigPatch::default()
            },
        );
        assert_eq!(kinetix.state(), LifecycleState::Enabled);
        assert!(!kinetix.is_disabled());
        flag.set(true);
        assert!(kinetix.is_disabled());
    }

    #[test]
    fn failing_predicate_counts_as_disabled() {
        let kinetix = started(
            TestHost::new(),
            ConfigPatch {
                disabled: Some(Disabled::predicate(|| Err(ProbeError::new("no viewport")))),
                ..ConfigPatch::default()
            },
        );
        assert_eq!(kinetix.state(), LifecycleState::Disabled);
    }

    #[test]
    fn refused_subscription_leaves_controller_disabled() {
        let mut host = TestHost::new();
        host.refuse_subscribe = true;
        let el = host.add(SEL);
        let mut kinetix = started(host, ConfigPatch::default());

        assert_eq!(kinetix.state(), LifecycleState::Disabled);
        kinetix.deliver([sample(el, 100.0, 0.9, true)]);
        assert_eq!(kinetix.host().enters(), 0);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn trace_sink_sees_the_pipeline() {
        use core::cell::RefCell;

        #[derive(Default)]
        struct Counts {
            measurements: u32,
            notifies: u32,
            unobserves: u32,
            flushed: u32,
            probe_failures: u32,
        }
        struct Counting(Rc<RefCell<Counts>>);
        impl TraceSink for Counting {
            fn on_measurement(&mut self, _: &MeasurementEvent) {
                self.0.borrow_mut().measurements += 1;
            }
            fn on_notify(&mut self, _: &NotifyEvent) {
                self.0.borrow_mut().notifies += 1;
            }
            fn on_unobserve(&mut self, _: ElementKey) {
                self.0.borrow_mut().unobserves += 1;
            }
            fn on_flush(&mut self, e: &FlushEvent) {
                self.0.borrow_mut().flushed += e.applied;
            }
            fn on_probe_failed(&mut self, _: &ProbeError) {
                self.0.borrow_mut().probe_failures += 1;
            }
        }

        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut host = TestHost::new();
        let el = host.add(SEL);
        let mut kinetix = Kinetix::new(host).with_sink(Counting(Rc::clone(&counts)));
        kinetix.start(once());
        kinetix.deliver([sample(el, 300.0, 0.0, false), sample(el, 100.0, 0.9, true)]);
        kinetix.on_frame();

        kinetix.reset(ConfigPatch {
            disabled: Some(Disabled::predicate(|| Err(ProbeError::new("boom")))),
            ..ConfigPatch::default()
        });
        assert!(kinetix.is_disabled());

        let counts = counts.borrow();
        assert_eq!(counts.measurements, 2);
        assert_eq!(counts.notifies, 1);
        assert_eq!(counts.unobserves, 1);
        assert_eq!(counts.flushed, 1);
        assert_eq!(counts.probe_failures, 1);
    }
}
