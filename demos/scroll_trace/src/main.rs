// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated scrolling page that exercises the whole kinetix pipeline.
//!
//! A fixed column of elements is scrolled down and back up through an 800px
//! viewport. A toy intersection observer reports a sample whenever an
//! element's intersecting state or threshold side changes, and each simulated
//! frame flushes the render queue. Every pipeline step is traced through a
//! [`PrettyPrintSink`], or a [`JsonLinesSink`] when run with `--json`.
//!
//! The script also disables and re-enables the controller, appends an element
//! and calls `update`, then resets into a fade style with `once` set.

use std::cell::RefCell;
use std::io::stdout;
use std::rc::Rc;

use kurbo::Rect;

use kinetix_core::classify::Direction;
use kinetix_core::config::{Animation, ConfigPatch};
use kinetix_core::controller::Kinetix;
use kinetix_core::decide::RepeatOverride;
use kinetix_core::host::{
    Host, Notification, NotificationKind, ObserverOptions, Presenter, Subscription,
};
use kinetix_core::key::ElementKey;
use kinetix_core::measurement::Measurement;
use kinetix_core::render::StyleMutation;
use kinetix_core::time::{HostTime, Timebase};
use kinetix_core::trace::TraceSink;

use kinetix_debug::jsonl::JsonLinesSink;
use kinetix_debug::pretty::PrettyPrintSink;

const VIEWPORT_H: f64 = 800.0;
const ELEMENT_W: f64 = 320.0;
const ELEMENT_H: f64 = 160.0;
/// Vertical distance between element tops, in document pixels.
const SPACING: f64 = 360.0;
const SCROLL_STEP: f64 = 120.0;
/// 60 Hz frame interval in microseconds.
const FRAME_US: u64 = 16_667;

/// Index into [`Page::elements`].
type ElementId = usize;

#[derive(Debug)]
struct PageElement {
    /// Top edge in document coordinates.
    doc_y: f64,
    repeat: RepeatOverride,
    key: Option<ElementKey>,
}

/// Last reported state of one observed element.
#[derive(Clone, Copy, Debug)]
struct Reported {
    id: ElementId,
    /// `(is_intersecting, ratio >= threshold)`, or `None` before the first
    /// report.
    last: Option<(bool, bool)>,
}

#[derive(Debug, Default)]
struct ObserverState {
    connected: bool,
    threshold: f64,
    observed: Vec<Reported>,
}

/// Toy intersection observer: elements are reported on their first
/// observation and on every crossing afterwards.
#[derive(Debug)]
struct PageObserver {
    state: Rc<RefCell<ObserverState>>,
}

impl Subscription<ElementId> for PageObserver {
    fn observe(&mut self, element: &ElementId) {
        let mut state = self.state.borrow_mut();
        if !state.observed.iter().any(|r| r.id == *element) {
            state.observed.push(Reported {
                id: *element,
                last: None,
            });
        }
    }

    fn unobserve(&mut self, element: &ElementId) {
        self.state.borrow_mut().observed.retain(|r| r.id != *element);
    }

    fn disconnect(&mut self) {
        let mut state = self.state.borrow_mut();
        state.connected = false;
        state.observed.clear();
    }
}

#[derive(Debug)]
struct Page {
    elements: Vec<PageElement>,
    scroll: f64,
    clock: u64,
    frame_requested: bool,
    observer: Rc<RefCell<ObserverState>>,
}

impl Page {
    fn new(count: usize) -> Self {
        let mut page = Self {
            elements: Vec::new(),
            scroll: 0.0,
            clock: 0,
            frame_requested: false,
            observer: Rc::default(),
        };
        for _ in 0..count {
            page.append(RepeatOverride::Inherit);
        }
        // Third element plays once regardless of the global policy.
        if let Some(el) = page.elements.get_mut(2) {
            el.repeat = RepeatOverride::Once;
        }
        page
    }

    fn append(&mut self, repeat: RepeatOverride) {
        let doc_y = 600.0 + self.elements.len() as f64 * SPACING;
        self.elements.push(PageElement {
            doc_y,
            repeat,
            key: None,
        });
    }

    fn bottom(&self) -> f64 {
        self.elements.last().map_or(0.0, |el| el.doc_y + ELEMENT_H)
    }

    fn bounds(&self, id: ElementId) -> Rect {
        let y = self.elements[id].doc_y - self.scroll;
        Rect::new(0.0, y, ELEMENT_W, y + ELEMENT_H)
    }

    /// Advances the clock by one frame and returns the samples the observer
    /// would deliver at the current scroll offset.
    fn tick(&mut self) -> Vec<Measurement<ElementId>> {
        self.clock += FRAME_US;
        let mut batch = Vec::new();
        let mut state = self.observer.borrow_mut();
        if !state.connected {
            return batch;
        }
        let threshold = state.threshold;
        for reported in &mut state.observed {
            let bounds = self.bounds(reported.id);
            let visible = (bounds.y1.min(VIEWPORT_H) - bounds.y0.max(0.0)).max(0.0);
            let ratio = visible / bounds.height();
            let now = (visible > 0.0, ratio >= threshold);
            if reported.last != Some(now) {
                reported.last = Some(now);
                batch.push(Measurement::new(reported.id, bounds, ratio, now.0));
            }
        }
        batch
    }

    fn take_frame_request(&mut self) -> bool {
        core::mem::take(&mut self.frame_requested)
    }
}

impl Presenter for Page {
    type Element = ElementId;

    fn apply(&mut self, element: &ElementId, mutation: &StyleMutation) {
        let transform = mutation.translate.map_or("(unchanged)", |t| t.css());
        println!("  page: #{element} transform={transform} opacity={}", mutation.opacity);
    }
}

impl Host for Page {
    type Subscription = PageObserver;

    fn query(&self, _selector: &str) -> Vec<ElementId> {
        (0..self.elements.len()).collect()
    }

    fn key_of(&self, element: &ElementId) -> Option<ElementKey> {
        self.elements.get(*element).and_then(|el| el.key)
    }

    fn bind_key(&mut self, element: &ElementId, key: ElementKey) {
        if let Some(el) = self.elements.get_mut(*element) {
            el.key = Some(key);
        }
    }

    fn repeat_override(&self, element: &ElementId) -> RepeatOverride {
        self.elements
            .get(*element)
            .map_or(RepeatOverride::Inherit, |el| el.repeat)
    }

    fn set_disabled_marker(&mut self, class_name: &str, disabled: bool) {
        let op = if disabled { "add" } else { "remove" };
        println!("  page: body {op} .{class_name}");
    }

    fn set_animated(&mut self, element: &ElementId, class_name: &str, animated: bool) {
        println!("  page: #{element} .{class_name}={animated}");
    }

    fn set_direction(&mut self, element: &ElementId, direction: Direction) {
        println!("  page: #{element} data-state={:?}", direction.as_str());
    }

    fn notify(&mut self, notification: Notification<'_, ElementId>) {
        let kind = match notification.kind {
            NotificationKind::Enter => "enter",
            NotificationKind::Exit => "exit",
        };
        println!(
            "  page: #{} dispatch {:?} ({kind})",
            notification.measurement.target, notification.name
        );
    }

    fn subscribe(&mut self, options: ObserverOptions<'_, ElementId>) -> Option<PageObserver> {
        let mut state = self.observer.borrow_mut();
        state.connected = true;
        state.threshold = options.threshold;
        state.observed.clear();
        Some(PageObserver {
            state: Rc::clone(&self.observer),
        })
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
    }

    fn cancel_frame(&mut self) {
        self.frame_requested = false;
    }

    fn now(&self) -> HostTime {
        HostTime(self.clock)
    }
}

/// Runs one simulated frame: observer delivery, then the paint callback.
fn frame(kinetix: &mut Kinetix<Page>) {
    let batch = kinetix.host_mut().tick();
    kinetix.deliver(batch);
    if kinetix.host_mut().take_frame_request() {
        kinetix.on_frame();
    }
}

/// Scrolls from the current offset to `target` in fixed steps.
fn scroll_to(kinetix: &mut Kinetix<Page>, target: f64) {
    println!("-- scroll to {target}");
    loop {
        let page = kinetix.host_mut();
        let delta = target - page.scroll;
        if delta.abs() < f64::EPSILON {
            break;
        }
        page.scroll += delta.clamp(-SCROLL_STEP, SCROLL_STEP);
        frame(kinetix);
    }
    // One settle frame.
    frame(kinetix);
}

fn main() {
    let timebase = Timebase::MICROS;
    let sink: Box<dyn TraceSink> = if std::env::args().any(|arg| arg == "--json") {
        Box::new(JsonLinesSink::new(stdout(), timebase))
    } else {
        Box::new(PrettyPrintSink::with_writer(Box::new(stdout()), timebase))
    };

    let mut kinetix = Kinetix::new(Page::new(6)).with_boxed_sink(sink);

    println!("-- start");
    kinetix.start(ConfigPatch {
        threshold: Some(0.3),
        ..ConfigPatch::default()
    });
    frame(&mut kinetix);

    let bottom = kinetix.host().bottom() - VIEWPORT_H;
    scroll_to(&mut kinetix, bottom);
    scroll_to(&mut kinetix, 0.0);

    println!("-- disable");
    kinetix.disable();
    scroll_to(&mut kinetix, 720.0);

    println!("-- enable");
    kinetix.enable();
    frame(&mut kinetix);

    println!("-- append and update");
    kinetix.host_mut().append(RepeatOverride::Repeat);
    kinetix.update();
    let bottom = kinetix.host().bottom() - VIEWPORT_H;
    scroll_to(&mut kinetix, bottom);

    println!("-- reset: fade, once");
    kinetix.reset(ConfigPatch {
        animation: Some(Animation::Fade),
        once: Some(true),
        ..ConfigPatch::default()
    });
    frame(&mut kinetix);
    scroll_to(&mut kinetix, 0.0);
    scroll_to(&mut kinetix, bottom);

    println!(
        "-- done: state={:?} tracked={} pending={}",
        kinetix.state(),
        kinetix.table().live_count(),
        kinetix.pending()
    );
}
