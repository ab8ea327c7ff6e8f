// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM host.
//!
//! [`DomHost`] implements [`Host`] on top of a `Document`. Element keys are
//! kept in a `WeakMap` so tracking never keeps a removed element alive.
//! Notifications become bubbling `CustomEvent`s. They are queued in an
//! outbox and dispatched by [`deliver`] once the controller borrow has been
//! released, so listeners may call back into the handle.

use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use js_sys::{Array, Object, Reflect, WeakMap};
use kinetix_core::classify::Direction;
use kinetix_core::controller::Kinetix;
use kinetix_core::decide::RepeatOverride;
use kinetix_core::host::{Host, Notification, ObserverOptions, Presenter};
use kinetix_core::key::ElementKey;
use kinetix_core::measurement::Measurement;
use kinetix_core::render::StyleMutation;
use kinetix_core::time::HostTime;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Document, Element, HtmlElement};

use crate::observer::IntersectionSubscription;
use crate::raf::FrameCallback;

/// Controller shared between the handle and the browser callbacks.
pub type Shared = Rc<RefCell<Kinetix<DomHost>>>;

/// Attribute mirroring the animated flag.
pub const ANIMATE_ATTR: &str = "data-animate";
/// Attribute mirroring the directional label.
pub const STATE_ATTR: &str = "data-state";
/// Presence marks an element as repeating.
pub const REPEAT_ATTR: &str = "data-animation-repeat";
/// Presence marks an element as animating once.
pub const ONCE_ATTR: &str = "data-animation-once";

/// [`Host`] implementation backed by the browser DOM.
pub struct DomHost {
    document: Document,
    keys: WeakMap,
    frame: FrameCallback,
    shared: Weak<RefCell<Kinetix<Self>>>,
    outbox: Vec<(Element, CustomEvent)>,
}

impl core::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomHost")
            .field("frame", &self.frame)
            .field("outbox_len", &self.outbox.len())
            .finish_non_exhaustive()
    }
}

impl DomHost {
    /// Creates a host for `document` whose callbacks reach the controller
    /// through `shared`.
    pub fn new(document: Document, shared: Weak<RefCell<Kinetix<Self>>>) -> Self {
        let on_frame = shared.clone();
        let frame = FrameCallback::new(move || {
            if let Some(shared) = on_frame.upgrade()
                && let Ok(mut kinetix) = shared.try_borrow_mut()
            {
                kinetix.on_frame();
            }
        });
        Self {
            document,
            keys: WeakMap::new(),
            frame,
            shared,
            outbox: Vec::new(),
        }
    }

    /// The document elements are queried from.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    fn take_outbox(&mut self) -> Vec<(Element, CustomEvent)> {
        core::mem::take(&mut self.outbox)
    }
}

/// Runs one measurement batch through the controller, then dispatches the
/// notifications it produced.
pub fn deliver(shared: &Shared, batch: Vec<Measurement<Element>>) {
    let outbox = {
        let Ok(mut kinetix) = shared.try_borrow_mut() else {
            return;
        };
        kinetix.deliver(batch);
        kinetix.host_mut().take_outbox()
    };
    for (target, event) in outbox {
        let _ = target.dispatch_event(&event);
    }
}

/// Resolves the per-element repeat marker from attribute presence. An
/// explicit repeat marker wins over a once marker.
#[must_use]
pub fn repeat_marker(has_repeat: bool, has_once: bool) -> RepeatOverride {
    if has_repeat {
        RepeatOverride::Repeat
    } else if has_once {
        RepeatOverride::Once
    } else {
        RepeatOverride::Inherit
    }
}

/// Decodes a `[index, generation]` pair stored in the key map.
fn decode_key(index: f64, generation: f64) -> Option<ElementKey> {
    let valid =
        |v: f64| (0.0..=f64::from(u32::MAX)).contains(&v) && v % 1.0 == 0.0;
    if !valid(index) || !valid(generation) {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "range and integrality checked above"
    )]
    let (index, generation) = (index as u32, generation as u32);
    Some(ElementKey::from_parts(index, generation))
}

impl Presenter for DomHost {
    type Element = Element;

    fn apply(&mut self, element: &Element, mutation: &StyleMutation) {
        let Some(el) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = el.style();
        if let Some(translate) = mutation.translate {
            let _ = style.set_property("transform", translate.css());
        }
        let _ = style.set_property("opacity", &format!("{}", mutation.opacity));
    }
}

impl Host for DomHost {
    type Subscription = IntersectionSubscription;

    fn query(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn key_of(&self, element: &Element) -> Option<ElementKey> {
        let pair = self.keys.get(element.as_ref()).dyn_into::<Array>().ok()?;
        decode_key(pair.get(0).as_f64()?, pair.get(1).as_f64()?)
    }

    fn bind_key(&mut self, element: &Element, key: ElementKey) {
        let pair = Array::of2(
            &JsValue::from(key.index()),
            &JsValue::from(key.generation()),
        );
        self.keys.set(element.as_ref(), &pair);
    }

    fn repeat_override(&self, element: &Element) -> RepeatOverride {
        repeat_marker(
            element.has_attribute(REPEAT_ATTR),
            element.has_attribute(ONCE_ATTR),
        )
    }

    fn set_disabled_marker(&mut self, class_name: &str, disabled: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let classes = body.class_list();
        let _ = if disabled {
            classes.add_1(class_name)
        } else {
            classes.remove_1(class_name)
        };
    }

    fn set_animated(&mut self, element: &Element, class_name: &str, animated: bool) {
        let _ = element.class_list().toggle_with_force(class_name, animated);
        let _ = element.set_attribute(ANIMATE_ATTR, if animated { "true" } else { "false" });
    }

    fn set_direction(&mut self, element: &Element, direction: Direction) {
        let _ = element.set_attribute(STATE_ATTR, direction.as_str());
    }

    fn notify(&mut self, notification: Notification<'_, Element>) {
        let m = notification.measurement;
        let detail = Object::new();
        for (name, value) in detail_fields(m) {
            let _ = Reflect::set(&detail, &name.into(), &value.into());
        }
        let _ = Reflect::set(&detail, &"isIntersecting".into(), &m.is_intersecting.into());
        let _ = Reflect::set(&detail, &"target".into(), &m.target);

        let init = CustomEventInit::new();
        init.set_bubbles(true);
        init.set_detail(&detail);
        if let Ok(event) = CustomEvent::new_with_event_init_dict(notification.name, &init) {
            self.outbox.push((m.target.clone(), event));
        }
    }

    fn subscribe(
        &mut self,
        options: ObserverOptions<'_, Element>,
    ) -> Option<IntersectionSubscription> {
        let shared = self.shared.clone();
        let subscription = IntersectionSubscription::new(&options, move |batch| {
            if let Some(shared) = shared.upgrade() {
                deliver(&shared, batch);
            }
        });
        match subscription {
            Ok(subscription) => Some(subscription),
            Err(err) => {
                web_sys::console::error_1(&format!("kinetix: {err}").into());
                None
            }
        }
    }

    fn request_frame(&mut self) {
        self.frame.request();
    }

    fn cancel_frame(&mut self) {
        self.frame.cancel();
    }

    fn now(&self) -> HostTime {
        crate::now()
    }
}

/// Numeric fields of a notification's `detail`: the bounding rect in
/// viewport coordinates plus the intersection ratio.
fn detail_fields<E>(m: &Measurement<E>) -> [(&'static str, f64); 5] {
    [
        ("x", m.bounds.x0),
        ("y", m.bounds.y0),
        ("width", m.bounds.width()),
        ("height", m.bounds.height()),
        ("ratio", m.ratio),
    ]
}
