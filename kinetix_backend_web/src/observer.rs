// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `IntersectionObserver` measurement source.

use alloc::boxed::Box;
use alloc::vec::Vec;

use js_sys::Array;
use kinetix_core::host::{ObserverOptions, Subscription};
use kinetix_core::measurement::Measurement;
use kurbo::Rect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::WebError;

type EntriesClosure = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// A live `IntersectionObserver` and the closure it calls back into.
///
/// Dropping the subscription disconnects the observer.
pub struct IntersectionSubscription {
    observer: IntersectionObserver,
    _callback: EntriesClosure,
}

impl core::fmt::Debug for IntersectionSubscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IntersectionSubscription")
            .finish_non_exhaustive()
    }
}

impl IntersectionSubscription {
    /// Creates an observer with `options` that hands every entry batch,
    /// converted to measurements in delivery order, to `on_batch`.
    pub fn new(
        options: &ObserverOptions<'_, Element>,
        mut on_batch: impl FnMut(Vec<Measurement<Element>>) + 'static,
    ) -> Result<Self, WebError> {
        let init = IntersectionObserverInit::new();
        init.set_root(options.root.map(|root| root.as_ref()));
        init.set_root_margin(options.root_margin);
        init.set_threshold(&JsValue::from_f64(options.threshold));

        let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
            let batch = entries
                .iter()
                .map(|entry| measurement_from_entry(&entry.unchecked_into()))
                .collect();
            on_batch(batch);
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|thrown| WebError::observer(&thrown))?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Subscription<Element> for IntersectionSubscription {
    fn observe(&mut self, element: &Element) {
        self.observer.observe(element);
    }

    fn unobserve(&mut self, element: &Element) {
        self.observer.unobserve(element);
    }

    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

impl Drop for IntersectionSubscription {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Converts one observer entry. `bounds` is the target's bounding client
/// rect, so `y()` is its top edge relative to the viewport.
fn measurement_from_entry(entry: &IntersectionObserverEntry) -> Measurement<Element> {
    let rect = entry.bounding_client_rect();
    Measurement::new(
        entry.target(),
        client_rect(rect.left(), rect.top(), rect.width(), rect.height()),
        entry.intersection_ratio(),
        entry.is_intersecting(),
    )
}

/// Builds a rect from a DOM `(left, top, width, height)` box. Negative sizes
/// (allowed by `DOMRect`) are normalized.
fn client_rect(left: f64, top: f64, width: f64, height: f64) -> Rect {
    Rect::new(left, top, left + width, top + height).abs()
}
