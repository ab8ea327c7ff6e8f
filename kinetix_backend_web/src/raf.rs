// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot `requestAnimationFrame` callback.
//!
//! [`FrameCallback`] owns a single JS closure and re-registers it on demand.
//! Unlike a continuous animation loop it only runs when a style write is
//! pending: [`request`](FrameCallback::request) schedules the next frame
//! unless one is already scheduled, and the callback clears the pending id
//! before running.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Direct global bindings instead of `web_sys::Window` methods, so no
// Window/Performance object has to be fetched on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

/// A reusable single-frame callback.
pub(crate) struct FrameCallback {
    closure: RafClosure,
    /// Id of the scheduled frame, shared with the closure.
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameCallback {
    /// Wraps `on_frame`. Nothing is scheduled until [`request`](Self::request).
    pub(crate) fn new(mut on_frame: impl FnMut() + 'static) -> Self {
        let pending = Rc::new(Cell::new(None));
        let inner = Rc::clone(&pending);
        let closure = Closure::wrap(Box::new(move |_timestamp_ms: f64| {
            inner.set(None);
            on_frame();
        }) as Box<dyn FnMut(f64)>);
        Self { closure, pending }
    }

    /// Schedules the callback for the next frame. No-op if already scheduled.
    pub(crate) fn request(&self) {
        if self.pending.get().is_some() {
            return;
        }
        let id = request_animation_frame(self.closure.as_ref().unchecked_ref());
        self.pending.set(Some(id));
    }

    /// Cancels the scheduled frame, if any.
    pub(crate) fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            cancel_animation_frame(id);
        }
    }
}

impl Drop for FrameCallback {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl core::fmt::Debug for FrameCallback {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameCallback")
            .field("pending", &self.pending.get())
            .finish_non_exhaustive()
    }
}
