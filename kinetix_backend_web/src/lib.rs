// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for kinetix.
//!
//! This crate connects [`kinetix_core`] to browser APIs:
//!
//! - [`DomHost`]: element discovery, `WeakMap` key binding, class and
//!   attribute mirroring, `CustomEvent` notifications and inline style writes
//! - [`IntersectionSubscription`]: `IntersectionObserver` measurement source
//! - a one-shot `requestAnimationFrame` callback for frame-deferred writes
//! - [`ConsoleSink`]: trace output on the browser console
//! - [`kinetix`] / [`KinetixHandle`]: the JavaScript entry point
//!
//! Elements keep their state in attributes for CSS hooks: `data-animate`
//! (`"true"`/`"false"`) and `data-state` (`slide-in-top`, `slide-in-bottom`,
//! `slide-out-top`, `slide-out-bottom` or empty). `data-animation-repeat` and
//! `data-animation-once` override the global repeat policy per element.

#![no_std]

extern crate alloc;

mod console;
mod dom;
mod error;
mod handle;
mod observer;
mod raf;

pub use console::ConsoleSink;
pub use dom::{
    ANIMATE_ATTR, DomHost, ONCE_ATTR, REPEAT_ATTR, STATE_ATTR, Shared, deliver, repeat_marker,
};
pub use error::WebError;
pub use handle::{KinetixHandle, kinetix, kinetix_debug, parse_settings};
pub use observer::IntersectionSubscription;

use kinetix_core::time::{HostTime, Timebase};

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    let ms = raf::performance_now();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}
