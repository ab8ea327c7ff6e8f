// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for platform integrations.
//!
//! The core never touches a DOM. Everything it needs from the platform goes
//! through the traits in this module:
//!
//! - **Selector layer**: [`Host::query`] finds candidate elements,
//!   [`Host::repeat_override`] reads per-element repeat markers, and
//!   [`Host::key_of`] / [`Host::bind_key`] attach an [`ElementKey`] to a
//!   native element through weak storage.
//!
//! - **Measurement source**: [`Host::subscribe`] creates a [`Subscription`]
//!   with the current observer options. The host feeds the resulting
//!   measurement batches to
//!   [`Kinetix::deliver`](crate::controller::Kinetix::deliver).
//!
//! - **Frame callback**: [`Host::request_frame`] asks for one paint-frame
//!   callback, in which the host calls
//!   [`Kinetix::on_frame`](crate::controller::Kinetix::on_frame).
//!
//! - **Presenter**: [`Presenter::apply`] writes a [`StyleMutation`] to an
//!   element. Class toggles, state labels and notifications are immediate
//!   side effects ([`Host::set_animated`], [`Host::set_direction`],
//!   [`Host::notify`]).
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! // Delivery callback of the platform observer:
//! fn on_intersection(entries: Vec<Measurement<Element>>) {
//!     kinetix.deliver(entries); // classify, decide, notify, enqueue
//! }
//!
//! // Paint-frame callback requested through `Host::request_frame`:
//! fn on_animation_frame() {
//!     kinetix.on_frame(); // apply at most one style write per element
//! }
//! ```

use alloc::vec::Vec;

use crate::classify::Direction;
use crate::decide::RepeatOverride;
use crate::key::ElementKey;
use crate::measurement::Measurement;
use crate::render::StyleMutation;
use crate::time::HostTime;

/// Applies style mutations to platform-native elements.
///
/// Split from [`Host`] so render queues can be flushed into test doubles or
/// recording presenters.
pub trait Presenter {
    /// Native element handle.
    type Element;

    /// Writes `mutation` to `element`.
    fn apply(&mut self, element: &Self::Element, mutation: &StyleMutation);
}

/// A live measurement subscription.
pub trait Subscription<E> {
    /// Starts delivering measurements for `element`.
    fn observe(&mut self, element: &E);

    /// Stops delivering measurements for `element`.
    fn unobserve(&mut self, element: &E);

    /// Stops delivering measurements for every element. Must be synchronous:
    /// no batch is delivered after this returns.
    fn disconnect(&mut self);
}

/// Options a subscription is created with.
#[derive(Debug)]
pub struct ObserverOptions<'a, E> {
    /// Observation root; `None` is the viewport.
    pub root: Option<&'a E>,
    /// Margin around the root.
    pub root_margin: &'a str,
    /// Ratio at which the source must report a crossing.
    pub threshold: f64,
}

/// Which notification is being emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Emitted on activation.
    Enter,
    /// Emitted on deactivation.
    Exit,
}

/// A named notification carrying the measurement that caused it.
#[derive(Debug)]
pub struct Notification<'a, E> {
    /// Enter or exit.
    pub kind: NotificationKind,
    /// Configured event name.
    pub name: &'a str,
    /// The triggering measurement; `measurement.target` is the element.
    pub measurement: &'a Measurement<E>,
}

/// Platform services used by the [`Kinetix`](crate::controller::Kinetix)
/// controller.
pub trait Host: Presenter {
    /// Subscription type returned by [`subscribe`](Self::subscribe).
    type Subscription: Subscription<Self::Element>;

    /// Returns every element matching `selector`, in document order.
    fn query(&self, selector: &str) -> Vec<Self::Element>;

    /// Returns the key previously bound to `element`, if any.
    fn key_of(&self, element: &Self::Element) -> Option<ElementKey>;

    /// Binds `key` to `element`. The binding must not keep the element
    /// alive.
    fn bind_key(&mut self, element: &Self::Element, key: ElementKey);

    /// Reads the element's per-element repeat marker.
    fn repeat_override(&self, element: &Self::Element) -> RepeatOverride;

    /// Adds (`disabled = true`) or removes the global disabled marker.
    fn set_disabled_marker(&mut self, class_name: &str, disabled: bool);

    /// Mirrors the element's animated flag (class and attribute).
    fn set_animated(&mut self, element: &Self::Element, class_name: &str, animated: bool);

    /// Mirrors the element's directional label.
    fn set_direction(&mut self, element: &Self::Element, direction: Direction);

    /// Emits a notification for downstream consumers.
    fn notify(&mut self, notification: Notification<'_, Self::Element>);

    /// Creates a measurement subscription, or `None` if the platform refused.
    fn subscribe(
        &mut self,
        options: ObserverOptions<'_, Self::Element>,
    ) -> Option<Self::Subscription>;

    /// Requests one paint-frame callback.
    fn request_frame(&mut self);

    /// Cancels an outstanding frame request, if any.
    fn cancel_frame(&mut self) {}

    /// Returns the current host time, used for trace timestamps.
    fn now(&self) -> HostTime {
        HostTime::default()
    }
}
