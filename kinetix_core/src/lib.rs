// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility-tracking state machine for scroll-triggered animations.
//!
//! `kinetix_core` turns viewport-intersection measurements into enter/exit
//! transitions for a set of tracked elements. It is `no_std` compatible (with
//! `alloc`) and never touches a DOM: platform integrations implement the
//! [`Host`] trait and feed measurement batches and paint frames into the
//! [`Kinetix`] controller.
//!
//! # Architecture
//!
//! ```text
//!   Host::subscribe ──► measurement batch
//!                             │
//!                             ▼
//!   Kinetix::deliver ──► classify() ──► decide() ──► edge-triggered apply
//!                                                     │          │
//!                              Host::notify ◄─────────┘          ▼
//!                                                          RenderQueue
//!                                                                │
//!   Host::request_frame ──► Kinetix::on_frame ──► Presenter::apply
//! ```
//!
//! **[`classify`]**: Direction classifier: compares each measurement with
//! the element's previous sample and yields one of four directional labels.
//!
//! **[`decide`]**: Activation decision from ratio, threshold and repeat
//! policy.
//!
//! **[`table`]**: Struct-of-arrays element table with generational
//! [`ElementKey`] handles.
//!
//! **[`render`]**: Single-slot-per-element queue of style mutations,
//! flushed once per paint frame.
//!
//! **[`controller`]**: The [`Kinetix`] lifecycle: start, enable, disable,
//! reset, update, plus measurement delivery and frame flushing.
//!
//! **[`host`]**: The [`Host`], [`Presenter`] and [`Subscription`] traits that
//! platform backends implement.
//!
//! **[`config`]**: [`Config`] and its shallow-merge [`ConfigPatch`].
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `serde` (disabled by default): Derives `Deserialize` for configuration
//!   patches and `Serialize`/`Deserialize` for labels and styles.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod classify;
pub mod config;
pub mod controller;
pub mod decide;
pub mod host;
pub mod key;
pub mod measurement;
pub mod render;
pub mod table;
pub mod time;
pub mod trace;

#[cfg(test)]
mod testing;

pub use classify::Direction;
pub use config::{Animation, Config, ConfigPatch, Disabled, ProbeError};
pub use controller::{Kinetix, LifecycleState};
pub use decide::{RepeatOverride, Verdict};
pub use host::{Host, Notification, NotificationKind, ObserverOptions, Presenter, Subscription};
pub use key::ElementKey;
pub use measurement::Measurement;
pub use render::StyleMutation;
