// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller configuration.
//!
//! [`Config`] is owned by the [`Kinetix`](crate::controller::Kinetix)
//! controller and only changes through [`Config::merge`], which overlays the
//! fields present in a [`ConfigPatch`] (a shallow merge). No validation is
//! performed beyond keeping the threshold inside `[0, 1]`.

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use thiserror::Error;

/// Error reported by a failing `disabled` predicate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("disabled predicate failed: {reason}")]
pub struct ProbeError {
    reason: String,
}

impl ProbeError {
    /// Creates an error carrying a human-readable reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Visual style applied on activation and deactivation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Animation {
    /// Translate off-axis and fade.
    #[default]
    Slide,
    /// Fade only.
    Fade,
    /// No visual change. Unknown style names resolve here.
    #[cfg_attr(feature = "serde", serde(other))]
    None,
}

impl Animation {
    /// Parses a style name. Unrecognized names are [`Animation::None`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "slide" => Self::Slide,
            "fade" => Self::Fade,
            _ => Self::None,
        }
    }

    /// Returns the style name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Slide => "slide",
            Self::Fade => "fade",
            Self::None => "none",
        }
    }
}

type Predicate = Rc<dyn Fn() -> Result<bool, ProbeError>>;

/// Global enable switch: a fixed flag or a predicate evaluated on every call.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(from = "bool")
)]
pub enum Disabled {
    /// Fixed value.
    Static(bool),
    /// Evaluated fresh each time the controller asks, e.g. to disable on
    /// small screens.
    Predicate(Predicate),
}

impl Disabled {
    /// Wraps a predicate.
    pub fn predicate(f: impl Fn() -> Result<bool, ProbeError> + 'static) -> Self {
        Self::Predicate(Rc::new(f))
    }

    /// Evaluates the switch.
    pub fn evaluate(&self) -> Result<bool, ProbeError> {
        match self {
            Self::Static(flag) => Ok(*flag),
            Self::Predicate(f) => f(),
        }
    }
}

impl Default for Disabled {
    fn default() -> Self {
        Self::Static(false)
    }
}

impl From<bool> for Disabled {
    fn from(flag: bool) -> Self {
        Self::Static(flag)
    }
}

impl fmt::Debug for Disabled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(flag) => f.debug_tuple("Static").field(flag).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Full configuration. `E` is the host's element type, used for the
/// observation root.
#[derive(Clone, Debug)]
pub struct Config<E> {
    /// Observation root; `None` is the top-level viewport.
    pub root: Option<E>,
    /// CSS-style margin around the root.
    pub root_margin: String,
    /// Activation threshold on the intersection ratio, in `[0, 1]`.
    pub threshold: f64,
    /// Class added to elements whose entrance has played.
    pub animate_class_name: String,
    /// Class added to the document body while disabled.
    pub disabled_class_name: String,
    /// Name of the notification emitted on activation.
    pub enter_event_name: String,
    /// Name of the notification emitted on deactivation.
    pub exit_event_name: String,
    /// Selector used to discover candidate elements.
    pub selector: String,
    /// Global repeat policy: `true` retires elements after one entrance.
    pub once: bool,
    /// Global enable switch.
    pub disabled: Disabled,
    /// Visual style.
    pub animation: Animation,
}

impl<E> Default for Config<E> {
    fn default() -> Self {
        Self {
            root: None,
            root_margin: "0% 10%".into(),
            threshold: 0.5,
            animate_class_name: "kinetix-animate".into(),
            disabled_class_name: "kinetix-disabled".into(),
            enter_event_name: "animation:in".into(),
            exit_event_name: "animation:out".into(),
            selector: ".kinetix".into(),
            once: false,
            disabled: Disabled::default(),
            animation: Animation::default(),
        }
    }
}

impl<E> Config<E> {
    /// Overlays every field present in `patch`.
    ///
    /// A threshold outside `[0, 1]` is clamped into range; a NaN threshold
    /// is ignored.
    pub fn merge(&mut self, patch: ConfigPatch<E>) {
        if let Some(root) = patch.root {
            self.root = root;
        }
        if let Some(root_margin) = patch.root_margin {
            self.root_margin = root_margin;
        }
        if let Some(threshold) = patch.threshold
            && !threshold.is_nan()
        {
            self.threshold = threshold.clamp(0.0, 1.0);
        }
        if let Some(name) = patch.animate_class_name {
            self.animate_class_name = name;
        }
        if let Some(name) = patch.disabled_class_name {
            self.disabled_class_name = name;
        }
        if let Some(name) = patch.enter_event_name {
            self.enter_event_name = name;
        }
        if let Some(name) = patch.exit_event_name {
            self.exit_event_name = name;
        }
        if let Some(selector) = patch.selector {
            self.selector = selector;
        }
        if let Some(once) = patch.once {
            self.once = once;
        }
        if let Some(disabled) = patch.disabled {
            self.disabled = disabled;
        }
        if let Some(animation) = patch.animation {
            self.animation = animation;
        }
    }
}

/// A partial [`Config`]. Absent fields leave the current value untouched.
///
/// With the `serde` feature the patch deserializes from camelCase keys
/// (`rootMargin`, `enterEventName`, ...). `root` cannot be expressed that
/// way and `disabled` only as a boolean.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase", default, bound = "")
)]
pub struct ConfigPatch<E> {
    /// Replacement root; `Some(None)` resets to the viewport.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub root: Option<Option<E>>,
    /// See [`Config::root_margin`].
    pub root_margin: Option<String>,
    /// See [`Config::threshold`].
    pub threshold: Option<f64>,
    /// See [`Config::animate_class_name`].
    pub animate_class_name: Option<String>,
    /// See [`Config::disabled_class_name`].
    pub disabled_class_name: Option<String>,
    /// See [`Config::enter_event_name`].
    pub enter_event_name: Option<String>,
    /// See [`Config::exit_event_name`].
    pub exit_event_name: Option<String>,
    /// See [`Config::selector`].
    pub selector: Option<String>,
    /// See [`Config::once`].
    pub once: Option<bool>,
    /// See [`Config::disabled`].
    pub disabled: Option<Disabled>,
    /// See [`Config::animation`].
    pub animation: Option<Animation>,
}

impl<E> Default for ConfigPatch<E> {
    fn default() -> Self {
        Self {
            root: None,
            root_margin: None,
            threshold: None,
            animate_class_name: None,
            disabled_class_name: None,
            enter_event_name: None,
            exit_event_name: None,
            selector: None,
            once: None,
            disabled: None,
            animation: None,
        }
    }
}

impl<E> ConfigPatch<E> {
    /// Returns `true` if the patch sets no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
            && self.root_margin.is_none()
            && self.threshold.is_none()
            && self.animate_class_name.is_none()
            && self.disabled_class_name.is_none()
            && self.enter_event_name.is_none()
            && self.exit_event_name.is_none()
            && self.selector.is_none()
            && self.once.is_none()
            && self.disabled.is_none()
            && self.animation.is_none()
    }

    /// Carries the patch over to another element type, dropping `root`.
    ///
    /// Settings parsed from JSON are `ConfigPatch<()>`; hosts convert them to
    /// their own element type with this.
    #[must_use]
    pub fn retarget<T>(self) -> ConfigPatch<T> {
        ConfigPatch {
            root: None,
            root_margin: self.root_margin,
            threshold: self.threshold,
            animate_class_name: self.animate_class_name,
            disabled_class_name: self.disabled_class_name,
            enter_event_name: self.enter_event_name,
            exit_event_name: self.exit_event_name,
            selector: self.selector,
            once: self.once,
            disabled: self.disabled,
            animation: self.animation,
        }
    }
}
