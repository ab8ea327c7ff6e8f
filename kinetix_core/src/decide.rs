// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Activation decisions.
//!
//! Whether an element activates depends only on its intersection ratio, the
//! configured threshold and its repeat policy. The directional label is
//! carried through the [`Verdict`] so the presenter can pick a visual
//! variant, but it never decides whether anything fires.

use crate::classify::Direction;

/// Per-element repeat marker read from the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RepeatOverride {
    /// The element carries an explicit "repeat" marker.
    Repeat,
    /// The element carries an explicit "once" marker.
    Once,
    /// No marker; the global policy applies.
    #[default]
    Inherit,
}

/// Resolves whether an element may activate more than once.
///
/// Precedence, highest first: an explicit repeat marker, an explicit once
/// marker, then the global `once` setting.
#[must_use]
pub const fn resolve_repeat(marker: RepeatOverride, global_once: bool) -> bool {
    match marker {
        RepeatOverride::Repeat => true,
        RepeatOverride::Once => false,
        RepeatOverride::Inherit => !global_once,
    }
}

/// What a verdict asks the presenter to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Activation {
    /// Play the entrance.
    Activate,
    /// Play the exit (reverse).
    Deactivate,
    /// Nothing to do.
    Idle,
}

/// Result of one decision pass. Not persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    /// Requested transition.
    pub activation: Activation,
    /// Whether the element stays subscribed after this verdict.
    pub continue_observing: bool,
    /// Directional label selecting the visual variant.
    pub direction: Direction,
}

impl Verdict {
    /// Returns `true` for an activation verdict.
    #[must_use]
    pub fn should_activate(&self) -> bool {
        self.activation == Activation::Activate
    }

    /// Returns `true` for a deactivation verdict.
    #[must_use]
    pub fn should_deactivate(&self) -> bool {
        self.activation == Activation::Deactivate
    }
}

/// Decides what to do with an element whose intersection ratio is `ratio`.
///
/// At or above `threshold` the element activates and stays observed only if
/// it repeats. Below it, a repeating element is asked to reverse; a
/// non-repeating one is left alone and keeps waiting.
#[must_use]
pub fn decide(ratio: f64, threshold: f64, repeat: bool, direction: Direction) -> Verdict {
    if ratio >= threshold {
        Verdict {
            activation: Activation::Activate,
            continue_observing: repeat,
            direction,
        }
    } else if repeat {
        Verdict {
            activation: Activation::Deactivate,
            continue_observing: true,
            direction,
        }
    } else {
        Verdict {
            activation: Activation::Idle,
            continue_observing: true,
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_marker_beats_everything() {
        assert!(resolve_repeat(RepeatOverride::Repeat, true));
        assert!(resolve_repeat(RepeatOverride::Repeat, false));
    }

    #[test]
    fn once_marker_beats_global() {
        assert!(!resolve_repeat(RepeatOverride::Once, false));
        assert!(!resolve_repeat(RepeatOverride::Once, true));
    }

    #[test]
    fn inherit_follows_global_once() {
        assert!(resolve_repeat(RepeatOverride::Inherit, false));
        assert!(!resolve_repeat(RepeatOverride::Inherit, true));
    }

    #[test]
    fn at_threshold_activates() {
        let v = decide(0.5, 0.5, true, Direction::None);
        assert!(v.should_activate());
        assert!(v.continue_observing);
    }

    #[test]
    fn non_repeating_activation_retires() {
        let v = decide(0.9, 0.5, false, Direction::EnteringFromBottom);
        assert!(v.should_activate());
        assert!(!v.continue_observing, "once elements stop being observed");
        assert_eq!(v.direction, Direction::EnteringFromBottom);
    }

    #[test]
    fn below_threshold_repeating_reverses() {
        let v = decide(0.3, 0.5, true, Direction::LeavingToTop);
        assert!(v.should_deactivate());
        assert!(v.continue_observing);
    }

    #[test]
    fn below_threshold_non_repeating_is_idle() {
        let v = decide(0.1, 0.5, false, Direction::None);
        assert_eq!(v.activation, Activation::Idle);
        assert!(v.continue_observing);
    }

    #[test]
    fn direction_never_changes_the_outcome() {
        for direction in [
            Direction::EnteringFromTop,
            Direction::EnteringFromBottom,
            Direction::LeavingToTop,
            Direction::LeavingToBottom,
            Direction::None,
        ] {
            assert!(decide(0.6, 0.5, true, direction).should_activate());
            assert!(decide(0.4, 0.5, true, direction).should_deactivate());
        }
    }
}
