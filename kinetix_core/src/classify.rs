// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional transition classification.
//!
//! Each measurement is compared against the element's immediately preceding
//! sample (first-order difference, not integrated history):
//!
//! | vertical motion | condition                                  | label                  |
//! |-----------------|--------------------------------------------|------------------------|
//! | `y` decreased   | intersecting and ratio increased           | `EnteringFromBottom`   |
//! | `y` decreased   | otherwise, not intersecting or ratio fell  | `LeavingToBottom`      |
//! | `y` increased   | ratio fell and not intersecting            | `LeavingToTop`         |
//! | `y` increased   | otherwise, intersecting and ratio rose     | `EnteringFromTop`      |
//! | `y` unchanged   | any                                        | previous label kept    |
//!
//! Rows that match no condition also keep the previous label. The first
//! sample of an element is compared against `y = 0, ratio = 0`.

use crate::measurement::Measurement;

/// Which edge of the viewport an element is crossing, and in which sense.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Gained overlap while moving down the viewport (`y` increased).
    EnteringFromTop,
    /// Gained overlap while moving up the viewport (`y` decreased).
    EnteringFromBottom,
    /// Lost all overlap while moving down the viewport.
    LeavingToTop,
    /// Lost overlap while moving up the viewport.
    LeavingToBottom,
    /// No transition observed yet.
    #[default]
    None,
}

impl Direction {
    /// Returns the label hosts expose to stylesheets (the `data-state`
    /// attribute on the web). [`Direction::None`] is the empty string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnteringFromTop => "slide-in-top",
            Self::EnteringFromBottom => "slide-in-bottom",
            Self::LeavingToTop => "slide-out-top",
            Self::LeavingToBottom => "slide-out-bottom",
            Self::None => "",
        }
    }

    /// Returns `true` for the two entering labels.
    #[must_use]
    pub const fn is_entering(self) -> bool {
        matches!(self, Self::EnteringFromTop | Self::EnteringFromBottom)
    }

    /// Returns `true` for the two leaving labels.
    #[must_use]
    pub const fn is_leaving(self) -> bool {
        matches!(self, Self::LeavingToTop | Self::LeavingToBottom)
    }
}

/// Last observed position and ratio of an element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct History {
    /// Vertical position of the previous sample.
    pub previous_y: f64,
    /// Intersection ratio of the previous sample.
    pub previous_ratio: f64,
}

/// Outcome of classifying one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Label before this sample.
    pub from: Direction,
    /// Label after this sample.
    pub to: Direction,
}

impl Transition {
    /// Whether the label actually changed.
    ///
    /// Re-assigning the current label is a no-op, so hosts are only told
    /// about real changes.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Classifies `sample` against the element's previous `history` and
/// `current` label.
///
/// `history` is always overwritten with the current sample, whatever the
/// label outcome.
pub fn classify<E>(
    sample: &Measurement<E>,
    history: &mut History,
    current: Direction,
) -> Transition {
    let y = sample.y();
    let ratio = sample.ratio;
    let rose = ratio > history.previous_ratio;
    let fell = ratio < history.previous_ratio;
    let intersecting = sample.is_intersecting;

    let to = if y < history.previous_y {
        if intersecting && rose {
            Direction::EnteringFromBottom
        } else if !intersecting || fell {
            Direction::LeavingToBottom
        } else {
            current
        }
    } else if y > history.previous_y {
        if fell && !intersecting {
            Direction::LeavingToTop
        } else if intersecting && rose {
            Direction::EnteringFromTop
        } else {
            current
        }
    } else {
        current
    };

    history.previous_y = y;
    history.previous_ratio = ratio;

    Transition { from: current, to }
}
