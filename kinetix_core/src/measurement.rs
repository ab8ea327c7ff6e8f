// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility measurements delivered by the measurement source.

use kurbo::Rect;

/// One visibility sample for one observed element.
///
/// On the web this mirrors an `IntersectionObserverEntry`: `bounds` is the
/// entry's `boundingClientRect` (viewport-relative), `ratio` its
/// `intersectionRatio` and `is_intersecting` its `isIntersecting` flag.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement<E> {
    /// The observed element.
    pub target: E,
    /// Viewport-relative bounding box of the element.
    pub bounds: Rect,
    /// Fraction of the element overlapping the viewport, in `[0, 1]`.
    pub ratio: f64,
    /// Whether the element overlaps the viewport at all.
    pub is_intersecting: bool,
}

impl<E> Measurement<E> {
    /// Creates a measurement.
    #[must_use]
    pub fn new(target: E, bounds: Rect, ratio: f64, is_intersecting: bool) -> Self {
        Self {
            target,
            bounds,
            ratio,
            is_intersecting,
        }
    }

    /// Vertical position of the element's top edge, relative to the viewport.
    #[inline]
    #[must_use]
    pub fn y(&self) -> f64 {
        self.bounds.y0
    }

    /// Returns the same sample with the target mapped through `f`.
    ///
    /// Used to strip the native element before handing the sample to
    /// consumers that only need the numbers.
    pub fn map_target<F, T>(self, f: F) -> Measurement<T>
    where
        F: FnOnce(E) -> T,
    {
        Measurement {
            target: f(self.target),
            bounds: self.bounds,
            ratio: self.ratio,
            is_intersecting: self.is_intersecting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_is_top_edge() {
        let m = Measurement::new((), Rect::new(10.0, 120.0, 60.0, 180.0), 0.4, true);
        assert_eq!(m.y(), 120.0);
    }

    #[test]
    fn map_target_keeps_numbers() {
        let m = Measurement::new(3_u32, Rect::new(0.0, -5.0, 1.0, 1.0), 0.25, false);
        let mapped = m.map_target(|t| t * 2);
        assert_eq!(mapped.target, 6);
        assert_eq!(mapped.y(), -5.0);
        assert_eq!(mapped.ratio, 0.25);
        assert!(!mapped.is_intersecting);
    }
}
