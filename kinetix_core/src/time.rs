// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host timestamps for trace events.
//!
//! The core never reads a clock itself. Hosts report [`HostTime`] values in
//! their own monotonic tick unit (microseconds from `performance.now()` on
//! the web) and publish a [`Timebase`] so sinks can convert.

use core::fmt;

/// Host monotonic ticks at which something happened.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Ticks elapsed since `earlier`; zero when `earlier` is later.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Length of one host tick, as the ratio `numer / denom` nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Nanoseconds per `denom` ticks.
    pub numer: u32,
    /// Ticks per `numer` nanoseconds. Never zero.
    pub denom: u32,
}

impl Timebase {
    /// One tick per nanosecond.
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// One tick per microsecond (`performance.now()` scaled by 1000).
    pub const MICROS: Self = Self {
        numer: 1000,
        denom: 1,
    };

    /// Converts a tick count to nanoseconds, saturating at `u64::MAX`.
    #[inline]
    #[must_use]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let wide = ticks as u128 * self.numer as u128 / self.denom as u128;
        if wide > u64::MAX as u128 {
            u64::MAX
        } else {
            #[expect(clippy::cast_possible_truncation, reason = "bounded above")]
            let nanos = wide as u64;
            nanos
        }
    }

    /// Converts a tick count to whole microseconds.
    #[inline]
    #[must_use]
    pub const fn ticks_to_micros(self, ticks: u64) -> u64 {
        self.ticks_to_nanos(ticks) / 1000
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// Span between two [`HostTime`]s, in host ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// No time at all.
    pub const ZERO: Self = Self(0);

    /// Raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}
