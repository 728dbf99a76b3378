//! Time abstraction traits for platform-agnostic timing.
//!
//! The stepper only ever asks one question of a clock: how long ago was the
//! last phase change? Instants therefore need a single wraparound-safe
//! subtraction, and durations are compared in microseconds.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to microseconds.
    fn as_micros(&self) -> u64;

    /// Creates duration from microseconds.
    fn from_micros(micros: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations backed by a wrapping hardware counter must use wrapping
    /// subtraction so that a counter rollover between two samples still
    /// yields the true elapsed time.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

#[cfg(feature = "fugit")]
mod fugit_impl {
    use super::{TimeDuration, TimeInstant};
    use fugit::{MicrosDurationU32, MicrosDurationU64, TimerInstantU32, TimerInstantU64};

    impl TimeDuration for MicrosDurationU32 {
        const ZERO: Self = MicrosDurationU32::from_ticks(0);

        fn as_micros(&self) -> u64 {
            self.ticks() as u64
        }

        fn from_micros(micros: u64) -> Self {
            MicrosDurationU32::from_ticks(micros.min(u32::MAX as u64) as u32)
        }

        fn saturating_sub(self, other: Self) -> Self {
            MicrosDurationU32::from_ticks(self.ticks().saturating_sub(other.ticks()))
        }
    }

    impl TimeInstant for TimerInstantU32<1_000_000> {
        type Duration = MicrosDurationU32;

        fn duration_since(&self, earlier: Self) -> Self::Duration {
            // 32-bit microsecond timers roll over every ~71 minutes
            MicrosDurationU32::from_ticks(self.ticks().wrapping_sub(earlier.ticks()))
        }
    }

    impl TimeDuration for MicrosDurationU64 {
        const ZERO: Self = MicrosDurationU64::from_ticks(0);

        fn as_micros(&self) -> u64 {
            self.ticks()
        }

        fn from_micros(micros: u64) -> Self {
            MicrosDurationU64::from_ticks(micros)
        }

        fn saturating_sub(self, other: Self) -> Self {
            MicrosDurationU64::from_ticks(self.ticks().saturating_sub(other.ticks()))
        }
    }

    impl TimeInstant for TimerInstantU64<1_000_000> {
        type Duration = MicrosDurationU64;

        fn duration_since(&self, earlier: Self) -> Self::Duration {
            MicrosDurationU64::from_ticks(self.ticks().wrapping_sub(earlier.ticks()))
        }
    }

}
