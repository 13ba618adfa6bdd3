//! Monotonic timer and frame timing

use serde::{Deserialize, Serialize};

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Ratio converting host ticks to nanoseconds: `ns = ticks * numer / denom`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timebase {
    /// Numerator of the tick-to-nanosecond ratio
    pub numer: u32,
    /// Denominator of the tick-to-nanosecond ratio
    pub denom: u32,
}

impl Timebase {
    /// One tick per nanosecond
    pub const NANOSECONDS: Self = Self { numer: 1, denom: 1 };

    /// Create a timebase from its ratio
    pub const fn new(numer: u32, denom: u32) -> Self {
        Self { numer, denom }
    }

    /// Nanoseconds per tick, or `None` if either side of the ratio is zero
    pub fn nanos_per_tick(self) -> Option<f64> {
        if self.numer == 0 || self.denom == 0 {
            return None;
        }
        Some(f64::from(self.numer) / f64::from(self.denom))
    }
}

impl Default for Timebase {
    fn default() -> Self {
        Self::NANOSECONDS
    }
}

/// Converts host ticks into seconds elapsed since calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonotonicTimer {
    seconds_per_tick: f64,
    offset: u64,
}

impl MonotonicTimer {
    /// Calibrate against the host timebase, treating `now_ticks` as time zero
    ///
    /// Returns `None` for a timebase with a zero in its ratio.
    pub fn calibrate(timebase: Timebase, now_ticks: u64) -> Option<Self> {
        let nanos_per_tick = timebase.nanos_per_tick()?;
        Some(Self { seconds_per_tick: nanos_per_tick / NANOS_PER_SECOND, offset: now_ticks })
    }

    /// Seconds between calibration and `ticks`
    ///
    /// Ticks earlier than the calibration point clamp to zero.
    pub fn seconds_at(&self, ticks: u64) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let elapsed = ticks.saturating_sub(self.offset) as f64;
        elapsed * self.seconds_per_tick
    }
}

/// Frame timer driven by an external clock in seconds
///
/// Feed it [`crate::WindowSystem::time`] once per frame.
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last_frame: Option<f64>,
    delta_time: f64,
    total_time: f64,
    frame_count: u64,
}

impl FrameTimer {
    /// Create a new timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame boundary at `now` seconds
    pub fn update(&mut self, now: f64) {
        self.delta_time = self.last_frame.map_or(0.0, |last| (now - last).max(0.0));
        self.total_time += self.delta_time;
        self.last_frame = Some(now);
        self.frame_count += 1;
    }

    /// Seconds between the last two frames
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Seconds accumulated over all frames
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Number of frames recorded
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since the first frame
    pub fn average_fps(&self) -> f64 {
        if self.total_time > 0.0 {
            #[allow(clippy::cast_precision_loss)]
            let frames = self.frame_count.saturating_sub(1) as f64;
            frames / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_calibration_point_is_zero() {
        let timer = MonotonicTimer::calibrate(Timebase::NANOSECONDS, 5_000).unwrap();
        assert_eq!(timer.seconds_at(5_000), 0.0);
        assert_relative_eq!(timer.seconds_at(6_000), 1.0e-6);
    }

    #[test]
    fn test_nanosecond_timebase() {
        let timer = MonotonicTimer::calibrate(Timebase::NANOSECONDS, 0).unwrap();
        assert_relative_eq!(timer.seconds_at(1_500_000_000), 1.5);
    }

    #[test]
    fn test_non_unit_timebase() {
        // 125/3 ns per tick, as reported by some ARM hosts
        let timer = MonotonicTimer::calibrate(Timebase::new(125, 3), 0).unwrap();
        assert_relative_eq!(timer.seconds_at(24_000_000), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_ratio_is_rejected() {
        assert_eq!(Timebase::new(2, 0).nanos_per_tick(), None);
        assert_eq!(Timebase::new(0, 3).nanos_per_tick(), None);
        assert!(MonotonicTimer::calibrate(Timebase::new(1, 0), 0).is_none());
    }

    #[test]
    fn test_ticks_before_calibration_clamp() {
        let timer = MonotonicTimer::calibrate(Timebase::NANOSECONDS, 1_000).unwrap();
        assert_eq!(timer.seconds_at(10), 0.0);
    }

    #[test]
    fn test_frame_timer() {
        let mut frames = FrameTimer::new();
        frames.update(1.0);
        assert_eq!(frames.delta_time(), 0.0);
        frames.update(1.5);
        frames.update(2.0);
        assert_relative_eq!(frames.delta_time(), 0.5);
        assert_relative_eq!(frames.total_time(), 1.0);
        assert_eq!(frames.frame_count(), 3);
        assert_relative_eq!(frames.average_fps(), 2.0);
    }
}
