//! Easing curves and time-based transitions.

use std::time::Duration;

/// Duration of the overview side-controls animation, reused for every fade.
pub const FADE_DURATION: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseOutQuad,
    EaseOutCubic,
}

impl Easing {
    /// Map progress `t` in `[0, 1]` onto the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutQuad => -t * (t - 2.0),
            Self::EaseOutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
        }
    }
}

/// A value moving from `from` by `delta` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub start_time: Duration,
    pub from: f64,
    pub delta: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl Transition {
    #[must_use]
    pub fn new(start_time: Duration, from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            start_time,
            from,
            delta: to - from,
            duration,
            easing,
        }
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.from + self.delta
    }

    /// Progress in `[0, 1]` at `now`. A zero duration is complete immediately.
    #[must_use]
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start_time);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Value at `now` and whether the transition has finished.
    #[must_use]
    pub fn sample(&self, now: Duration) -> (f64, bool) {
        let progress = self.progress(now);
        let value = self.from + self.delta * self.easing.apply(progress);
        (value, progress >= 1.0)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn ease_out_cubic_endpoints() {
        assert_eq!(Easing::EaseOutCubic.apply(0.0), 0.0);
        assert_eq!(Easing::EaseOutCubic.apply(1.0), 1.0);
        assert!((Easing::EaseOutCubic.apply(0.5) - 0.875).abs() < 1e-9);
    }

    #[test]
    fn ease_out_quad_endpoints() {
        assert_eq!(Easing::EaseOutQuad.apply(0.0), 0.0);
        assert_eq!(Easing::EaseOutQuad.apply(1.0), 1.0);
        assert!((Easing::EaseOutQuad.apply(0.5) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn easing_clamps_input() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseOutCubic.apply(2.0), 1.0);
    }

    #[test]
    fn transition_samples_over_time() {
        let t = Transition::new(
            Duration::from_millis(100),
            0.0,
            200.0,
            Duration::from_millis(200),
            Easing::Linear,
        );
        assert_eq!(t.sample(Duration::from_millis(100)), (0.0, false));
        assert_eq!(t.sample(Duration::from_millis(200)), (100.0, false));
        assert_eq!(t.sample(Duration::from_millis(300)), (200.0, true));
        assert_eq!(t.sample(Duration::from_millis(900)), (200.0, true));
        // Clock readings before the start clamp to the start value
        assert_eq!(t.sample(Duration::ZERO), (0.0, false));
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let t = Transition::new(Duration::ZERO, 1.0, 0.0, Duration::ZERO, Easing::EaseOutQuad);
        assert_eq!(t.sample(Duration::ZERO), (0.0, true));
    }
}
