/// Maps level or survival time to a spawn interval in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnRamp {
    /// `max(floor, base - level * step)`, changes only when the level does.
    Stepped { floor_ms: f32, base_ms: f32, step_ms: f32 },
    /// `max(floor, base - seconds * per_second)`, continuous decay.
    Decay { floor_ms: f32, base_ms: f32, per_second_ms: f32 },
}

impl SpawnRamp {
    pub const SKY_SNAP: SpawnRamp = SpawnRamp::Stepped { floor_ms: 300.0, base_ms: 1000.0, step_ms: 100.0 };
    pub const SKY_GLIDE: SpawnRamp = SpawnRamp::Stepped { floor_ms: 500.0, base_ms: 2000.0, step_ms: 200.0 };
    pub const MOVEMENT: SpawnRamp = SpawnRamp::Decay { floor_ms: 200.0, base_ms: 1000.0, per_second_ms: 20.0 };

    pub fn interval_ms(&self, level: u32, elapsed_secs: f32) -> f32 {
        match *self {
            SpawnRamp::Stepped { floor_ms, base_ms, step_ms } => {
                (base_ms - level as f32 * step_ms).max(floor_ms)
            }
            SpawnRamp::Decay { floor_ms, base_ms, per_second_ms } => {
                (base_ms - elapsed_secs.max(0.0) * per_second_ms).max(floor_ms)
            }
        }
    }

    pub fn floor_ms(&self) -> f32 {
        match *self {
            SpawnRamp::Stepped { floor_ms, .. } | SpawnRamp::Decay { floor_ms, .. } => floor_ms,
        }
    }
}

/// One level per `points_per_level` points, starting at level 1.
pub fn level_for_score(score: u32, points_per_level: u32) -> u32 {
    score / points_per_level.max(1) + 1
}

/// Accumulates elapsed milliseconds and fires once it passes the interval.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpawnTimer {
    accumulated_ms: f32,
}

impl SpawnTimer {
    /// Returns true when a spawn is due; the timer then restarts from zero.
    pub fn advance(&mut self, dt_ms: f32, interval_ms: f32) -> bool {
        self.accumulated_ms += dt_ms;
        if self.accumulated_ms > interval_ms {
            self.accumulated_ms = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0.0;
    }

    pub fn accumulated_ms(&self) -> f32 {
        self.accumulated_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sky_ramp_clamps_at_floor() {
        let ramp = SpawnRamp::SKY_SNAP;
        assert_eq!(ramp.interval_ms(1, 0.0), 900.0);
        assert_eq!(ramp.interval_ms(2, 0.0), 800.0);
        assert_eq!(ramp.interval_ms(7, 0.0), 300.0);
        assert_eq!(ramp.interval_ms(40, 0.0), 300.0);
    }

    #[test]
    fn glide_ramp_uses_its_own_constants() {
        let ramp = SpawnRamp::SKY_GLIDE;
        assert_eq!(ramp.interval_ms(1, 0.0), 1800.0);
        assert_eq!(ramp.interval_ms(8, 0.0), 500.0);
    }

    #[test]
    fn movement_ramp_decays_with_time() {
        let ramp = SpawnRamp::MOVEMENT;
        assert_eq!(ramp.interval_ms(1, 0.0), 1000.0);
        assert_eq!(ramp.interval_ms(1, 10.0), 800.0);
        assert_eq!(ramp.interval_ms(1, 40.0), 200.0);
        assert_eq!(ramp.interval_ms(1, 500.0), 200.0);
    }

    #[test]
    fn level_steps_every_hundred_points() {
        assert_eq!(level_for_score(0, 100), 1);
        assert_eq!(level_for_score(99, 100), 1);
        assert_eq!(level_for_score(100, 100), 2);
        assert_eq!(level_for_score(250, 100), 3);
    }

    #[test]
    fn timer_fully_resets_after_firing() {
        let mut timer = SpawnTimer::default();
        assert!(!timer.advance(600.0, 1000.0));
        assert!(!timer.advance(400.0, 1000.0));
        assert!(timer.advance(1.0, 1000.0));
        assert_eq!(timer.accumulated_ms(), 0.0);
        // one huge frame still spawns only once
        assert!(timer.advance(5000.0, 1000.0));
        assert_eq!(timer.accumulated_ms(), 0.0);
    }

    proptest! {
        #[test]
        fn stepped_ramp_is_non_increasing(a in 0u32..500, b in 0u32..500) {
            let ramp = SpawnRamp::SKY_SNAP;
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ramp.interval_ms(hi, 0.0) <= ramp.interval_ms(lo, 0.0));
            prop_assert!(ramp.interval_ms(hi, 0.0) >= ramp.floor_ms());
        }

        #[test]
        fn decay_ramp_is_non_increasing(a in 0.0f32..10_000.0, b in 0.0f32..10_000.0) {
            let ramp = SpawnRamp::MOVEMENT;
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ramp.interval_ms(1, hi) <= ramp.interval_ms(1, lo));
            prop_assert!(ramp.interval_ms(1, hi) >= ramp.floor_ms());
        }

        #[test]
        fn level_is_monotonic_in_score(a in 0u32..100_000, b in 0u32..100_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(level_for_score(hi, 100) >= level_for_score(lo, 100));
        }
    }
}
