/// Accumulator timer that fires once `elapsed` reaches `threshold`.
///
/// Every "wait N seconds, then maybe do something" rule in the simulation is
/// one of these: the owner adds the tick delta, checks whether it fired, and
/// re-arms it with a freshly sampled threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTimer {
    pub elapsed: f32,
    pub threshold: f32,
}

impl IntervalTimer {
    pub fn new(threshold: f32) -> Self {
        Self {
            elapsed: 0.0,
            threshold,
        }
    }

    /// Timer with a threshold drawn uniformly from `[min, max)`.
    pub fn random(rng: &mut fastrand::Rng, min: f32, max: f32) -> Self {
        Self::new(uniform(rng, min, max))
    }

    /// Advance by `dt`. Returns true if the threshold has been reached.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.threshold
    }

    pub fn remaining(&self) -> f32 {
        (self.threshold - self.elapsed).max(0.0)
    }

    pub fn rearm(&mut self, threshold: f32) {
        self.elapsed = 0.0;
        self.threshold = threshold;
    }

    pub fn rearm_random(&mut self, rng: &mut fastrand::Rng, min: f32, max: f32) {
        self.rearm(uniform(rng, min, max));
    }
}

/// Uniform sample in `[min, max)`.
pub fn uniform(rng: &mut fastrand::Rng, min: f32, max: f32) -> f32 {
    min + rng.f32() * (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_at_threshold() {
        let mut t = IntervalTimer::new(1.0);
        assert!(!t.tick(0.5));
        assert!(!t.tick(0.49));
        assert!(t.tick(0.01));
        assert_eq!(t.remaining(), 0.0);
    }

    #[test]
    fn rearm_resets_elapsed() {
        let mut t = IntervalTimer::new(0.1);
        assert!(t.tick(0.2));
        t.rearm(5.0);
        assert_eq!(t.elapsed, 0.0);
        assert!(!t.is_expired());
    }

    #[test]
    fn random_threshold_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let t = IntervalTimer::random(&mut rng, 3.0, 8.0);
            assert!((3.0..8.0).contains(&t.threshold));
        }
    }
}
