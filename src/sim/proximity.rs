use glam::Vec2;

/// "Two points stayed within `threshold` for at least `required` seconds."
///
/// Time inside the radius accumulates in `within`. Once the points separate,
/// `away` starts counting and `within` is only cleared after `grace` seconds
/// out of range. A zero grace means an immediate reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SustainedProximity {
    pub threshold: f32,
    pub required: f32,
    pub grace: f32,
    within: f32,
    away: f32,
}

impl SustainedProximity {
    pub const fn new(threshold: f32, required: f32) -> Self {
        Self {
            threshold,
            required,
            grace: 0.0,
            within: 0.0,
            away: 0.0,
        }
    }

    pub const fn with_grace(mut self, grace: f32) -> Self {
        self.grace = grace;
        self
    }

    /// Advance by `dt`. A missing `b` counts as out of range.
    /// Returns true while the accumulated time meets `required`.
    pub fn update(&mut self, a: Vec2, b: Option<Vec2>, dt: f32) -> bool {
        if within_range(a, b, self.threshold) {
            self.away = 0.0;
            self.within += dt;
            return self.within >= self.required;
        }

        self.away += dt;
        if self.away >= self.grace {
            self.within = 0.0;
        }
        false
    }

    pub fn reset(&mut self) {
        self.within = 0.0;
        self.away = 0.0;
    }

    /// Seconds accumulated inside the radius.
    pub fn accumulated(&self) -> f32 {
        self.within
    }

    /// Seconds since the points were last in range.
    pub fn away_secs(&self) -> f32 {
        self.away
    }

    /// Out of range for at least the grace period.
    pub fn is_lost(&self) -> bool {
        self.away >= self.grace && self.within == 0.0
    }
}

/// Strictly closer than `threshold`.
pub fn within_range(a: Vec2, b: Option<Vec2>, threshold: f32) -> bool {
    match b {
        Some(b) => a.distance_squared(b) < threshold * threshold,
        None => false,
    }
}

/// Index of the first candidate within `threshold` of `point`.
pub fn first_within<'a>(
    point: Vec2,
    candidates: impl IntoIterator<Item = &'a Vec2>,
    threshold: f32,
) -> Option<usize> {
    candidates
        .into_iter()
        .position(|c| c.distance_squared(point) < threshold * threshold)
}
