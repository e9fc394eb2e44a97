/// Upper bound for every need.
pub const MAX_NEED: f64 = 100.0;

/// Hunger drain, applied everywhere.
pub const HUNGER_DECAY_PER_HOUR: f64 = 66.67;
/// Cleanliness drain while roaming the desktop.
pub const CLEANLINESS_DECAY_OUTDOOR_PER_HOUR: f64 = 50.0;
/// Cleanliness drain inside the house. Also used for time-away catch-up.
pub const CLEANLINESS_DECAY_INDOOR_PER_HOUR: f64 = 0.333;
/// Happiness drain inside the house (bored).
pub const HAPPINESS_DECAY_INDOOR_PER_HOUR: f64 = 10.0;
/// Happiness gain while roaming the desktop.
pub const HAPPINESS_GAIN_OUTDOOR_PER_HOUR: f64 = 5.0;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Discrete, fixed-size adjustments to needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boost {
    Feed,
    Clean,
    Play,
    Pet,
    BrushStroke,
    PoopSpawned,
    EnterRoom,
    BowlMeal,
}

impl Boost {
    /// (hunger, cleanliness, happiness) deltas.
    fn deltas(self) -> (f64, f64, f64) {
        match self {
            Boost::Feed => (25.0, 0.0, 0.0),
            Boost::Clean => (0.0, 25.0, 0.0),
            Boost::Play => (0.0, 0.0, 25.0),
            Boost::Pet => (0.0, 0.0, 10.0),
            Boost::BrushStroke => (0.0, 2.0, 1.0),
            Boost::PoopSpawned => (0.0, -10.0, 0.0),
            Boost::EnterRoom => (0.0, 0.0, 5.0),
            Boost::BowlMeal => (75.0, 0.0, 0.0),
        }
    }
}

/// Hunger, cleanliness and happiness, each kept in `[0, MAX_NEED]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Needs {
    pub hunger: f64,
    pub cleanliness: f64,
    pub happiness: f64,
}

impl Default for Needs {
    fn default() -> Self {
        Self {
            hunger: MAX_NEED,
            cleanliness: MAX_NEED,
            happiness: MAX_NEED,
        }
    }
}

impl Needs {
    pub fn new(hunger: f64, cleanliness: f64, happiness: f64) -> Self {
        Self {
            hunger: clamp_need(hunger),
            cleanliness: clamp_need(cleanliness),
            happiness: clamp_need(happiness),
        }
    }

    /// Continuous decay/growth for `dt` seconds.
    pub fn tick(&mut self, dt: f32, indoor: bool) {
        let hours = dt as f64 / SECONDS_PER_HOUR;
        let (cleanliness_rate, happiness_rate) = if indoor {
            (
                -CLEANLINESS_DECAY_INDOOR_PER_HOUR,
                -HAPPINESS_DECAY_INDOOR_PER_HOUR,
            )
        } else {
            (
                -CLEANLINESS_DECAY_OUTDOOR_PER_HOUR,
                HAPPINESS_GAIN_OUTDOOR_PER_HOUR,
            )
        };
        self.adjust(
            -HUNGER_DECAY_PER_HOUR * hours,
            cleanliness_rate * hours,
            happiness_rate * hours,
        );
    }

    pub fn apply(&mut self, boost: Boost) {
        let (hunger, cleanliness, happiness) = boost.deltas();
        self.adjust(hunger, cleanliness, happiness);
    }

    /// Add raw deltas and clamp. Used for bulk time-away adjustment.
    pub fn adjust(&mut self, hunger: f64, cleanliness: f64, happiness: f64) {
        self.hunger = clamp_need(self.hunger + hunger);
        self.cleanliness = clamp_need(self.cleanliness + cleanliness);
        self.happiness = clamp_need(self.happiness + happiness);
    }

    /// All three needs are finite and within range.
    pub fn is_valid(&self) -> bool {
        [self.hunger, self.cleanliness, self.happiness]
            .iter()
            .all(|v| v.is_finite() && (0.0..=MAX_NEED).contains(v))
    }

    /// Force every value back into range. NaN becomes 0.
    pub fn sanitize(&mut self) {
        *self = Self::new(self.hunger, self.cleanliness, self.happiness);
    }
}

fn clamp_need(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, MAX_NEED)
    }
}
