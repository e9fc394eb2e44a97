use instant::Instant;

/// Which phase of the simulation tick is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemPhase {
    Timers = 0,
    Chase = 1,
    Behavior = 2,
    Movement = 3,
    Needs = 4,
    Interaction = 5,
    Spawner = 6,
}

impl SystemPhase {
    pub const ALL: [SystemPhase; 7] = [
        Self::Timers,
        Self::Chase,
        Self::Behavior,
        Self::Movement,
        Self::Needs,
        Self::Interaction,
        Self::Spawner,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Timers => "Timers",
            Self::Chase => "Chase",
            Self::Behavior => "Behavior",
            Self::Movement => "Movement",
            Self::Needs => "Needs",
            Self::Interaction => "Interaction",
            Self::Spawner => "Spawner",
        }
    }
}

/// Per-phase timing with exponential moving average smoothing.
///
/// Wall-clock only; nothing here feeds back into simulation state.
#[derive(Debug, Clone)]
pub struct SystemTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; 7],
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl Default for SystemTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; 7],
            start: Instant::now(),
        }
    }

    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Records time since `begin()` for `phase`.
    pub fn end(&mut self, phase: SystemPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        let idx = phase as usize;
        self.durations_us[idx] =
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }

    /// One-line summary, slowest phase first.
    pub fn summary(&self) -> String {
        let mut phases: Vec<(SystemPhase, f64)> = SystemPhase::ALL
            .iter()
            .map(|&p| (p, self.durations_us[p as usize]))
            .collect();
        phases.sort_by(|a, b| b.1.total_cmp(&a.1));
        let parts: Vec<String> = phases
            .iter()
            .map(|(p, us)| format!("{} {:.1}us", p.label(), us))
            .collect();
        format!("tick {:.1}us [{}]", self.total_us(), parts.join(", "))
    }
}
