use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use chrono::Utc;
use instant::Instant;
use thiserror::Error;

use crate::config::{self, SimConfig};
use crate::debug::FrameStats;
use crate::pet;
use crate::save::storage::{self, Paths};
use crate::save::SaveData;
use crate::sim::Simulation;

/// Target simulation tick rate (seconds per tick).
const TICK_RATE: f64 = 1.0 / 60.0;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// How long to run when `DESKPET_RUN_SECS` is unset.
const DEFAULT_RUN_SECS: f64 = 10.0;
/// How often to check custom reminders (seconds).
const REMINDER_CHECK_INTERVAL: f64 = 1.0;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("simulation panicked on tick {tick}: {message}")]
    TickPanicked { tick: u64, message: String },
}

/// Settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
struct Launch {
    debug: bool,
    seed: Option<u64>,
    run_secs: f64,
}

impl Launch {
    fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let seed = var("DESKPET_SEED").and_then(|s| match s.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                log::warn!("Ignoring DESKPET_SEED={s:?}: {e}");
                None
            }
        });
        let run_secs = var("DESKPET_RUN_SECS")
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .unwrap_or(DEFAULT_RUN_SECS);
        Self {
            debug: var("DESKPET_DEBUG").is_some(),
            seed,
            run_secs,
        }
    }

    fn config(&self, paths: &Paths) -> SimConfig {
        let preset = if self.debug {
            SimConfig::debug()
        } else {
            SimConfig::production()
        };
        config::load_config(&paths.config_path).unwrap_or(preset)
    }

    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            Utc::now()
                .timestamp_nanos_opt()
                .map_or_else(|| fastrand::u64(..), |nanos| nanos as u64)
        })
    }
}

struct App {
    sim: Simulation,
    save: SaveData,
    paths: Paths,

    // Fixed timestep
    last_frame_time: Option<Instant>,
    accumulator: f64,

    // Frame timing
    frame_stats: FrameStats,
    since_reminder_check: f64,
}

impl App {
    fn new(launch: &Launch, paths: Paths) -> Self {
        let config = launch.config(&paths);
        let seed = launch.seed();
        let mut save = storage::load_or_default(&paths.save_path);
        let mut sim = Simulation::new(config, seed, Utc::now());

        if save.user_settings.pet_name.is_empty() {
            let mut rng = fastrand::Rng::with_seed(seed);
            save.user_settings.pet_name = pet::generate_pet_name(&mut rng);
            log::info!("Say hello to {}", save.user_settings.pet_name);
        }

        let report = sim.load_snapshot(save.snapshot(), Utc::now());
        if report.mess_left {
            log::info!("The mess from last time is still there");
        }
        if let Some(poop) = sim.take_time_away_poop() {
            log::info!(
                "{} left a poop while you were away ({:.1}h) at ({:.0}, {:.0})",
                save.user_settings.pet_name,
                report.hours_away,
                poop.position.x,
                poop.position.y
            );
        }

        Self {
            sim,
            save,
            paths,
            last_frame_time: None,
            accumulator: 0.0,
            frame_stats: FrameStats::new(),
            since_reminder_check: 0.0,
        }
    }

    /// Run fixed-timestep simulation ticks. A panicking tick halts the run.
    fn run_fixed_update(&mut self, dt: f64) -> Result<(), DriverError> {
        self.accumulator += dt;

        if self.accumulator > MAX_ACCUMULATOR {
            self.accumulator = MAX_ACCUMULATOR;
        }

        while self.accumulator >= TICK_RATE {
            let sim = &mut self.sim;
            let result = panic::catch_unwind(AssertUnwindSafe(|| sim.tick(TICK_RATE as f32)));
            if let Err(payload) = result {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                return Err(DriverError::TickPanicked {
                    tick: self.sim.tick_count() + 1,
                    message,
                });
            }
            self.accumulator -= TICK_RATE;
        }
        Ok(())
    }

    fn check_reminders(&mut self, dt: f64) {
        self.since_reminder_check += dt;
        if self.since_reminder_check < REMINDER_CHECK_INTERVAL {
            return;
        }
        self.since_reminder_check = 0.0;
        if !self.save.user_settings.reminders_enabled {
            return;
        }
        for message in self.save.reminders.take_due(Utc::now()) {
            log::info!("[{}] {message}", self.save.user_settings.pet_name);
        }
    }

    fn frame(&mut self) -> Result<(), DriverError> {
        let now = Instant::now();
        let dt = match self.last_frame_time {
            Some(last) => now.duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last_frame_time = Some(now);

        self.run_fixed_update(dt)?;
        self.check_reminders(dt);

        self.frame_stats.record_frame(dt);
        if self.frame_stats.maybe_log() {
            let needs = self.sim.needs();
            log::info!("{}", self.sim.phase_timings().summary());
            log::debug!(
                "{} | H:{:.1} C:{:.1} Hp:{:.1} | poops: {} | chase cooldown: {:.0}s",
                self.sim.mode().label(),
                needs.hunger,
                needs.cleanliness,
                needs.happiness,
                self.sim.poops().len(),
                self.sim.chase_cooldown().map_or(0.0, |c| c.remaining()),
            );
        }
        Ok(())
    }

    fn shutdown(&mut self) -> bool {
        let snapshot = self.sim.capture_snapshot(Utc::now());
        self.save.apply_snapshot(&snapshot);
        self.save.reminders.prune_displayed();
        storage::save(&self.paths.save_path, &self.save)
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let launch = Launch::from_env();
    let paths = storage::project_paths_or_cwd();
    let mut app = App::new(&launch, paths);

    log::info!("Running for {:.1}s", launch.run_secs);
    let started = Instant::now();
    while started.elapsed().as_secs_f64() < launch.run_secs {
        if let Err(e) = app.frame() {
            log::error!("{e}; not saving possibly corrupt state");
            return Err(Box::new(e));
        }
        std::thread::sleep(Duration::from_secs_f64(TICK_RATE));
    }

    log::info!(
        "Stopping after {} ticks ({} frames)",
        app.sim.tick_count(),
        app.frame_stats.frame_count
    );
    if !app.shutdown() {
        log::warn!("Progress from this session was not saved");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn launch(vars: &[(&str, &str)]) -> Launch {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Launch::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn env_defaults() {
        let l = launch(&[]);
        assert!(!l.debug);
        assert_eq!(l.seed, None);
        assert_eq!(l.run_secs, DEFAULT_RUN_SECS);
    }

    #[test]
    fn env_overrides() {
        let l = launch(&[
            ("DESKPET_DEBUG", "1"),
            ("DESKPET_SEED", " 1234 "),
            ("DESKPET_RUN_SECS", "2.5"),
        ]);
        assert!(l.debug);
        assert_eq!(l.seed(), 1234);
        assert_eq!(l.run_secs, 2.5);
    }

    #[test]
    fn bad_env_values_fall_back() {
        let l = launch(&[("DESKPET_SEED", "abc"), ("DESKPET_RUN_SECS", "-3")]);
        assert_eq!(l.seed, None);
        assert_eq!(l.run_secs, DEFAULT_RUN_SECS);
    }

    #[test]
    fn debug_flag_picks_debug_preset() {
        let dir = std::env::temp_dir().join(format!("deskpet-app-{}", std::process::id()));
        let paths = Paths::in_dir(dir);
        let config = launch(&[("DESKPET_DEBUG", "")]).config(&paths);
        assert!(config.debug);
        assert_eq!(config.poop_interval_secs, 60.0);
    }

    #[test]
    fn accumulator_runs_whole_ticks() {
        let dir = std::env::temp_dir().join(format!("deskpet-acc-{}", std::process::id()));
        let mut app = App::new(&launch(&[("DESKPET_SEED", "9")]), Paths::in_dir(dir));
        app.run_fixed_update(0.105).unwrap();
        assert_eq!(app.sim.tick_count(), 6);
        app.run_fixed_update(10.0).unwrap();
        // Backlog is clamped to MAX_ACCUMULATOR.
        let ticks = app.sim.tick_count() - 6;
        assert!((14..=15).contains(&ticks), "{ticks}");
    }
}
