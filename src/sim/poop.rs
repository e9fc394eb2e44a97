use chrono::{DateTime, Utc};
use glam::Vec2;

use super::components::{Bounds, Facing, PetState};
use super::needs::{Boost, Needs};
use super::proximity::{first_within, within_range};
use super::timer::IntervalTimer;

/// Scoop-to-poop distance for a pickup.
pub const SCOOP_PICKUP_DISTANCE: f32 = 40.0;
/// Scoop-to-garbage distance for disposal.
pub const GARBAGE_DISPOSAL_DISTANCE: f32 = 50.0;
/// Re-armed intervals vary by this fraction either way.
const INTERVAL_JITTER: f32 = 0.1;
/// Gap between the sprite edge and a freshly dropped poop.
const DROP_OFFSET: f32 = 24.0;
/// Poops land near the pet's feet.
const DROP_HEIGHT: f32 = 0.75;

/// A dropped poop waiting to be scooped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poop {
    pub position: Vec2,
    pub spawn_time: DateTime<Utc>,
}

/// What the scoop did this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoopEvent {
    PickedUp(Poop),
    Disposed,
}

/// Periodic poop spawning plus the scoop that cleans up after it.
#[derive(Debug, Clone, PartialEq)]
pub struct PoopSpawner {
    timer: IntervalTimer,
    base_interval: f32,
    chance: f32,
    poops: Vec<Poop>,
    holding: bool,
}

impl PoopSpawner {
    pub fn new(base_interval: f32, chance: f32) -> Self {
        Self {
            timer: IntervalTimer::new(base_interval),
            base_interval,
            chance,
            poops: Vec::new(),
            holding: false,
        }
    }

    pub fn poops(&self) -> &[Poop] {
        &self.poops
    }

    pub fn timer(&self) -> &IntervalTimer {
        &self.timer
    }

    /// Whether the scoop is carrying a poop to the garbage.
    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn restore(&mut self, poops: Vec<Poop>) {
        self.poops = poops;
        self.holding = false;
    }

    /// Advance the spawn timer while `eligible`. On expiry the interval is
    /// re-armed with jitter and the spawn chance is rolled. Returns true
    /// when a poop should drop.
    pub fn tick(&mut self, dt: f32, eligible: bool, rng: &mut fastrand::Rng) -> bool {
        if !eligible || !self.timer.tick(dt) {
            return false;
        }
        let jitter = 1.0 + (rng.f32() * 2.0 - 1.0) * INTERVAL_JITTER;
        self.timer.rearm(self.base_interval * jitter);
        rng.f32() < self.chance
    }

    /// Drop a poop just behind the pet.
    pub fn spawn_behind(
        &mut self,
        pet: &PetState,
        sprite: Vec2,
        bounds: Bounds,
        now: DateTime<Utc>,
        needs: &mut Needs,
    ) -> Poop {
        let x = match pet.facing {
            Facing::Right => pet.position.x - DROP_OFFSET,
            Facing::Left => pet.position.x + sprite.x + DROP_OFFSET,
        };
        let y = pet.position.y + sprite.y * DROP_HEIGHT;
        let position = Vec2::new(x, y).clamp(Vec2::ZERO, Vec2::new(bounds.width, bounds.height));
        self.push(position, now, needs)
    }

    /// Drop a poop at a uniformly random screen position.
    pub fn spawn_random(
        &mut self,
        bounds: Bounds,
        now: DateTime<Utc>,
        needs: &mut Needs,
        rng: &mut fastrand::Rng,
    ) -> Poop {
        let position = Vec2::new(rng.f32() * bounds.width, rng.f32() * bounds.height);
        self.push(position, now, needs)
    }

    fn push(&mut self, position: Vec2, spawn_time: DateTime<Utc>, needs: &mut Needs) -> Poop {
        let poop = Poop {
            position,
            spawn_time,
        };
        self.poops.push(poop);
        needs.apply(Boost::PoopSpawned);
        log::info!(
            "Poop dropped at ({:.0}, {:.0}); {} on screen",
            position.x,
            position.y,
            self.poops.len()
        );
        poop
    }

    /// One scoop check: an empty scoop picks up the first poop in reach, a
    /// full scoop empties itself at the garbage.
    pub fn update_scoop(&mut self, scoop: Option<Vec2>, garbage: Vec2) -> Option<ScoopEvent> {
        let scoop = scoop?;

        if self.holding {
            if within_range(garbage, Some(scoop), GARBAGE_DISPOSAL_DISTANCE) {
                self.holding = false;
                log::info!("Poop thrown in the garbage");
                return Some(ScoopEvent::Disposed);
            }
            return None;
        }

        let idx = first_within(
            scoop,
            self.poops.iter().map(|p| &p.position),
            SCOOP_PICKUP_DISTANCE,
        )?;
        let poop = self.poops.remove(idx);
        self.holding = true;
        log::info!("Poop scooped; {} left", self.poops.len());
        Some(ScoopEvent::PickedUp(poop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::components::BehaviorMode;
    use crate::sim::timer::IntervalTimer;
    use chrono::TimeZone;

    const BOUNDS: Bounds = Bounds::new(1000.0, 800.0);
    const SPRITE: Vec2 = Vec2::new(64.0, 64.0);

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn timer_only_runs_while_eligible() {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut spawner = PoopSpawner::new(60.0, 1.0);
        assert!(!spawner.tick(100.0, false, &mut rng));
        assert_eq!(spawner.timer().elapsed, 0.0);
        assert!(spawner.tick(60.0, true, &mut rng));
        let t = spawner.timer().threshold;
        assert!((54.0..=66.0).contains(&t), "threshold {t}");
        assert_eq!(spawner.timer().elapsed, 0.0);
    }

    #[test]
    fn zero_chance_never_spawns() {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut spawner = PoopSpawner::new(10.0, 0.0);
        for _ in 0..100 {
            assert!(!spawner.tick(20.0, true, &mut rng));
        }
    }

    #[test]
    fn drops_behind_facing_direction() {
        let mut needs = Needs::default();
        let mut spawner = PoopSpawner::new(60.0, 0.5);
        let mut pet = PetState::new(
            Vec2::new(300.0, 300.0),
            BehaviorMode::Idle(IntervalTimer::new(5.0)),
        );

        let right = spawner.spawn_behind(&pet, SPRITE, BOUNDS, now(), &mut needs);
        assert!(right.position.x < pet.position.x);

        pet.facing = Facing::Left;
        let left = spawner.spawn_behind(&pet, SPRITE, BOUNDS, now(), &mut needs);
        assert!(left.position.x > pet.position.x + SPRITE.x);

        assert_eq!(spawner.poops().len(), 2);
        assert_eq!(needs.cleanliness, 80.0);
    }

    #[test]
    fn scoop_picks_one_then_disposes() {
        let mut rng = fastrand::Rng::with_seed(4);
        let mut needs = Needs::default();
        let mut spawner = PoopSpawner::new(60.0, 0.5);
        spawner.restore(vec![
            Poop {
                position: Vec2::new(100.0, 100.0),
                spawn_time: now(),
            },
            Poop {
                position: Vec2::new(110.0, 100.0),
                spawn_time: now(),
            },
        ]);
        spawner.spawn_random(BOUNDS, now(), &mut needs, &mut rng);
        let garbage = Vec2::new(900.0, 700.0);
        let scoop = Some(Vec2::new(105.0, 100.0));

        let first = spawner.update_scoop(scoop, garbage);
        assert!(matches!(first, Some(ScoopEvent::PickedUp(p)) if p.position.x == 100.0));
        assert!(spawner.is_holding());

        // Holding: no second pickup even though another poop is in reach.
        assert_eq!(spawner.update_scoop(scoop, garbage), None);
        assert_eq!(spawner.poops().len(), 2);

        assert_eq!(
            spawner.update_scoop(Some(Vec2::new(880.0, 690.0)), garbage),
            Some(ScoopEvent::Disposed)
        );
        assert!(!spawner.is_holding());
        assert!(spawner.update_scoop(None, garbage).is_none());
    }
}
