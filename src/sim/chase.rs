use glam::Vec2;

use super::components::Facing;
use super::proximity::SustainedProximity;
use super::timer::{uniform, IntervalTimer};

/// Distance within which the pet notices the cursor.
pub const DETECTION_RADIUS: f32 = 300.0;
/// Seconds the cursor must stay inside the radius before a chase roll.
pub const PROXIMITY_THRESHOLD: f32 = 2.0;
/// Chance a roll starts a chase.
pub const CHASE_CHANCE: f32 = 0.42;
pub const CHASE_MIN_DURATION: f32 = 10.0;
pub const CHASE_MAX_DURATION: f32 = 15.0;
/// Distance to the cursor that turns a chase into an attack.
pub const ATTACK_DISTANCE: f32 = 69.0;
pub const ATTACK_DURATION: f32 = 2.0;
pub const COOLDOWN_MIN: f32 = 30.0;
pub const COOLDOWN_MAX: f32 = 300.0;

const CHASE_SPEED_BASE: f32 = 150.0;
const CHASE_SPEED_MEDIUM: f32 = 200.0;
const CHASE_SPEED_FAR: f32 = 250.0;
const CHASE_DISTANCE_MEDIUM: f32 = 700.0;
const CHASE_DISTANCE_FAR: f32 = 1200.0;

/// Chase speed for a given distance to the cursor. Never decreases with
/// distance so the pet keeps up with a cursor flicked across the screen.
pub fn chase_speed(distance: f32) -> f32 {
    if distance > CHASE_DISTANCE_FAR {
        CHASE_SPEED_FAR
    } else if distance > CHASE_DISTANCE_MEDIUM {
        CHASE_SPEED_MEDIUM
    } else {
        CHASE_SPEED_BASE
    }
}

/// A chase in progress, including the attack sub-state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseSession {
    pub elapsed: f32,
    pub duration: f32,
    /// Seconds into the current attack, if attacking.
    pub attack: Option<f32>,
    attack_gate: SustainedProximity,
}

/// Result of advancing a chase by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaseStep {
    Running,
    AttackStarted,
    AttackFinished,
    Finished,
}

impl ChaseSession {
    /// `attack_hold` is how long the cursor must stay within attack range
    /// before pouncing. Zero pounces on contact.
    pub fn start(rng: &mut fastrand::Rng, attack_hold: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration: uniform(rng, CHASE_MIN_DURATION, CHASE_MAX_DURATION),
            attack: None,
            attack_gate: SustainedProximity::new(ATTACK_DISTANCE, attack_hold),
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.attack.is_some()
    }

    /// Advance the chase. Writes the chase velocity and facing; zeroes the
    /// velocity while attacking.
    pub fn update(
        &mut self,
        pet_center: Vec2,
        cursor: Option<Vec2>,
        dt: f32,
        velocity: &mut Vec2,
        facing: &mut Facing,
    ) -> ChaseStep {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            return ChaseStep::Finished;
        }

        if let Some(attack) = self.attack.as_mut() {
            *attack += dt;
            *velocity = Vec2::ZERO;
            if *attack >= ATTACK_DURATION {
                self.attack = None;
                self.attack_gate.reset();
                return ChaseStep::AttackFinished;
            }
            return ChaseStep::Running;
        }

        let Some(cursor) = cursor else {
            return ChaseStep::Running;
        };

        if self.attack_gate.update(pet_center, Some(cursor), dt) {
            self.attack = Some(0.0);
            *velocity = Vec2::ZERO;
            return ChaseStep::AttackStarted;
        }

        let to_cursor = cursor - pet_center;
        let distance = to_cursor.length();
        if distance > 0.0 {
            *velocity = to_cursor / distance * chase_speed(distance);
            facing.follow(velocity.x);
        }
        ChaseStep::Running
    }
}

/// Decides when a chase may start: cursor proximity, the chase roll and the
/// post-chase cooldown.
#[derive(Debug, Clone, PartialEq)]
pub struct ChaseGate {
    proximity: SustainedProximity,
    cooldown: Option<IntervalTimer>,
}

impl Default for ChaseGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ChaseGate {
    pub fn new() -> Self {
        Self {
            proximity: SustainedProximity::new(DETECTION_RADIUS, PROXIMITY_THRESHOLD),
            cooldown: None,
        }
    }

    pub fn cooldown(&self) -> Option<&IntervalTimer> {
        self.cooldown.as_ref()
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.is_some()
    }

    /// Seconds the cursor has been inside the detection radius.
    pub fn proximity_secs(&self) -> f32 {
        self.proximity.accumulated()
    }

    pub fn tick_cooldown(&mut self, dt: f32) {
        if let Some(cooldown) = self.cooldown.as_mut() {
            if cooldown.tick(dt) {
                log::info!("Chase cooldown expired. Pet can chase again.");
                self.cooldown = None;
            }
        }
    }

    pub fn start_cooldown(&mut self, rng: &mut fastrand::Rng) -> f32 {
        let cooldown = IntervalTimer::random(rng, COOLDOWN_MIN, COOLDOWN_MAX);
        let secs = cooldown.threshold;
        self.cooldown = Some(cooldown);
        self.proximity.reset();
        secs
    }

    pub fn reset_proximity(&mut self) {
        self.proximity.reset();
    }

    /// Feed one tick of cursor proximity. `eligible` is false while the pet
    /// is busy; ineligible ticks and cooldowns clear the accumulated time.
    pub fn try_trigger(
        &mut self,
        pet_center: Vec2,
        cursor: Option<Vec2>,
        eligible: bool,
        attack_hold: f32,
        dt: f32,
        rng: &mut fastrand::Rng,
    ) -> Option<ChaseSession> {
        if !eligible || self.cooldown.is_some() {
            if self.proximity.accumulated() > 0.0 {
                log::debug!("Chase not possible right now, resetting proximity timer");
            }
            self.proximity.reset();
            return None;
        }

        if !self.proximity.update(pet_center, cursor, dt) {
            return None;
        }
        self.proximity.reset();

        if rng.f32() < CHASE_CHANCE {
            let session = ChaseSession::start(rng, attack_hold);
            log::info!("Chase started! Duration: {:.1}s", session.duration);
            Some(session)
        } else {
            log::debug!("Pet ignored the cursor (no chase triggered)");
            None
        }
    }
}
