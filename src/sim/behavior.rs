use glam::Vec2;

use super::components::{ActionKind, BehaviorMode, ModeKind, PetState};
use super::needs::Needs;
use super::timer::{uniform, IntervalTimer};

/// Max wander speed per axis in pixels/second.
pub const WALK_SPEED: f32 = 50.0;

const IDLE_MIN: f32 = 3.0;
const IDLE_MAX: f32 = 8.0;
const WANDER_MIN: f32 = 2.0;
const WANDER_MAX: f32 = 5.0;
/// Chance an expired idle timer starts a walk.
const WALK_CHANCE: f32 = 0.5;
/// Chance an expired wander timer stops the pet.
const STOP_CHANCE: f32 = 0.3;

/// How long feed/clean/play/pet animations hold the pet.
pub const ACTION_DURATION: f32 = 3.0;
/// Minimum seconds between two petting actions.
pub const PET_COOLDOWN: f32 = 2.0;

const ROOM_EXIT_MIN: f32 = 30.0;
const ROOM_EXIT_MAX: f32 = 60.0;
/// Chance the pet leaves the room when the exit check fires.
const ROOM_EXIT_CHANCE: f32 = 0.4;

/// Below this hunger the pet heads for a full food bowl.
pub const AUTO_EAT_THRESHOLD: f64 = 60.0;
/// Seconds in the room before the pet starts eating.
const EAT_DELAY: f32 = 1.5;
/// Give up walking home after this long.
const HOME_WALK_TIMEOUT: f32 = 30.0;
/// Distance to the house waypoint that counts as arrived.
const HOME_ARRIVAL_RADIUS: f32 = 40.0;
/// Seconds after giving up before the pet tries the walk home again.
pub const HOME_WALK_RETRY: f32 = 60.0;

/// A timed feed/clean/play/pet animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionSession {
    pub kind: ActionKind,
    pub elapsed: f32,
    /// Mode that was running when the action started. Kept for the
    /// finish log only; the follow-up mode is rolled fresh.
    pub interrupted: ModeKind,
}

/// Time spent inside the house.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomSession {
    /// Periodic "leave the room?" check.
    pub exit_check: IntervalTimer,
    /// Seconds since entering; eating waits for this to settle.
    pub settled: f32,
}

impl RoomSession {
    pub fn new(rng: &mut fastrand::Rng) -> Self {
        Self {
            exit_check: IntervalTimer::random(rng, ROOM_EXIT_MIN, ROOM_EXIT_MAX),
            settled: 0.0,
        }
    }
}

/// Directed walk toward the house when hungry and the bowl is full.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeWalk {
    pub elapsed: f32,
}

/// Outcome of a room tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStep {
    Stay,
    Leave,
}

/// Outcome of a walk-home tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeStep {
    Walking,
    Arrived,
    GaveUp,
}

pub fn idle(rng: &mut fastrand::Rng) -> BehaviorMode {
    BehaviorMode::Idle(IntervalTimer::random(rng, IDLE_MIN, IDLE_MAX))
}

pub fn playing(rng: &mut fastrand::Rng) -> BehaviorMode {
    BehaviorMode::Playing(IntervalTimer::random(rng, IDLE_MIN, IDLE_MAX))
}

/// Each axis uniform in `[-WALK_SPEED, WALK_SPEED)`.
pub fn random_velocity(rng: &mut fastrand::Rng) -> Vec2 {
    let vx = uniform(rng, -WALK_SPEED, WALK_SPEED);
    let vy = uniform(rng, -WALK_SPEED, WALK_SPEED);
    Vec2::new(vx, vy)
}

fn set_heading(pet: &mut PetState, rng: &mut fastrand::Rng) {
    pet.velocity = random_velocity(rng);
    pet.facing.follow(pet.velocity.x);
}

pub fn enter_idle(pet: &mut PetState, rng: &mut fastrand::Rng) {
    pet.enter(idle(rng));
}

pub fn enter_walking(pet: &mut PetState, rng: &mut fastrand::Rng) {
    pet.enter(BehaviorMode::Walking(IntervalTimer::random(
        rng, WANDER_MIN, WANDER_MAX,
    )));
    set_heading(pet, rng);
}

/// Idle/Walking/Playing timers: start walks, change heading, stop.
pub fn wander(pet: &mut PetState, dt: f32, rng: &mut fastrand::Rng) {
    let fired = match &mut pet.mode {
        BehaviorMode::Idle(timer) | BehaviorMode::Playing(timer) | BehaviorMode::Walking(timer) => {
            timer.tick(dt)
        }
        _ => return,
    };
    if !fired {
        return;
    }

    match pet.mode.kind() {
        ModeKind::Walking => {
            if rng.f32() < STOP_CHANCE {
                enter_idle(pet, rng);
            } else {
                if let BehaviorMode::Walking(timer) = &mut pet.mode {
                    timer.rearm_random(rng, WANDER_MIN, WANDER_MAX);
                }
                set_heading(pet, rng);
            }
        }
        kind => {
            if rng.f32() < WALK_CHANCE {
                enter_walking(pet, rng);
            } else if kind == ModeKind::Playing {
                enter_idle(pet, rng);
            } else if let BehaviorMode::Idle(timer) = &mut pet.mode {
                timer.rearm_random(rng, IDLE_MIN, IDLE_MAX);
            }
        }
    }
}

/// Start a timed action, stopping the pet.
pub fn begin_action(pet: &mut PetState, kind: ActionKind) {
    let interrupted = pet.mode.kind();
    pet.enter(BehaviorMode::PerformingAction(ActionSession {
        kind,
        elapsed: 0.0,
        interrupted,
    }));
}

/// Advance a running action; on expiry pick the follow-up behavior.
pub fn update_action(pet: &mut PetState, dt: f32, rng: &mut fastrand::Rng) {
    let BehaviorMode::PerformingAction(action) = &mut pet.mode else {
        return;
    };
    action.elapsed += dt;
    if action.elapsed < ACTION_DURATION {
        return;
    }
    let done = *action;

    let roll = rng.f32();
    if roll < 0.5 {
        enter_idle(pet, rng);
    } else if roll < 0.75 {
        pet.enter(playing(rng));
    } else {
        enter_walking(pet, rng);
    }
    log::debug!(
        "{:?} finished (interrupted {}) -> {}",
        done.kind,
        done.interrupted.label(),
        pet.mode.kind().label()
    );
}

/// Exit checks while in the room. Locked rooms and drags pause the check.
pub fn update_room(
    session: &mut RoomSession,
    dt: f32,
    locked: bool,
    dragging: bool,
    rng: &mut fastrand::Rng,
) -> RoomStep {
    session.settled += dt;
    if locked || dragging || !session.exit_check.tick(dt) {
        return RoomStep::Stay;
    }
    if rng.f32() < ROOM_EXIT_CHANCE {
        return RoomStep::Leave;
    }
    session.exit_check.rearm_random(rng, ROOM_EXIT_MIN, ROOM_EXIT_MAX);
    RoomStep::Stay
}

/// The pet is settled in the room, hungry, and food is waiting.
pub fn ready_to_eat(session: &RoomSession, needs: &Needs, bowl_full: bool) -> bool {
    bowl_full && needs.hunger < AUTO_EAT_THRESHOLD && session.settled >= EAT_DELAY
}

/// Hungry, food is waiting, and nothing more interesting is going on.
pub fn wants_to_walk_home(pet: &PetState, needs: &Needs, bowl_full: bool) -> bool {
    bowl_full && needs.hunger < AUTO_EAT_THRESHOLD && pet.mode.is_roaming()
}

/// Steer toward the house waypoint.
pub fn update_home_walk(pet: &mut PetState, dt: f32, waypoint: Vec2, sprite: Vec2) -> HomeStep {
    let BehaviorMode::WalkingHome(walk) = &mut pet.mode else {
        return HomeStep::GaveUp;
    };
    walk.elapsed += dt;
    if walk.elapsed >= HOME_WALK_TIMEOUT {
        return HomeStep::GaveUp;
    }

    let to_home = waypoint - pet.center(sprite);
    let distance = to_home.length();
    if distance < HOME_ARRIVAL_RADIUS {
        return HomeStep::Arrived;
    }
    // Zero-length direction means no movement this tick.
    pet.velocity = to_home.normalize_or_zero() * WALK_SPEED;
    pet.facing.follow(pet.velocity.x);
    HomeStep::Walking
}
