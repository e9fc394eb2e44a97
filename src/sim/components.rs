use chrono::{DateTime, Utc};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::behavior::{ActionSession, HomeWalk, RoomSession};
use super::brush::BrushSession;
use super::chase::ChaseSession;
use super::needs::{Boost, Needs};
use super::poop::Poop;
use super::timer::IntervalTimer;

/// Which way the sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// Face along the horizontal velocity. Zero keeps the current facing.
    pub fn follow(&mut self, vx: f32) {
        if vx > 0.0 {
            *self = Facing::Right;
        } else if vx < 0.0 {
            *self = Facing::Left;
        }
    }
}

/// Explicit user actions from the house panel or a click on the pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Feed,
    Clean,
    Play,
    Pet,
}

impl ActionKind {
    pub fn boost(self) -> Boost {
        match self {
            ActionKind::Feed => Boost::Feed,
            ActionKind::Clean => Boost::Clean,
            ActionKind::Play => Boost::Play,
            ActionKind::Pet => Boost::Pet,
        }
    }
}

/// Tools the user can pick up and wave around the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeldItem {
    Brush,
    Scoop,
}

/// Screen area the pet roams, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Largest top-left position that keeps a sprite of `sprite` size on screen.
    pub fn max_position(&self, sprite: Vec2) -> Vec2 {
        Vec2::new(
            (self.width - sprite.x).max(0.0),
            (self.height - sprite.y).max(0.0),
        )
    }

    pub fn clamp_position(&self, pos: Vec2, sprite: Vec2) -> Vec2 {
        pos.clamp(Vec2::ZERO, self.max_position(sprite))
    }

    /// The house panel docked in the bottom-right corner.
    pub fn house_zone(&self) -> Zone {
        Zone {
            min: Vec2::new(self.width - 270.0, self.height - 552.0),
            max: Vec2::new(self.width - 20.0, self.height - 60.0),
        }
    }

    /// Where the pet reappears when it leaves the house on its own.
    pub fn room_exit_point(&self) -> Vec2 {
        Vec2::new(self.width - 300.0, self.height - 200.0)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub min: Vec2,
    pub max: Vec2,
}

impl Zone {
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Flat label of a behavior mode, for renderers and the save file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Idle,
    Walking,
    Playing,
    Chasing,
    Attacking,
    PerformingAction,
    BeingBrushed,
    InRoom,
    WalkingHome,
}

impl ModeKind {
    pub fn label(self) -> &'static str {
        match self {
            ModeKind::Idle => "Idle",
            ModeKind::Walking => "Walking",
            ModeKind::Playing => "Playing",
            ModeKind::Chasing => "Chasing",
            ModeKind::Attacking => "Attacking",
            ModeKind::PerformingAction => "PerformingAction",
            ModeKind::BeingBrushed => "BeingBrushed",
            ModeKind::InRoom => "InRoom",
            ModeKind::WalkingHome => "WalkingHome",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Some(match label {
            "Idle" => ModeKind::Idle,
            "Walking" => ModeKind::Walking,
            "Playing" => ModeKind::Playing,
            "Chasing" => ModeKind::Chasing,
            "Attacking" => ModeKind::Attacking,
            "PerformingAction" => ModeKind::PerformingAction,
            "BeingBrushed" => ModeKind::BeingBrushed,
            "InRoom" => ModeKind::InRoom,
            "WalkingHome" => ModeKind::WalkingHome,
            _ => return None,
        })
    }
}

/// Current behavior, carrying the timers and sub-state of that behavior.
///
/// Only one variant can be live, so chasing, attacking, acting, being
/// brushed and sitting in the room are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorMode {
    /// Standing still; the timer decides when to consider walking.
    Idle(IntervalTimer),
    /// Wandering; the timer decides when to change heading or stop.
    Walking(IntervalTimer),
    /// Stationary play after an action; behaves like idle otherwise.
    Playing(IntervalTimer),
    Chasing(ChaseSession),
    PerformingAction(ActionSession),
    BeingBrushed(BrushSession),
    InRoom(RoomSession),
    WalkingHome(HomeWalk),
}

impl BehaviorMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            BehaviorMode::Idle(_) => ModeKind::Idle,
            BehaviorMode::Walking(_) => ModeKind::Walking,
            BehaviorMode::Playing(_) => ModeKind::Playing,
            BehaviorMode::Chasing(chase) if chase.is_attacking() => ModeKind::Attacking,
            BehaviorMode::Chasing(_) => ModeKind::Chasing,
            BehaviorMode::PerformingAction(_) => ModeKind::PerformingAction,
            BehaviorMode::BeingBrushed(_) => ModeKind::BeingBrushed,
            BehaviorMode::InRoom(_) => ModeKind::InRoom,
            BehaviorMode::WalkingHome(_) => ModeKind::WalkingHome,
        }
    }

    /// Modes in which velocity must be zero.
    pub fn is_stationary(&self) -> bool {
        match self {
            BehaviorMode::Walking(_) | BehaviorMode::WalkingHome(_) => false,
            BehaviorMode::Chasing(chase) => chase.is_attacking(),
            _ => true,
        }
    }

    pub fn is_indoor(&self) -> bool {
        matches!(self, BehaviorMode::InRoom(_))
    }

    /// Free-roaming modes that may be interrupted by chases, brushing or a
    /// hungry walk home.
    pub fn is_roaming(&self) -> bool {
        matches!(
            self,
            BehaviorMode::Idle(_) | BehaviorMode::Walking(_) | BehaviorMode::Playing(_)
        )
    }
}

/// Position, motion and behavior of the pet.
#[derive(Debug, Clone, PartialEq)]
pub struct PetState {
    /// Top-left of the sprite, in screen pixels.
    pub position: Vec2,
    /// Pixels/second.
    pub velocity: Vec2,
    pub facing: Facing,
    pub mode: BehaviorMode,
    /// Seconds spent in the current mode.
    pub mode_elapsed: f32,
}

impl PetState {
    pub fn new(position: Vec2, mode: BehaviorMode) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            mode,
            mode_elapsed: 0.0,
        }
    }

    /// Switch mode, restarting the mode timer. Stationary modes stop the pet.
    pub fn enter(&mut self, mode: BehaviorMode) {
        let from = self.mode.kind();
        let to = mode.kind();
        if from != to {
            log::debug!("Pet mode {} -> {}", from.label(), to.label());
        }
        self.mode = mode;
        self.mode_elapsed = 0.0;
        if self.mode.is_stationary() {
            self.velocity = Vec2::ZERO;
        }
    }

    pub fn center(&self, sprite: Vec2) -> Vec2 {
        self.position + sprite * 0.5
    }
}

/// What the renderer needs after each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    pub position: Vec2,
    pub facing: Facing,
    pub mode: ModeKind,
}

/// The cross-session record the simulation produces on exit and consumes
/// once on startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveSnapshot {
    pub position: Vec2,
    pub mode: ModeKind,
    pub in_room: bool,
    pub needs: Needs,
    pub food_bowl_full: bool,
    pub poops: Vec<Poop>,
    pub room_locked: bool,
    pub last_exit: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_follows_velocity() {
        let mut facing = Facing::Right;
        facing.follow(-3.0);
        assert_eq!(facing, Facing::Left);
        facing.follow(0.0);
        assert_eq!(facing, Facing::Left);
        facing.follow(1.0);
        assert_eq!(facing, Facing::Right);
    }

    #[test]
    fn mode_labels_round_trip() {
        for kind in [
            ModeKind::Idle,
            ModeKind::Walking,
            ModeKind::Playing,
            ModeKind::Chasing,
            ModeKind::Attacking,
            ModeKind::PerformingAction,
            ModeKind::BeingBrushed,
            ModeKind::InRoom,
            ModeKind::WalkingHome,
        ] {
            assert_eq!(ModeKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(ModeKind::from_label("Sleeping"), None);
    }

    #[test]
    fn house_zone_sits_bottom_right() {
        let bounds = Bounds::new(1920.0, 1080.0);
        let zone = bounds.house_zone();
        assert!(zone.contains(Vec2::new(1800.0, 900.0)));
        assert!(!zone.contains(Vec2::new(100.0, 100.0)));
        assert_eq!(zone.center(), Vec2::new(1775.0, 774.0));
    }

    #[test]
    fn entering_stationary_mode_stops_pet() {
        let mut pet = PetState::new(Vec2::ZERO, BehaviorMode::Walking(IntervalTimer::new(3.0)));
        pet.velocity = Vec2::new(30.0, -10.0);
        pet.enter(BehaviorMode::Idle(IntervalTimer::new(5.0)));
        assert_eq!(pet.velocity, Vec2::ZERO);
        assert_eq!(pet.mode.kind(), ModeKind::Idle);
    }
}
