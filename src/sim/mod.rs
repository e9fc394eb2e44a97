pub mod behavior;
pub mod brush;
pub mod chase;
pub mod components;
pub mod movement;
pub mod needs;
pub mod poop;
pub mod proximity;
pub mod reconcile;
pub mod timer;

use chrono::{DateTime, TimeDelta, Utc};
use glam::Vec2;

use crate::config::SimConfig;
use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::pet;

use self::behavior::{HomeStep, RoomSession, RoomStep, HOME_WALK_RETRY, PET_COOLDOWN};
use self::brush::{BrushSession, BrushStep};
use self::chase::{ChaseGate, ChaseStep};
use self::components::{
    ActionKind, BehaviorMode, Bounds, HeldItem, ModeKind, PetState, SaveSnapshot, TickOutput,
};
use self::movement::MoveOutcome;
use self::needs::{Boost, Needs};
use self::poop::{Poop, PoopSpawner};
use self::reconcile::ReconcileReport;
use self::timer::IntervalTimer;

/// The single pet and everything it interacts with.
///
/// Sole owner and mutator of simulation state. Renderers read the
/// [`TickOutput`] and accessors; input layers push cursor and held-item
/// positions between ticks.
pub struct Simulation {
    config: SimConfig,
    bounds: Bounds,
    rng: fastrand::Rng,
    pet: PetState,
    needs: Needs,
    chase: ChaseGate,
    poop: PoopSpawner,
    cursor: Option<Vec2>,
    brush: Option<Vec2>,
    scoop: Option<Vec2>,
    dragging: bool,
    room_locked: bool,
    food_bowl_full: bool,
    /// Seconds since the pet was last petted.
    since_last_pet: f32,
    /// Blocks a new hungry walk after one was abandoned.
    home_walk_retry: Option<IntervalTimer>,
    /// Wall clock advanced by tick deltas; stamps spawned poops.
    clock: DateTime<Utc>,
    pending_time_away_poop: bool,
    timers: SystemTimers,
    tick_count: u64,
}

impl Simulation {
    pub fn new(config: SimConfig, seed: u64, now: DateTime<Utc>) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let bounds = config.screen;
        let position = pet::spawn_position(bounds, config.sprite_size, &mut rng);
        let mode = behavior::idle(&mut rng);
        let poop = PoopSpawner::new(config.poop_interval_secs, config.poop_chance);
        log::info!(
            "Simulation ready ({} profile, seed {seed}, {}x{})",
            config.label(),
            bounds.width,
            bounds.height
        );
        Self {
            config,
            bounds,
            rng,
            pet: PetState::new(position, mode),
            needs: Needs::default(),
            chase: ChaseGate::new(),
            poop,
            cursor: None,
            brush: None,
            scoop: None,
            dragging: false,
            room_locked: false,
            food_bowl_full: false,
            since_last_pet: PET_COOLDOWN,
            home_walk_retry: None,
            clock: now,
            pending_time_away_poop: false,
            timers: SystemTimers::new(),
            tick_count: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the simulation by `dt` seconds. Zero, negative or non-finite
    /// deltas change nothing.
    pub fn tick(&mut self, dt: f32) -> TickOutput {
        if !(dt > 0.0 && dt.is_finite()) {
            return self.output();
        }
        self.tick_count += 1;
        let step = TimeDelta::microseconds((f64::from(dt) * 1_000_000.0).round() as i64);
        match self.clock.checked_add_signed(step) {
            Some(clock) => self.clock = clock,
            None => log::warn!("Clock overflow on a {dt}s tick, keeping {}", self.clock),
        }
        self.pet.mode_elapsed += dt;

        self.timers.begin();
        self.chase.tick_cooldown(dt);
        self.since_last_pet += dt;
        if self.home_walk_retry.as_mut().is_some_and(|retry| retry.tick(dt)) {
            self.home_walk_retry = None;
        }
        self.timers.end(SystemPhase::Timers);

        self.timers.begin();
        self.update_chase_trigger(dt);
        self.timers.end(SystemPhase::Chase);

        self.timers.begin();
        self.update_behavior(dt);
        self.timers.end(SystemPhase::Behavior);

        self.timers.begin();
        self.update_movement(dt);
        self.timers.end(SystemPhase::Movement);

        self.timers.begin();
        self.needs.tick(dt, self.pet.mode.is_indoor());
        self.timers.end(SystemPhase::Needs);

        self.timers.begin();
        self.update_brush(dt);
        self.poop
            .update_scoop(self.scoop, self.config.garbage_position(self.bounds));
        self.timers.end(SystemPhase::Interaction);

        self.timers.begin();
        self.update_spawner(dt);
        self.timers.end(SystemPhase::Spawner);

        self.check_invariants();
        self.output()
    }

    fn output(&self) -> TickOutput {
        TickOutput {
            position: self.pet.position,
            facing: self.pet.facing,
            mode: self.pet.mode.kind(),
        }
    }

    fn update_chase_trigger(&mut self, dt: f32) {
        let eligible = self.pet.mode.is_roaming() && !self.dragging;
        let center = self.pet.center(self.config.sprite_size);
        if let Some(session) = self.chase.try_trigger(
            center,
            self.cursor,
            eligible,
            self.config.attack_hold_secs,
            dt,
            &mut self.rng,
        ) {
            self.pet.enter(BehaviorMode::Chasing(session));
        }
    }

    fn update_behavior(&mut self, dt: f32) {
        let sprite = self.config.sprite_size;
        let center = self.pet.center(sprite);

        match &mut self.pet.mode {
            BehaviorMode::PerformingAction(_) => {
                behavior::update_action(&mut self.pet, dt, &mut self.rng);
            }
            BehaviorMode::Chasing(chase) => {
                let step = chase.update(
                    center,
                    self.cursor,
                    dt,
                    &mut self.pet.velocity,
                    &mut self.pet.facing,
                );
                match step {
                    ChaseStep::Running => {}
                    ChaseStep::AttackStarted => log::info!("Attack!"),
                    ChaseStep::AttackFinished => log::debug!("Attack finished, resuming chase"),
                    ChaseStep::Finished => self.end_chase("duration elapsed"),
                }
            }
            BehaviorMode::InRoom(session) => {
                let step = behavior::update_room(
                    session,
                    dt,
                    self.room_locked,
                    self.dragging,
                    &mut self.rng,
                );
                let hungry = behavior::ready_to_eat(session, &self.needs, self.food_bowl_full);
                if hungry {
                    self.food_bowl_full = false;
                    self.needs.apply(Boost::BowlMeal);
                    log::info!("Pet ate from the food bowl. Hunger: {:.1}", self.needs.hunger);
                }
                if step == RoomStep::Leave {
                    log::info!("Pet decided to leave the room");
                    self.leave_room(None);
                }
            }
            BehaviorMode::WalkingHome(_) => {
                if self.dragging {
                    return;
                }
                let waypoint = self.bounds.house_zone().center();
                match behavior::update_home_walk(&mut self.pet, dt, waypoint, sprite) {
                    HomeStep::Walking => {}
                    HomeStep::Arrived => {
                        log::info!("Pet walked home hungry");
                        self.enter_room();
                    }
                    HomeStep::GaveUp => {
                        log::info!("Pet gave up walking home, retrying in {HOME_WALK_RETRY:.0}s");
                        self.home_walk_retry = Some(IntervalTimer::new(HOME_WALK_RETRY));
                        behavior::enter_idle(&mut self.pet, &mut self.rng);
                    }
                }
            }
            BehaviorMode::BeingBrushed(_) => {}
            BehaviorMode::Idle(_) | BehaviorMode::Walking(_) | BehaviorMode::Playing(_) => {
                if self.dragging {
                    return;
                }
                if self.home_walk_retry.is_none()
                    && behavior::wants_to_walk_home(&self.pet, &self.needs, self.food_bowl_full)
                {
                    log::info!(
                        "Pet is hungry ({:.1}) and the bowl is full, heading home",
                        self.needs.hunger
                    );
                    self.pet
                        .enter(BehaviorMode::WalkingHome(behavior::HomeWalk { elapsed: 0.0 }));
                } else {
                    behavior::wander(&mut self.pet, dt, &mut self.rng);
                }
            }
        }
    }

    fn update_movement(&mut self, dt: f32) {
        if self.dragging {
            return;
        }
        let outcome = movement::step(&mut self.pet, dt, self.bounds, self.config.sprite_size);
        if outcome == MoveOutcome::ChaseAborted {
            self.end_chase("hit screen edge");
        }
    }

    fn update_brush(&mut self, dt: f32) {
        let center = self.pet.center(self.config.sprite_size);

        let step = match &mut self.pet.mode {
            BehaviorMode::BeingBrushed(session) => {
                Some((session.update(center, self.brush, dt), session.strokes))
            }
            _ => None,
        };

        match step {
            Some((BrushStep::Stroke, strokes)) => {
                self.needs.apply(Boost::BrushStroke);
                log::debug!(
                    "Brush stroke #{strokes}. Cleanliness: {:.1}, Happiness: {:.1}",
                    self.needs.cleanliness,
                    self.needs.happiness
                );
            }
            Some((BrushStep::Holding, _)) => {}
            Some((BrushStep::Ended, strokes)) => {
                log::info!("Brushing ended after {strokes} strokes");
                behavior::enter_idle(&mut self.pet, &mut self.rng);
            }
            None => {
                if self.dragging || !self.pet.mode.is_roaming() {
                    return;
                }
                let Some(held) = self.brush else {
                    return;
                };
                if brush::in_contact(center, Some(held)) {
                    log::info!("Brushing started");
                    self.chase.reset_proximity();
                    self.pet
                        .enter(BehaviorMode::BeingBrushed(BrushSession::begin(held)));
                }
            }
        }
    }

    fn update_spawner(&mut self, dt: f32) {
        let eligible = !self.dragging
            && matches!(self.pet.mode, BehaviorMode::Idle(_) | BehaviorMode::Walking(_));
        if self.poop.tick(dt, eligible, &mut self.rng) {
            self.poop.spawn_behind(
                &self.pet,
                self.config.sprite_size,
                self.bounds,
                self.clock,
                &mut self.needs,
            );
        }
    }

    // -----------------------------------------------------------------------
    // Transitions shared by tick and input handlers
    // -----------------------------------------------------------------------

    fn end_chase(&mut self, reason: &str) {
        behavior::enter_idle(&mut self.pet, &mut self.rng);
        let secs = self.chase.start_cooldown(&mut self.rng);
        log::info!("Chase ended ({reason}). Cooldown: {secs:.0}s");
    }

    fn enter_room(&mut self) {
        let session = RoomSession::new(&mut self.rng);
        self.pet.enter(BehaviorMode::InRoom(session));
        self.chase.reset_proximity();
        self.needs.apply(Boost::EnterRoom);
        log::info!(
            "Pet entered the room. Happiness: {:.1}",
            self.needs.happiness
        );
    }

    fn leave_room(&mut self, at: Option<Vec2>) {
        let target = at.unwrap_or_else(|| self.bounds.room_exit_point());
        self.pet.position = self.bounds.clamp_position(target, self.config.sprite_size);
        behavior::enter_idle(&mut self.pet, &mut self.rng);
        log::info!(
            "Pet left the room at ({:.0}, {:.0})",
            self.pet.position.x,
            self.pet.position.y
        );
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    /// Feed, clean, play or pet. Returns false when the action was ignored:
    /// another action is still running, or the pet was petted too recently.
    pub fn apply_user_action(&mut self, kind: ActionKind) -> bool {
        if matches!(self.pet.mode, BehaviorMode::PerformingAction(_)) {
            log::debug!("{kind:?} ignored, an action is already running");
            return false;
        }
        if kind == ActionKind::Pet {
            if self.since_last_pet < PET_COOLDOWN {
                log::debug!("Pet ignored, petted {:.1}s ago", self.since_last_pet);
                return false;
            }
            self.since_last_pet = 0.0;
        }

        self.needs.apply(kind.boost());
        log::info!(
            "{kind:?}: H:{:.1} C:{:.1} Hp:{:.1}",
            self.needs.hunger,
            self.needs.cleanliness,
            self.needs.happiness
        );

        if self.pet.mode.is_indoor() {
            return true;
        }
        if matches!(self.pet.mode, BehaviorMode::Chasing(_)) {
            let secs = self.chase.start_cooldown(&mut self.rng);
            log::info!("Chase interrupted by {kind:?}. Cooldown: {secs:.0}s");
        }
        behavior::begin_action(&mut self.pet, kind);
        true
    }

    pub fn set_cursor_position(&mut self, cursor: Option<Vec2>) {
        self.cursor = cursor;
    }

    /// Position of a held brush or scoop, or `None` once it is put down.
    pub fn set_held_item_position(&mut self, item: HeldItem, position: Option<Vec2>) {
        match item {
            HeldItem::Brush => self.brush = position,
            HeldItem::Scoop => self.scoop = position,
        }
    }

    /// Put the pet in the room. Returns false if it is already there.
    pub fn request_enter_room(&mut self) -> bool {
        if self.pet.mode.is_indoor() {
            return false;
        }
        self.enter_room();
        true
    }

    /// Take the pet out of the room, to `at` or the default exit point.
    /// Returns false if the pet is not in the room.
    pub fn request_exit_room(&mut self, at: Option<Vec2>) -> bool {
        if !self.pet.mode.is_indoor() {
            return false;
        }
        self.leave_room(at);
        true
    }

    /// Start or stop a drag. Dropping the pet inside the house zone puts it
    /// in the room.
    pub fn set_dragging(&mut self, dragging: bool) {
        if dragging == self.dragging {
            return;
        }
        self.dragging = dragging;

        if dragging {
            match self.pet.mode {
                BehaviorMode::InRoom(_) | BehaviorMode::PerformingAction(_) => {}
                BehaviorMode::Chasing(_) => self.end_chase("picked up"),
                _ => behavior::enter_idle(&mut self.pet, &mut self.rng),
            }
            self.pet.velocity = Vec2::ZERO;
            log::debug!("Drag started");
            return;
        }

        let center = self.pet.center(self.config.sprite_size);
        if !self.pet.mode.is_indoor() && self.bounds.house_zone().contains(center) {
            log::info!("Pet dropped on the house");
            self.enter_room();
        }
    }

    /// Move the pet while it is being dragged. Ignored otherwise.
    pub fn set_pet_position(&mut self, position: Vec2) -> bool {
        if !self.dragging {
            return false;
        }
        self.pet.position = self.bounds.clamp_position(position, self.config.sprite_size);
        true
    }

    pub fn set_room_locked(&mut self, locked: bool) {
        if locked != self.room_locked {
            log::info!("Room {}", if locked { "locked" } else { "unlocked" });
        }
        self.room_locked = locked;
    }

    /// Returns false if the bowl was already full.
    pub fn fill_food_bowl(&mut self) -> bool {
        if self.food_bowl_full {
            return false;
        }
        self.food_bowl_full = true;
        log::info!("Food bowl filled");
        true
    }

    /// Screen resized. Keeps the pet on screen.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.pet.position = bounds.clamp_position(self.pet.position, self.config.sprite_size);
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Restore state from the previous session, catching up on time away.
    ///
    /// Transient modes (chase, attack, actions, brushing, walking home) are
    /// not resumed; the pet comes back idle.
    pub fn load_snapshot(&mut self, snapshot: SaveSnapshot, now: DateTime<Utc>) -> ReconcileReport {
        let mut snapshot = snapshot;
        let report = reconcile::reconcile(&mut snapshot, now, self.config.time_away_poop_hours);

        self.needs = snapshot.needs;
        self.needs.sanitize();
        self.pet.position = if snapshot.position.is_finite() {
            self.bounds
                .clamp_position(snapshot.position, self.config.sprite_size)
        } else {
            self.bounds.room_exit_point()
        };
        self.food_bowl_full = snapshot.food_bowl_full;
        self.room_locked = snapshot.room_locked;
        self.poop.restore(snapshot.poops);
        self.chase = ChaseGate::new();
        self.home_walk_retry = None;
        self.dragging = false;
        self.clock = now;
        self.pending_time_away_poop = report.spawn_time_away_poop;

        if snapshot.in_room || snapshot.mode == ModeKind::InRoom {
            let session = RoomSession::new(&mut self.rng);
            self.pet.enter(BehaviorMode::InRoom(session));
        } else {
            match snapshot.mode {
                ModeKind::Walking => behavior::enter_walking(&mut self.pet, &mut self.rng),
                ModeKind::Playing => self.pet.enter(behavior::playing(&mut self.rng)),
                _ => behavior::enter_idle(&mut self.pet, &mut self.rng),
            }
        }

        log::info!(
            "Loaded snapshot: {} at ({:.0}, {:.0}), {} poop(s)",
            self.pet.mode.kind().label(),
            self.pet.position.x,
            self.pet.position.y,
            self.poop.poops().len()
        );
        report
    }

    pub fn capture_snapshot(&self, now: DateTime<Utc>) -> SaveSnapshot {
        SaveSnapshot {
            position: self.pet.position,
            mode: self.pet.mode.kind(),
            in_room: self.pet.mode.is_indoor(),
            needs: self.needs,
            food_bowl_full: self.food_bowl_full,
            poops: self.poop.poops().to_vec(),
            room_locked: self.room_locked,
            last_exit: now,
        }
    }

    /// Drop the poop owed for a long absence, once.
    pub fn take_time_away_poop(&mut self) -> Option<Poop> {
        if !std::mem::take(&mut self.pending_time_away_poop) {
            return None;
        }
        let poop = self
            .poop
            .spawn_random(self.bounds, self.clock, &mut self.needs, &mut self.rng);
        Some(poop)
    }

    // -----------------------------------------------------------------------
    // Invariants
    // -----------------------------------------------------------------------

    /// Verify state that the mode machine should keep consistent. On a
    /// violation the pet is reset to Idle and false is returned.
    pub fn check_invariants(&mut self) -> bool {
        let mut problems = Vec::new();
        if !self.needs.is_valid() {
            problems.push("needs out of range");
        }
        if !self.pet.position.is_finite() || !self.pet.velocity.is_finite() {
            problems.push("non-finite position or velocity");
        }
        if self.pet.mode.is_stationary() && self.pet.velocity != Vec2::ZERO {
            problems.push("stationary mode with non-zero velocity");
        }
        if matches!(self.pet.mode, BehaviorMode::Chasing(_)) && self.chase.is_cooling_down() {
            problems.push("chasing during cooldown");
        }
        if problems.is_empty() {
            return true;
        }

        log::error!(
            "Invariant violated in {} ({}), resetting to Idle",
            self.pet.mode.kind().label(),
            problems.join(", ")
        );
        self.needs.sanitize();
        if !self.pet.position.is_finite() {
            self.pet.position = self.bounds.room_exit_point();
        }
        self.pet.position = self
            .bounds
            .clamp_position(self.pet.position, self.config.sprite_size);
        behavior::enter_idle(&mut self.pet, &mut self.rng);
        self.pet.velocity = Vec2::ZERO;
        self.chase.reset_proximity();
        false
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn pet(&self) -> &PetState {
        &self.pet
    }

    pub fn mode(&self) -> ModeKind {
        self.pet.mode.kind()
    }

    pub fn needs(&self) -> &Needs {
        &self.needs
    }

    pub fn poops(&self) -> &[Poop] {
        self.poop.poops()
    }

    pub fn is_holding_poop(&self) -> bool {
        self.poop.is_holding()
    }

    pub fn chase_cooldown(&self) -> Option<&IntervalTimer> {
        self.chase.cooldown()
    }

    /// Seconds until an abandoned hungry walk may be retried.
    pub fn home_walk_retry_secs(&self) -> Option<f32> {
        self.home_walk_retry.as_ref().map(IntervalTimer::remaining)
    }

    /// Seconds the cursor has lingered inside the chase detection radius.
    pub fn chase_proximity_secs(&self) -> f32 {
        self.chase.proximity_secs()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_room_locked(&self) -> bool {
        self.room_locked
    }

    pub fn food_bowl_full(&self) -> bool {
        self.food_bowl_full
    }

    pub fn has_pending_time_away_poop(&self) -> bool {
        self.pending_time_away_poop
    }

    pub fn clock(&self) -> DateTime<Utc> {
        self.clock
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn phase_timings(&self) -> &SystemTimers {
        &self.timers
    }
}
