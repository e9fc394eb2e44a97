use glam::Vec2;

use super::components::{BehaviorMode, Bounds, PetState};

/// Minimum speed on an axis after bouncing off a screen edge.
const MIN_BOUNCE_VELOCITY: f32 = 20.0;

/// What happened at the screen edges during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Hit an edge and reflected off it.
    Bounced,
    /// Hit an edge while chasing. The caller ends the chase.
    ChaseAborted,
}

/// Integrate velocity into position and keep the sprite on screen.
///
/// Stationary modes are only clamped, never bounced, so a resize cannot
/// kick an idle pet into motion.
pub fn step(pet: &mut PetState, dt: f32, bounds: Bounds, sprite: Vec2) -> MoveOutcome {
    let max = bounds.max_position(sprite);

    if pet.mode.is_stationary() {
        pet.position = pet.position.clamp(Vec2::ZERO, max);
        return MoveOutcome::Moved;
    }

    let mut next = pet.position + pet.velocity * dt;
    let mut hit_x = None;
    let mut hit_y = None;

    if next.x < 0.0 {
        next.x = 0.0;
        hit_x = Some(1.0);
    } else if next.x > max.x {
        next.x = max.x;
        hit_x = Some(-1.0);
    }
    if next.y < 0.0 {
        next.y = 0.0;
        hit_y = Some(1.0);
    } else if next.y > max.y {
        next.y = max.y;
        hit_y = Some(-1.0);
    }

    pet.position = next;

    if hit_x.is_none() && hit_y.is_none() {
        return MoveOutcome::Moved;
    }

    if matches!(pet.mode, BehaviorMode::Chasing(_)) {
        return MoveOutcome::ChaseAborted;
    }

    // Reflect away from the wall that was hit.
    if let Some(sign) = hit_x {
        pet.velocity.x = sign * pet.velocity.x.abs().max(MIN_BOUNCE_VELOCITY);
        pet.facing.follow(pet.velocity.x);
    }
    if let Some(sign) = hit_y {
        pet.velocity.y = sign * pet.velocity.y.abs().max(MIN_BOUNCE_VELOCITY);
    }
    MoveOutcome::Bounced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::chase::ChaseSession;
    use crate::sim::components::Facing;
    use crate::sim::timer::IntervalTimer;

    const BOUNDS: Bounds = Bounds::new(800.0, 600.0);
    const SPRITE: Vec2 = Vec2::new(64.0, 64.0);

    fn walking(pos: Vec2, vel: Vec2) -> PetState {
        let mut pet = PetState::new(pos, BehaviorMode::Walking(IntervalTimer::new(5.0)));
        pet.velocity = vel;
        pet
    }

    #[test]
    fn integrates_velocity() {
        let mut pet = walking(Vec2::new(100.0, 100.0), Vec2::new(50.0, -25.0));
        assert_eq!(step(&mut pet, 0.5, BOUNDS, SPRITE), MoveOutcome::Moved);
        assert_eq!(pet.position, Vec2::new(125.0, 87.5));
    }

    #[test]
    fn bounces_off_left_edge_with_min_speed() {
        let mut pet = walking(Vec2::new(1.0, 100.0), Vec2::new(-5.0, 0.0));
        pet.facing = Facing::Left;
        assert_eq!(step(&mut pet, 1.0, BOUNDS, SPRITE), MoveOutcome::Bounced);
        assert_eq!(pet.position.x, 0.0);
        assert_eq!(pet.velocity.x, MIN_BOUNCE_VELOCITY);
        assert_eq!(pet.facing, Facing::Right);
    }

    #[test]
    fn bounces_off_bottom_right() {
        let mut pet = walking(Vec2::new(730.0, 530.0), Vec2::new(40.0, 40.0));
        assert_eq!(step(&mut pet, 1.0, BOUNDS, SPRITE), MoveOutcome::Bounced);
        assert_eq!(pet.position, Vec2::new(736.0, 536.0));
        assert_eq!(pet.velocity, Vec2::new(-40.0, -40.0));
        assert_eq!(pet.facing, Facing::Left);
    }

    #[test]
    fn chase_aborts_at_edge() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut pet = PetState::new(
            Vec2::new(0.0, 100.0),
            BehaviorMode::Chasing(ChaseSession::start(&mut rng, 0.0)),
        );
        pet.velocity = Vec2::new(-150.0, 0.0);
        assert_eq!(step(&mut pet, 0.016, BOUNDS, SPRITE), MoveOutcome::ChaseAborted);
        assert_eq!(pet.position.x, 0.0);
        assert_eq!(pet.velocity.x, -150.0);
    }

    #[test]
    fn stationary_pet_only_clamped() {
        let mut pet = PetState::new(
            Vec2::new(790.0, 10.0),
            BehaviorMode::Idle(IntervalTimer::new(5.0)),
        );
        assert_eq!(step(&mut pet, 1.0, BOUNDS, SPRITE), MoveOutcome::Moved);
        assert_eq!(pet.position, Vec2::new(736.0, 10.0));
        assert_eq!(pet.velocity, Vec2::ZERO);
    }
}
