use glam::Vec2;

use crate::sim::components::Bounds;

/// Keep a fresh pet this far from the screen edges.
const SPAWN_MARGIN: f32 = 100.0;

/// Pick a name for a pet that has never been named.
pub fn generate_pet_name(rng: &mut fastrand::Rng) -> String {
    const TITLES: &[&str] = &["", "", "", "", "Sir ", "Lady ", "Captain ", "Little "];
    const NAMES: &[&str] = &[
        "Mochi", "Bean", "Pudding", "Sesame", "Dumpling", "Miso", "Kiwi", "Clover",
        "Pebble", "Biscuit", "Noodle", "Tater", "Marshmallow", "Pip", "Crumble",
        "Juniper", "Hazel", "Fig", "Nori", "Waffle",
    ];
    format!(
        "{}{}",
        TITLES[rng.usize(0..TITLES.len())],
        NAMES[rng.usize(0..NAMES.len())],
    )
}

/// Random on-screen starting position for a new pet, away from the edges
/// where that fits.
pub fn spawn_position(bounds: Bounds, sprite: Vec2, rng: &mut fastrand::Rng) -> Vec2 {
    let max = bounds.max_position(sprite);
    let axis = |rng: &mut fastrand::Rng, max: f32| {
        if max > SPAWN_MARGIN * 2.0 {
            SPAWN_MARGIN + rng.f32() * (max - SPAWN_MARGIN * 2.0)
        } else {
            rng.f32() * max
        }
    };
    let x = axis(rng, max.x);
    let y = axis(rng, max.y);
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_nonempty() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..50 {
            let name = generate_pet_name(&mut rng);
            assert!(!name.trim().is_empty());
        }
    }

    #[test]
    fn spawn_stays_inside_margin() {
        let mut rng = fastrand::Rng::with_seed(42);
        let bounds = Bounds::new(1920.0, 1080.0);
        let sprite = Vec2::new(64.0, 64.0);
        for _ in 0..200 {
            let p = spawn_position(bounds, sprite, &mut rng);
            assert!(p.x >= SPAWN_MARGIN && p.x <= 1920.0 - 64.0 - SPAWN_MARGIN);
            assert!(p.y >= SPAWN_MARGIN && p.y <= 1080.0 - 64.0 - SPAWN_MARGIN);
        }
    }

    #[test]
    fn tiny_screen_still_fits() {
        let mut rng = fastrand::Rng::with_seed(1);
        let p = spawn_position(Bounds::new(100.0, 80.0), Vec2::new(64.0, 64.0), &mut rng);
        assert!(p.x <= 36.0 && p.y <= 16.0);
    }
}
