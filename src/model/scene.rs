use glam::Vec3;
use rand::Rng;
use rapier3d::prelude::RigidBodyHandle;

use crate::controller::physics::PhysicsWorld;
use crate::model::claw::Claw;

pub const PRIZE_COUNT: usize = 8;
pub const PRIZE_HALF_EXTENT: f32 = 0.5;
pub const PRIZE_RESTITUTION: f32 = 0.2;
/// Prizes spawn with x and z drawn uniformly from ±PRIZE_SPREAD/2.
pub const PRIZE_SPREAD: f32 = 6.0;

/// The floor slab occupies y ∈ [-1, 0]; its top surface is y = 0.
pub const FLOOR_POSITION: Vec3 = Vec3::new(0.0, -0.5, 0.0);
pub const FLOOR_HALF_EXTENTS: Vec3 = Vec3::new(10.0, 0.5, 10.0);

/// A prize box. The physics body owns the position; `position` is the render
/// copy, refreshed from the body every frame and never written back.
pub struct Prize {
    pub body: RigidBodyHandle,
    pub position: Vec3,
}

pub struct Scene {
    pub claw: Claw,
    pub prizes: Vec<Prize>,
    pub floor: RigidBodyHandle,
}

impl Scene {
    /// Build the fixed floor, the claw, and the stacked prize boxes.
    ///
    /// Generic over the rng so tests can pass a seeded `StdRng`. Prizes start
    /// at stepped heights, so they do not interpenetrate at spawn; lateral
    /// overlap is left for the engine's collision response to resolve.
    pub fn new<R: Rng + ?Sized>(physics: &mut PhysicsWorld, rng: &mut R) -> Self {
        let floor = physics.add_fixed_cuboid(FLOOR_POSITION, FLOOR_HALF_EXTENTS);

        let half_spread = PRIZE_SPREAD / 2.0;
        let mut prizes = Vec::with_capacity(PRIZE_COUNT);
        for i in 0..PRIZE_COUNT {
            let position = Vec3::new(
                rng.gen_range(-half_spread..half_spread),
                2.0 + i as f32,
                rng.gen_range(-half_spread..half_spread),
            );
            let body = physics.add_dynamic_cuboid(
                position,
                Vec3::splat(PRIZE_HALF_EXTENT),
                PRIZE_RESTITUTION,
            );
            prizes.push(Prize { body, position });
        }

        Self {
            claw: Claw::new(),
            prizes,
            floor,
        }
    }

    /// One-way sync: copy each prize body's translation onto its render
    /// position. Rotation is intentionally not carried over.
    pub fn sync_from_physics(&mut self, physics: &PhysicsWorld) {
        for prize in &mut self.prizes {
            prize.position = physics.body_translation(prize.body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::physics::GRAVITY;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawns_stacked_prizes_inside_spread() {
        let mut physics = PhysicsWorld::new(GRAVITY);
        let mut rng = StdRng::seed_from_u64(7);
        let scene = Scene::new(&mut physics, &mut rng);

        assert_eq!(scene.prizes.len(), PRIZE_COUNT);
        for (i, prize) in scene.prizes.iter().enumerate() {
            assert_eq!(prize.position.y, 2.0 + i as f32);
            assert!(prize.position.x.abs() < PRIZE_SPREAD / 2.0);
            assert!(prize.position.z.abs() < PRIZE_SPREAD / 2.0);
        }
    }

    #[test]
    fn sync_copies_body_translations() {
        let mut physics = PhysicsWorld::new(GRAVITY);
        let mut rng = StdRng::seed_from_u64(7);
        let mut scene = Scene::new(&mut physics, &mut rng);

        for _ in 0..10 {
            physics.step();
        }
        scene.sync_from_physics(&physics);
        for prize in &scene.prizes {
            assert_eq!(prize.position, physics.body_translation(prize.body));
        }
    }
}
