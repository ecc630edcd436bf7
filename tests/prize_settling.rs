//! Verify the rapier-backed world against the one behavior the toy depends
//! on: boxes dropped above the floor slab come to rest on its top surface.

use approx::assert_relative_eq;
use glam::Vec3;

use clawbox::controller::physics::{PhysicsWorld, GRAVITY};
use clawbox::model::scene::{FLOOR_HALF_EXTENTS, FLOOR_POSITION, PRIZE_HALF_EXTENT};

#[test]
fn box_settles_on_floor_top_surface() {
    let mut world = PhysicsWorld::new(GRAVITY);
    world.add_fixed_cuboid(FLOOR_POSITION, FLOOR_HALF_EXTENTS);
    let prize = world.add_dynamic_cuboid(
        Vec3::new(0.0, 5.0, 0.0),
        Vec3::splat(PRIZE_HALF_EXTENT),
        0.2,
    );

    // 10 simulated seconds at the default 1/60 step: far more than the box
    // needs to fall, bounce, and go to sleep.
    for _ in 0..600 {
        world.step();
    }

    let resting = world.body_translation(prize);
    // Floor top is y = 0, so the box center rests one half-extent above it.
    assert_relative_eq!(resting.y, PRIZE_HALF_EXTENT, epsilon = 0.05);
    assert_relative_eq!(resting.x, 0.0, epsilon = 0.01);
    assert_relative_eq!(resting.z, 0.0, epsilon = 0.01);
}

#[test]
fn settled_box_stays_put() {
    let mut world = PhysicsWorld::new(GRAVITY);
    world.add_fixed_cuboid(FLOOR_POSITION, FLOOR_HALF_EXTENTS);
    let prize = world.add_dynamic_cuboid(
        Vec3::new(0.0, 2.0, 0.0),
        Vec3::splat(PRIZE_HALF_EXTENT),
        0.2,
    );

    for _ in 0..600 {
        world.step();
    }
    let settled = world.body_translation(prize);

    for _ in 0..120 {
        world.step();
    }
    let later = world.body_translation(prize);
    assert_relative_eq!(settled.y, later.y, epsilon = 1e-3);
}
