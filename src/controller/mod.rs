// CONTROLLER: Input, physics, and the per-frame update
pub mod frame_loop;
pub mod input;
pub mod physics;

pub use frame_loop::{advance, CameraUniform, FrameLoopContext, LightingUniform};
pub use input::{Command, CommandQueue};
pub use physics::PhysicsWorld;
