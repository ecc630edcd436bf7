// MODEL: Game state and data
pub mod camera;
pub mod claw;
pub mod scene;

pub use camera::Camera;
pub use claw::{Claw, ClawState};
pub use scene::{Prize, Scene};
