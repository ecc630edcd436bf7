use glam::Vec3;

/// Rest position the claw returns to after every drop cycle.
pub const START_POSITION: Vec3 = Vec3::new(0.0, 8.0, 0.0);
/// Horizontal offset applied per directional command.
pub const MOVE_STEP: f32 = 0.5;
/// Vertical descent per frame while dropping.
pub const DROP_SPEED: f32 = 0.15;
/// Height at which a drop ends and the claw lifts back up.
pub const DROP_LIMIT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClawState {
    #[default]
    Idle,
    Dropping,
}

/// The player-controlled claw. It has no collider; its position is mutated
/// directly by commands (horizontal) and the frame loop (vertical).
#[derive(Debug, Clone)]
pub struct Claw {
    pub position: Vec3,
    pub state: ClawState,
}

impl Claw {
    pub fn new() -> Self {
        Self {
            position: START_POSITION,
            state: ClawState::Idle,
        }
    }

    /// Offset the claw horizontally. Ignored mid-drop, so every input source
    /// gets the same guard.
    pub fn shift(&mut self, dx: f32, dz: f32) {
        if self.state == ClawState::Dropping {
            return;
        }
        self.position.x += dx;
        self.position.z += dz;
    }

    /// Start a drop cycle. No-op while one is already running.
    pub fn begin_drop(&mut self) {
        if self.state == ClawState::Idle {
            self.state = ClawState::Dropping;
        }
    }

    /// Advance the drop cycle by one frame: descend at a fixed rate, and once
    /// the limit is crossed teleport back to the start height. The lift is
    /// instantaneous, not animated.
    pub fn advance_drop(&mut self) {
        if self.state != ClawState::Dropping {
            return;
        }
        self.position.y -= DROP_SPEED;
        if self.position.y <= DROP_LIMIT {
            self.position.y = START_POSITION.y;
            self.state = ClawState::Idle;
        }
    }

    pub fn is_dropping(&self) -> bool {
        self.state == ClawState::Dropping
    }
}

impl Default for Claw {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifts_accumulate_while_idle() {
        let mut claw = Claw::new();
        claw.shift(MOVE_STEP, 0.0);
        claw.shift(MOVE_STEP, 0.0);
        claw.shift(0.0, -MOVE_STEP);
        assert_eq!(claw.position.x, 1.0);
        assert_eq!(claw.position.z, -0.5);
        assert_eq!(claw.position.y, START_POSITION.y);
    }

    #[test]
    fn shift_ignored_while_dropping() {
        let mut claw = Claw::new();
        claw.begin_drop();
        claw.shift(MOVE_STEP, MOVE_STEP);
        assert_eq!(claw.position.x, 0.0);
        assert_eq!(claw.position.z, 0.0);
    }

    #[test]
    fn begin_drop_is_idempotent() {
        let mut claw = Claw::new();
        claw.begin_drop();
        claw.advance_drop();
        let height = claw.position.y;
        // A second drop command must not restart or double the descent.
        claw.begin_drop();
        claw.advance_drop();
        assert_eq!(claw.state, ClawState::Dropping);
        assert_eq!(claw.position.y, height - DROP_SPEED);
    }

    #[test]
    fn drop_resets_to_exact_start_height() {
        let mut claw = Claw::new();
        claw.begin_drop();
        for _ in 0..60 {
            claw.advance_drop();
            if claw.state == ClawState::Idle {
                break;
            }
        }
        assert_eq!(claw.state, ClawState::Idle);
        assert_eq!(claw.position.y, START_POSITION.y);
    }

    #[test]
    fn advance_is_noop_while_idle() {
        let mut claw = Claw::new();
        claw.advance_drop();
        assert_eq!(claw.position, START_POSITION);
    }
}
