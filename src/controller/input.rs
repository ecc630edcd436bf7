/// Platform-agnostic command intake: every input source (DOM buttons, DOM
/// keyboard, winit keyboard, egui buttons) is an adapter that feeds the same
/// queue of commands.
use std::collections::VecDeque;

use crate::model::claw::{Claw, MOVE_STEP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveForward,
    MoveBack,
    Drop,
}

impl Command {
    /// Map a DOM `KeyboardEvent.key` string to a command.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Command::MoveLeft),
            "ArrowRight" => Some(Command::MoveRight),
            "ArrowUp" => Some(Command::MoveForward),
            "ArrowDown" => Some(Command::MoveBack),
            " " | "Space" => Some(Command::Drop),
            _ => None,
        }
    }

    /// Apply this command to the claw. The claw itself ignores horizontal
    /// moves and repeated drops while a drop cycle is running.
    pub fn apply(self, claw: &mut Claw) {
        match self {
            Command::MoveLeft => claw.shift(-MOVE_STEP, 0.0),
            Command::MoveRight => claw.shift(MOVE_STEP, 0.0),
            Command::MoveForward => claw.shift(0.0, -MOVE_STEP),
            Command::MoveBack => claw.shift(0.0, MOVE_STEP),
            Command::Drop => claw.begin_drop(),
        }
    }
}

/// Commands queued by input handlers between frames, drained by the frame
/// loop at the start of each iteration.
#[derive(Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.pending.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::claw::ClawState;

    #[test]
    fn arrow_keys_map_to_moves() {
        assert_eq!(Command::from_key("ArrowLeft"), Some(Command::MoveLeft));
        assert_eq!(Command::from_key("ArrowRight"), Some(Command::MoveRight));
        assert_eq!(Command::from_key("ArrowUp"), Some(Command::MoveForward));
        assert_eq!(Command::from_key("ArrowDown"), Some(Command::MoveBack));
        assert_eq!(Command::from_key(" "), Some(Command::Drop));
        assert_eq!(Command::from_key("Space"), Some(Command::Drop));
        assert_eq!(Command::from_key("a"), None);
    }

    #[test]
    fn commands_offset_claw_by_fixed_step() {
        let mut claw = Claw::new();
        Command::MoveRight.apply(&mut claw);
        Command::MoveRight.apply(&mut claw);
        Command::MoveBack.apply(&mut claw);
        assert_eq!(claw.position.x, 2.0 * MOVE_STEP);
        assert_eq!(claw.position.z, MOVE_STEP);
    }

    #[test]
    fn drop_command_starts_cycle() {
        let mut claw = Claw::new();
        Command::Drop.apply(&mut claw);
        assert_eq!(claw.state, ClawState::Dropping);
    }

    #[test]
    fn queue_drains_in_order() {
        let mut queue = CommandQueue::default();
        queue.push(Command::MoveLeft);
        queue.push(Command::Drop);
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained, vec![Command::MoveLeft, Command::Drop]);
        assert!(queue.is_empty());
    }
}
