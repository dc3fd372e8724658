//! Input state management
//!
//! Polls the keyboard once per frame and folds it into a plain
//! `ActionState` snapshot. Momentary actions carry previous-frame edge
//! copies so the simulation can react to a fresh press without ever
//! touching the input backend itself.

use macroquad::input::{is_key_down, KeyCode};

use super::Action;

/// One frame's worth of input, as the simulation sees it.
///
/// `*_pressed` fields are true only on the frame the action went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub sprint: bool,
    pub whip: bool,
    pub rope: bool,
    pub throw_bomb: bool,
    pub enter: bool,

    pub jump_pressed: bool,
    pub whip_pressed: bool,
    pub rope_pressed: bool,
    pub throw_bomb_pressed: bool,
    pub enter_pressed: bool,
}

impl ActionState {
    /// Fill in the edge-detection copies from the previous frame's state.
    pub fn derive_edges(&mut self, prev: &ActionState) {
        self.jump_pressed = self.jump && !prev.jump;
        self.whip_pressed = self.whip && !prev.whip;
        self.rope_pressed = self.rope && !prev.rope;
        self.throw_bomb_pressed = self.throw_bomb && !prev.throw_bomb;
        self.enter_pressed = self.enter && !prev.enter;
    }
}

/// Polls the keyboard and produces `ActionState` snapshots.
pub struct InputState {
    previous: ActionState,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            previous: ActionState::default(),
        }
    }

    /// Call once per frame. Returns the snapshot for this frame.
    pub fn poll(&mut self) -> ActionState {
        let mut state = ActionState {
            left: action_down(Action::Left),
            right: action_down(Action::Right),
            up: action_down(Action::Up),
            down: action_down(Action::Down),
            jump: action_down(Action::Jump),
            sprint: action_down(Action::Sprint),
            whip: action_down(Action::Whip),
            rope: action_down(Action::Rope),
            throw_bomb: action_down(Action::ThrowBomb),
            enter: action_down(Action::Enter),
            ..Default::default()
        };
        state.derive_edges(&self.previous);
        self.previous = state;
        state
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

fn action_down(action: Action) -> bool {
    match action {
        Action::Left => is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
        Action::Right => is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
        Action::Up => is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
        Action::Down => is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
        Action::Jump => is_key_down(KeyCode::Space),
        Action::Sprint => is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
        Action::Whip => is_key_down(KeyCode::C),
        Action::Rope => is_key_down(KeyCode::G),
        Action::ThrowBomb => is_key_down(KeyCode::F),
        Action::Enter => is_key_down(KeyCode::Enter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_fire_only_on_fresh_press() {
        let prev = ActionState::default();
        let mut held = ActionState {
            jump: true,
            ..Default::default()
        };
        held.derive_edges(&prev);
        assert!(held.jump_pressed);

        // Still held next frame: no longer a fresh press
        let mut again = ActionState {
            jump: true,
            ..Default::default()
        };
        again.derive_edges(&held);
        assert!(!again.jump_pressed);
    }

    #[test]
    fn test_release_and_repress_fires_again() {
        let mut first = ActionState {
            whip: true,
            ..Default::default()
        };
        first.derive_edges(&ActionState::default());
        assert!(first.whip_pressed);

        let mut released = ActionState::default();
        released.derive_edges(&first);
        assert!(!released.whip_pressed);

        let mut repressed = ActionState {
            whip: true,
            ..Default::default()
        };
        repressed.derive_edges(&released);
        assert!(repressed.whip_pressed);
    }
}
