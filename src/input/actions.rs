//! Game action definitions
//!
//! The simulation only ever sees this fixed action set; the key bindings
//! that produce it live in the input state layer.

/// All actions the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Sprint,
    Whip,
    Rope,
    ThrowBomb,
    Enter,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::Sprint,
        Action::Whip,
        Action::Rope,
        Action::ThrowBomb,
        Action::Enter,
    ];

    /// Key hint shown on the controls screen
    pub fn key_hint(self) -> &'static str {
        match self {
            Action::Left => "A / Left",
            Action::Right => "D / Right",
            Action::Up => "W / Up",
            Action::Down => "S / Down",
            Action::Jump => "Space",
            Action::Sprint => "Shift",
            Action::Whip => "C",
            Action::Rope => "G",
            Action::ThrowBomb => "F",
            Action::Enter => "Enter",
        }
    }

    /// Display label shown on the controls screen
    pub fn label(self) -> &'static str {
        match self {
            Action::Left => "Move left",
            Action::Right => "Move right",
            Action::Up => "Climb up",
            Action::Down => "Climb down / crouch",
            Action::Jump => "Jump",
            Action::Sprint => "Sprint",
            Action::Whip => "Whip",
            Action::Rope => "Throw rope",
            Action::ThrowBomb => "Throw bomb (crouch to place)",
            Action::Enter => "Enter door",
        }
    }
}
