//! Input handling
//!
//! Maps raw keyboard input to a fixed named action set with per-frame
//! edge detection. The simulation only ever reads `ActionState`.

mod actions;
mod state;

pub use actions::Action;
pub use state::{ActionState, InputState};
