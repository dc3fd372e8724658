//! Simulation core
//!
//! Everything that advances in lockstep on the fixed per-frame update:
//! tile grid, level generation, physics, the player controller, enemy AI
//! and secondary hazards. The session orchestrates the fixed order and is
//! the only type the presentation layer needs to read.
//!
//! Nothing in here touches a window, an audio device or the network.

pub mod tiles;
pub mod levelgen;
pub mod physics;
pub mod events;
pub mod hazards;
pub mod entities;
pub mod player;
pub mod session;

pub use events::{EventQueue, SoundEvent};
pub use physics::Body;
pub use player::Player;
pub use session::{Phase, Session};
pub use tiles::{Tile, TileMap, COLS, ROWS, TILE};
