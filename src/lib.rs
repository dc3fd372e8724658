//! GROTTO: a procedural cave-exploration platformer
//!
//! The simulation core (`sim`) is deterministic given its injected random
//! source and advances in lockstep, one fixed-order frame at a time. The
//! rest of the crate is presentation and glue: procedural sprites and
//! audio, action-mapped input, user settings and a leaderboard stub.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod audio;
pub mod input;
pub mod leaderboard;
pub mod render;
pub mod settings;
pub mod sim;
