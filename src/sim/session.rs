//! Simulation session
//!
//! Owns the tile grid and every object list, and advances them in a fixed
//! per-frame order: player, entities, bombs, pickups, particles. Each frame
//! is the unit of atomicity; subsystems borrow the state for the duration
//! of one call and nothing retains a reference across frames. The
//! presentation layer reads the session and drains its sound queue.

use macroquad::math::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::entities::{self, Entity};
use super::events::{EventQueue, SoundEvent};
use super::hazards::{self, Bomb, GemKind, Particle, Pickup, Rope};
use super::levelgen;
use super::physics;
use super::player::{Player, WHIP_FRAMES};
use super::tiles::{Tile, TileMap, COLS, ROWS, TILE};
use crate::input::ActionState;

/// What the session is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    LevelComplete,
    Dead,
}

/// A treasure chest resting on the map
#[derive(Debug, Clone, Copy)]
pub struct Chest {
    pub col: i32,
    pub row: i32,
    pub open: bool,
}

impl Chest {
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.col as f32 * TILE + TILE / 2.0,
            self.row as f32 * TILE + TILE / 2.0,
        )
    }
}

/// Number of sub-levels per major level in the "2-3" style label
const SUB_LEVELS: u32 = 4;

pub struct Session {
    pub level: u32,
    pub map: TileMap,
    pub player: Player,
    pub entities: Vec<Entity>,
    pub bombs: Vec<Bomb>,
    pub ropes: Vec<Rope>,
    pub pickups: Vec<Pickup>,
    pub particles: Vec<Particle>,
    pub chests: Vec<Chest>,
    pub exit_door: Vec2,
    pub phase: Phase,
    pub frame: u64,
    /// Seconds spent in the current level (frame-accumulated)
    pub level_time: f32,
    pub sounds: EventQueue<SoundEvent>,
    rng: SmallRng,
}

impl Session {
    /// Start a fresh run at level 1
    pub fn new(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    pub fn with_rng(mut rng: SmallRng) -> Self {
        let generated = levelgen::generate(1, &mut rng);
        let mut session = Self {
            level: 1,
            map: generated.map,
            player: Player::spawn(generated.player_start - Vec2::new(0.0, TILE)),
            entities: generated.spawns.iter().map(Entity::from_spawn).collect(),
            bombs: Vec::new(),
            ropes: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            chests: Vec::new(),
            exit_door: generated.exit_door,
            phase: Phase::Playing,
            frame: 0,
            level_time: 0.0,
            sounds: EventQueue::new(),
            rng,
        };
        session.extract_chests();
        session
    }

    /// Regenerate for the given level index, carrying the player's
    /// persistent resources and resetting everything else.
    pub fn start_level(&mut self, level: u32) {
        let generated = levelgen::generate(level, &mut self.rng);
        let mut player = Player::spawn(generated.player_start - Vec2::new(0.0, TILE));
        player.carry_stats(&self.player);

        tracing::info!(level, gold = player.gold, hp = player.hp, "entering level");

        self.level = level;
        self.map = generated.map;
        self.player = player;
        self.entities = generated.spawns.iter().map(Entity::from_spawn).collect();
        self.bombs.clear();
        self.ropes.clear();
        self.pickups.clear();
        self.particles.clear();
        self.chests.clear();
        self.exit_door = generated.exit_door;
        self.phase = Phase::Playing;
        self.frame = 0;
        self.level_time = 0.0;
        self.extract_chests();
    }

    /// Move on after a completed level
    pub fn next_level(&mut self) {
        self.start_level(self.level + 1);
    }

    /// Restart the run from scratch
    pub fn restart(&mut self) {
        self.player = Player::spawn(Vec2::ZERO);
        self.start_level(1);
    }

    /// Chest tiles become solid pedestals; the chests themselves live in
    /// their own list so they can be opened.
    fn extract_chests(&mut self) {
        for row in 0..ROWS as i32 {
            for col in 0..COLS as i32 {
                if self.map.get(col, row) == Tile::Chest {
                    self.chests.push(Chest {
                        col,
                        row,
                        open: false,
                    });
                    self.map.set(col, row, Tile::Solid);
                }
            }
        }
    }

    /// Advance the simulation exactly one frame.
    pub fn advance(&mut self, input: &ActionState) {
        if self.phase != Phase::Playing {
            return;
        }
        self.frame += 1;
        self.level_time += 1.0 / 60.0;

        self.player.update(
            input,
            &self.map,
            &mut self.ropes,
            &mut self.bombs,
            &mut self.entities,
            &mut self.particles,
            &mut self.sounds,
            &mut self.rng,
        );

        if self.player.hp <= 0 || self.player.is_dead {
            self.player.is_dead = true;
            self.phase = Phase::Dead;
            return;
        }

        entities::update_all(
            &mut self.entities,
            &mut self.player,
            &self.map,
            &mut self.pickups,
            &mut self.particles,
            &mut self.sounds,
            &mut self.rng,
        );

        hazards::update_bombs(
            &mut self.bombs,
            &mut self.map,
            &mut self.entities,
            &mut self.player,
            &mut self.pickups,
            &mut self.particles,
            &mut self.sounds,
            &mut self.rng,
        );

        hazards::update_pickups(&mut self.pickups, &mut self.player, &mut self.sounds);
        hazards::update_particles(&mut self.particles);

        // Chests pop open partway through the whip swing
        if self.player.is_whipping && self.player.whip_frame == WHIP_FRAMES * 2 / 5 {
            self.open_chests_in_reach();
        }

        // Stepping through the exit door
        if input.enter_pressed && self.player_at_door() {
            self.phase = Phase::LevelComplete;
            self.sounds.push(SoundEvent::Door);
            self.sounds.push(SoundEvent::LevelComplete);
            tracing::info!(
                level = self.level,
                gold = self.player.gold,
                time = self.level_time,
                "level complete"
            );
        }
    }

    /// Is the player inside the door's interaction rectangle?
    pub fn player_at_door(&self) -> bool {
        let p = &self.player.body;
        physics::rects_overlap(
            p.pos.x,
            p.pos.y,
            p.size.x,
            p.size.y,
            self.exit_door.x - 40.0,
            self.exit_door.y - 80.0,
            120.0,
            120.0,
        )
    }

    /// Open every closed chest inside the whip's reach and scatter gems
    /// out of it.
    fn open_chests_in_reach(&mut self) {
        for i in 0..self.chests.len() {
            let chest = self.chests[i];
            if chest.open || !self.player.whip_reaches(chest.center()) {
                continue;
            }
            self.chests[i].open = true;
            self.sounds.push(SoundEvent::ChestOpen);

            let chest_x = chest.col as f32 * TILE;
            let chest_y = chest.row as f32 * TILE;
            for _ in 0..3 {
                let gem = GemKind::random(&mut self.rng);
                self.pickups.push(Pickup {
                    pos: Vec2::new(
                        chest_x + TILE / 2.0 + (self.rng.gen::<f32>() - 0.5) * 20.0,
                        chest_y,
                    ),
                    vel: Vec2::new(
                        (self.rng.gen::<f32>() - 0.5) * 6.0,
                        -5.0 - self.rng.gen::<f32>() * 3.0,
                    ),
                    ground_y: chest_y + TILE - 10.0,
                    gem,
                });
            }
        }
    }

    /// Level label in the "major-sub" style, e.g. "2-3"
    pub fn level_label(&self) -> String {
        let major = (self.level - 1) / SUB_LEVELS + 1;
        let sub = (self.level - 1) % SUB_LEVELS + 1;
        format!("{major}-{sub}")
    }

    /// Elapsed level time as "m:ss"
    pub fn time_label(&self) -> String {
        let mins = (self.level_time / 60.0) as u32;
        let secs = (self.level_time % 60.0) as u32;
        format!("{mins}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_label() {
        let mut session = Session::new(1);
        assert_eq!(session.level_label(), "1-1");
        session.level = 5;
        assert_eq!(session.level_label(), "2-1");
        session.level = 8;
        assert_eq!(session.level_label(), "2-4");
    }

    #[test]
    fn test_chests_extracted_to_solid_pedestals() {
        // Chest tiles never survive in the grid; each becomes a chest entry
        for seed in 0..10 {
            let session = Session::new(seed);
            for (col, row, tile) in session.map.cells() {
                assert_ne!(tile, Tile::Chest, "chest tile left at ({col},{row})");
            }
            for chest in &session.chests {
                assert_eq!(session.map.get(chest.col, chest.row), Tile::Solid);
                assert!(!chest.open);
            }
        }
    }

    #[test]
    fn test_stats_carry_across_levels() {
        let mut session = Session::new(42);
        session.player.gold = 700;
        session.player.bombs = 2;
        session.player.ropes = 1;
        session.player.hp = 3;
        session.next_level();
        assert_eq!(session.level, 2);
        assert_eq!(session.player.gold, 700);
        assert_eq!(session.player.bombs, 2);
        assert_eq!(session.player.ropes, 1);
        assert_eq!(session.player.hp, 3);
        assert!(session.entities.iter().all(|e| e.alive));
        assert!(session.bombs.is_empty());
        assert!(session.particles.is_empty());
    }

    #[test]
    fn test_restart_resets_resources() {
        let mut session = Session::new(42);
        session.player.gold = 700;
        session.player.hp = 1;
        session.restart();
        assert_eq!(session.player.gold, 0);
        assert_eq!(session.player.hp, 4);
        assert_eq!(session.level, 1);
    }

    #[test]
    fn test_advance_stops_after_death() {
        let mut session = Session::new(42);
        session.player.hp = 0;
        session.advance(&ActionState::default());
        assert_eq!(session.phase, Phase::Dead);
        let frame = session.frame;
        session.advance(&ActionState::default());
        assert_eq!(session.frame, frame, "dead session must not advance");
    }
}
