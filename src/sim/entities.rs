//! Enemy entities
//!
//! Each species is a small independent state machine over a shared physics
//! body. Entities are a tagged variant (enum plus per-species payload) and
//! the per-frame update is a single match over the tag. Death emits a
//! particle burst and drops a gem; contact with the player deals one point
//! of damage per frame per entity, gated by the player's i-frames.

use macroquad::math::Vec2;
use rand::Rng;

use super::events::{EventQueue, SoundEvent};
use super::hazards::{self, GemKind, Particle, Pickup};
use super::levelgen::EntitySpawn;
use super::physics::{self, Body, JUMP_POWER};
use super::player::Player;
use super::tiles::{TileMap, COLS, ROWS, TILE};

/// Spider drop-cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiderPhase {
    Hanging,
    Dropping,
    Falling,
    Returning,
}

/// Species tag with per-species state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Species {
    Snake {
        move_dir: f32,
    },
    Bat {
        sleeping: bool,
    },
    Spider {
        /// Height the spider hangs at and returns to after a drop
        anchor_y: f32,
        phase: SpiderPhase,
        drop_timer: u32,
    },
    Caveman {
        move_dir: f32,
        move_timer: u32,
        aggroed: bool,
    },
}

/// A living (or recently dead) enemy
#[derive(Debug, Clone, Copy)]
pub struct Entity {
    pub body: Body,
    pub species: Species,
    pub hp: i32,
    pub alive: bool,
    pub stun_timer: u32,
    pub facing_right: bool,
    pub frame_count: u64,
}

/// Bat wake radius in pixels
const BAT_WAKE_RADIUS: f32 = 240.0;

impl Entity {
    /// Build an entity from a level-generation spawn record.
    /// Sizes and hit points are per species.
    pub fn from_spawn(spawn: &EntitySpawn) -> Self {
        let (w, h, hp) = match spawn.species_kind {
            SpawnKind::Snake => (36.0, 24.0, 1),
            SpawnKind::Bat => (28.0, 22.0, 1),
            SpawnKind::Spider => (28.0, 28.0, 1),
            SpawnKind::Caveman => (32.0, 40.0, 3),
        };
        let dir = if spawn.facing_right { 1.0 } else { -1.0 };
        let species = match spawn.species_kind {
            SpawnKind::Snake => Species::Snake { move_dir: dir },
            SpawnKind::Bat => Species::Bat { sleeping: true },
            SpawnKind::Spider => Species::Spider {
                anchor_y: spawn.pos.y,
                phase: SpiderPhase::Hanging,
                drop_timer: 0,
            },
            SpawnKind::Caveman => Species::Caveman {
                move_dir: dir,
                move_timer: 0,
                aggroed: false,
            },
        };
        Self {
            body: Body::new(spawn.pos.x, spawn.pos.y, w, h),
            species,
            hp,
            alive: true,
            stun_timer: 0,
            facing_right: spawn.facing_right,
            frame_count: 0,
        }
    }
}

/// Species without payload, used by spawn records and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Snake,
    Bat,
    Spider,
    Caveman,
}

/// Advance every living entity one frame, then apply contact damage.
pub fn update_all(
    entities: &mut [Entity],
    player: &mut Player,
    map: &TileMap,
    pickups: &mut Vec<Pickup>,
    particles: &mut Vec<Particle>,
    sounds: &mut EventQueue<SoundEvent>,
    rng: &mut impl Rng,
) {
    for entity in entities.iter_mut() {
        if !entity.alive {
            continue;
        }
        entity.frame_count += 1;

        // Stunned: fall and collide only
        if entity.stun_timer > 0 {
            entity.stun_timer -= 1;
            physics::apply_gravity(&mut entity.body);
            physics::resolve_collisions(&mut entity.body, map);
            if entity.hp <= 0 {
                kill(entity, map, pickups, particles, sounds, rng);
            }
            continue;
        }

        match entity.species {
            Species::Snake { .. } => update_snake(entity, map),
            Species::Bat { .. } => update_bat(entity, player, map),
            Species::Spider { .. } => update_spider(entity, player, map),
            Species::Caveman { .. } => update_caveman(entity, player, map),
        }

        if entity.hp <= 0 {
            kill(entity, map, pickups, particles, sounds, rng);
        }

        // Contact damage, once per frame per entity
        if entity.alive && touches_player(entity, player) {
            player.take_damage(1, particles, sounds, rng);
        }
    }
}

fn touches_player(entity: &Entity, player: &Player) -> bool {
    let e = &entity.body;
    let p = &player.body;
    physics::rects_overlap(
        e.pos.x + 4.0,
        e.pos.y + 4.0,
        e.size.x - 8.0,
        e.size.y - 8.0,
        p.pos.x + 4.0,
        p.pos.y + 4.0,
        p.size.x - 8.0,
        p.size.y - 8.0,
    )
}

/// Patrols at constant speed, reversing at walls and ledge edges.
fn update_snake(entity: &mut Entity, map: &TileMap) {
    let Species::Snake { ref mut move_dir } = entity.species else {
        return;
    };
    entity.body.vel.x = *move_dir * 1.8;

    physics::apply_gravity(&mut entity.body);
    physics::resolve_collisions(&mut entity.body, map);
    entity.facing_right = *move_dir > 0.0;

    // Probe one step past the leading edge: a wall at body height, or
    // missing ground just past the feet
    let lead_x = entity.body.pos.x
        + if *move_dir > 0.0 {
            entity.body.size.x + 2.0
        } else {
            -2.0
        };
    let ahead_col = (lead_x / TILE).floor() as i32;
    let body_row = ((entity.body.pos.y + entity.body.size.y - 2.0) / TILE).floor() as i32;
    let foot_row = ((entity.body.pos.y + entity.body.size.y + TILE * 0.4) / TILE).floor() as i32;

    let wall_ahead = map.is_solid(ahead_col, body_row);
    let edge_ahead = entity.body.on_ground && !map.is_solid(ahead_col, foot_row);

    if wall_ahead || edge_ahead {
        *move_dir = -*move_dir;
        entity.body.vel.x = *move_dir * 1.8;
    }
}

/// Sleeps until the player comes near, then homes in with smoothed
/// velocity, bouncing off solid tiles.
fn update_bat(entity: &mut Entity, player: &Player, map: &TileMap) {
    let Species::Bat { ref mut sleeping } = entity.species else {
        return;
    };

    if *sleeping {
        let delta = player.body.pos - entity.body.pos;
        if delta.length() < BAT_WAKE_RADIUS {
            *sleeping = false;
            // Initial swoop toward the player
            entity.body.vel.x = if delta.x > 0.0 { 3.5 } else { -3.5 };
            entity.body.vel.y = if delta.y > 0.0 { 2.0 } else { -2.0 };
        }
        return;
    }

    // Ease velocity toward a fixed speed pointed at the player's center
    let delta = player.body.center() - entity.body.center();
    let dist = delta.length();
    if dist > 10.0 {
        let speed = 2.8;
        entity.body.vel.x += (delta.x / dist * speed - entity.body.vel.x) * 0.08;
        entity.body.vel.y += (delta.y / dist * speed - entity.body.vel.y) * 0.08;
    }

    // The bat ignores gravity and integrates its own motion
    entity.body.pos += entity.body.vel;
    entity.facing_right = entity.body.vel.x > 0.0;

    // Reflect off a solid tile at the center point
    let c = entity.body.center();
    let (col, row) = TileMap::cell_of(c.x, c.y);
    if map.is_solid(col, row) {
        entity.body.vel = -entity.body.vel;
        entity.body.pos += entity.body.vel * 2.0;
    }

    // Hard clamp inside the playfield
    if entity.body.pos.x < TILE {
        entity.body.vel.x = entity.body.vel.x.abs();
    }
    if entity.body.pos.x > (COLS as f32 - 2.0) * TILE {
        entity.body.vel.x = -entity.body.vel.x.abs();
    }
    if entity.body.pos.y < TILE {
        entity.body.vel.y = entity.body.vel.y.abs();
    }
    if entity.body.pos.y > (ROWS as f32 - 2.0) * TILE {
        entity.body.vel.y = -entity.body.vel.y.abs();
    }
}

/// Hangs at its anchor, drops on the player after a short delay, then
/// climbs back up. The cycle always returns to Hanging.
fn update_spider(entity: &mut Entity, player: &Player, map: &TileMap) {
    let Species::Spider {
        anchor_y,
        ref mut phase,
        ref mut drop_timer,
    } = entity.species
    else {
        return;
    };

    match *phase {
        SpiderPhase::Hanging => {
            let dx = player.body.center().x - entity.body.center().x;
            let dy = player.body.pos.y - entity.body.pos.y;
            if dx.abs() < TILE * 1.5 && dy > 0.0 && dy < TILE * 6.0 {
                *phase = SpiderPhase::Dropping;
                *drop_timer = 30;
            }
        }
        SpiderPhase::Dropping => {
            *drop_timer = drop_timer.saturating_sub(1);
            if *drop_timer == 0 {
                *phase = SpiderPhase::Falling;
                entity.body.vel.y = 4.0;
            }
        }
        SpiderPhase::Falling => {
            entity.body.vel.y += 0.4;
            physics::resolve_collisions(&mut entity.body, map);
            if entity.body.on_ground {
                *phase = SpiderPhase::Returning;
                entity.body.vel.y = 0.0;
            }
        }
        SpiderPhase::Returning => {
            if entity.body.pos.y > anchor_y {
                entity.body.pos.y -= 2.0;
            } else {
                entity.body.pos.y = anchor_y;
                entity.body.vel.y = 0.0;
                *phase = SpiderPhase::Hanging;
            }
        }
    }
}

/// Patrols until the player comes close, then chases and jumps after them.
/// Aggro enters below 6 tiles and releases above 12, so the state cannot
/// flicker at a single boundary.
fn update_caveman(entity: &mut Entity, player: &Player, map: &TileMap) {
    let Species::Caveman {
        ref mut move_dir,
        ref mut move_timer,
        ref mut aggroed,
    } = entity.species
    else {
        return;
    };

    let delta = player.body.pos - entity.body.pos;
    let dist = delta.length();
    if dist < TILE * 6.0 {
        *aggroed = true;
    }
    if dist > TILE * 12.0 {
        *aggroed = false;
    }

    if *aggroed {
        let dir = if delta.x > 0.0 { 1.0 } else { -1.0 };
        *move_dir = dir;
        entity.body.vel.x = dir * 2.5;
        entity.facing_right = dir > 0.0;

        // Jump after a player standing well above
        if entity.body.on_ground && delta.y < -TILE * 1.5 && delta.x.abs() < TILE * 3.0 {
            entity.body.vel.y = JUMP_POWER * 0.85;
        }
    } else {
        entity.body.vel.x = *move_dir * 1.5;
        *move_timer += 1;
        if *move_timer > 120 {
            *move_timer = 0;
            *move_dir = -*move_dir;
        }
    }

    // Wall/edge reversal only while patrolling, so pursuit can leave ledges
    let lead_x = entity.body.pos.x
        + if *move_dir > 0.0 {
            entity.body.size.x + 2.0
        } else {
            -2.0
        };
    let ahead_col = (lead_x / TILE).floor() as i32;
    let mid_row = ((entity.body.pos.y + entity.body.size.y / 2.0) / TILE).floor() as i32;
    let foot_row = ((entity.body.pos.y + entity.body.size.y + TILE * 0.5) / TILE).floor() as i32;
    let wall_ahead = map.is_solid(ahead_col, mid_row);
    let edge_ahead = entity.body.on_ground && !map.is_solid(ahead_col, foot_row);
    if (wall_ahead || edge_ahead) && !*aggroed {
        *move_dir = -*move_dir;
    }

    physics::apply_gravity(&mut entity.body);
    physics::resolve_collisions(&mut entity.body, map);
    entity.facing_right = entity.body.vel.x >= 0.0;
}

/// Mark an entity dead, emit its death burst and drop a gem at its
/// location. Idempotent: a dead entity stays dead.
pub fn kill(
    entity: &mut Entity,
    map: &TileMap,
    pickups: &mut Vec<Pickup>,
    particles: &mut Vec<Particle>,
    sounds: &mut EventQueue<SoundEvent>,
    rng: &mut impl Rng,
) {
    if !entity.alive {
        return;
    }
    entity.alive = false;
    sounds.push(SoundEvent::EnemyHit);
    hazards::death_burst(particles, entity.body.center(), rng);

    let drop_x = entity.body.center().x;
    let drop_y = entity.body.pos.y;
    pickups.push(Pickup {
        pos: Vec2::new(drop_x, drop_y),
        vel: Vec2::ZERO,
        ground_y: hazards::ground_clamp_below(map, drop_x, drop_y),
        gem: GemKind::random(rng),
    });
}
