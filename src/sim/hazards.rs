//! Hazards and secondary objects
//!
//! Bombs, ropes, gem pickups and cosmetic particles. These are spawned by
//! the player controller and enemy deaths and resolved once per frame by
//! the session in a fixed order. Removal always runs as a reverse-index or
//! compaction pass so nothing is skipped mid-iteration.

use macroquad::color::Color;
use macroquad::math::Vec2;
use rand::Rng;

use super::entities::{self, Entity};
use super::events::{EventQueue, SoundEvent};
use super::physics::{self, Body};
use super::player::Player;
use super::tiles::{Tile, TileMap, COLS, ROWS, TILE};

/// Bomb fuse length in frames (3 seconds at 60fps)
pub const BOMB_FUSE: i32 = 180;
/// Frames the explosion animation persists before removal
pub const EXPLOSION_FRAMES: u32 = 24;
/// Entities and the player inside this pixel radius are caught by a blast
pub const BLAST_RADIUS: f32 = 70.0;
/// Tile destruction footprint, in cell units (Euclidean)
pub const BLAST_RADIUS_CELLS: f32 = 2.2;

/// An armed bomb, flying or resting, then exploding
#[derive(Debug, Clone, Copy)]
pub struct Bomb {
    pub body: Body,
    pub fuse: i32,
    /// Resting on the ground, no longer in free flight
    pub deployed: bool,
    pub exploded: bool,
    pub explosion_frame: u32,
}

impl Bomb {
    /// A bomb thrown with the given velocity
    pub fn thrown(pos: Vec2, vel: Vec2) -> Self {
        let mut body = Body::new(pos.x, pos.y, 14.0, 14.0);
        body.vel = vel;
        Self {
            body,
            fuse: BOMB_FUSE,
            deployed: false,
            exploded: false,
            explosion_frame: 0,
        }
    }

    /// A bomb placed at rest
    pub fn placed(pos: Vec2) -> Self {
        let mut bomb = Self::thrown(pos, Vec2::ZERO);
        bomb.deployed = true;
        bomb.body.on_ground = true;
        bomb
    }
}

/// A climbing rope hanging from a ceiling anchor. Never removed within a
/// level.
#[derive(Debug, Clone, Copy)]
pub struct Rope {
    /// Anchor column, in pixels
    pub x: f32,
    /// Anchor row (ceiling), in pixels
    pub y: f32,
    /// Hanging length in cells
    pub length: u32,
    pub deployed: bool,
}

/// Gem kinds dropped from chests and enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GemKind {
    Sapphire,
    Emerald,
    Ruby,
    Nugget,
}

impl GemKind {
    pub const ALL: [GemKind; 4] = [
        GemKind::Sapphire,
        GemKind::Emerald,
        GemKind::Ruby,
        GemKind::Nugget,
    ];

    /// Gold credited on pickup
    pub fn value(self) -> u32 {
        match self {
            GemKind::Sapphire => 100,
            GemKind::Emerald => 200,
            GemKind::Ruby => 300,
            GemKind::Nugget => 50,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// A collectible gem in free flight, clamped to a resting height
#[derive(Debug, Clone, Copy)]
pub struct Pickup {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Hard clamp: the pickup never falls below this height
    pub ground_y: f32,
    pub gem: GemKind,
}

/// A cosmetic particle. No gameplay coupling.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
    /// Frames until removal
    pub life: i32,
}

// Particle palette
const HIT_RED: Color = Color::new(1.0, 0.27, 0.13, 1.0);
const HURT_RED: Color = Color::new(1.0, 0.13, 0.13, 1.0);
const DEBRIS_BROWN: Color = Color::new(0.55, 0.31, 0.13, 1.0);
const DEATH_COLORS: [Color; 4] = [
    Color::new(1.0, 0.27, 0.13, 1.0),
    Color::new(1.0, 0.53, 0.13, 1.0),
    Color::new(1.0, 0.8, 0.27, 1.0),
    Color::new(1.0, 1.0, 1.0, 1.0),
];
const EXPLOSION_COLORS: [Color; 4] = [
    Color::new(1.0, 0.53, 0.0, 1.0),
    Color::new(1.0, 0.8, 0.0, 1.0),
    Color::new(1.0, 0.27, 0.0, 1.0),
    Color::new(1.0, 0.93, 0.53, 1.0),
];

/// Sparks when the whip connects
pub fn hit_burst(particles: &mut Vec<Particle>, center: Vec2, rng: &mut impl Rng) {
    for _ in 0..8 {
        particles.push(Particle {
            pos: center,
            vel: Vec2::new(
                (rng.gen::<f32>() - 0.5) * 6.0,
                -rng.gen::<f32>() * 5.0,
            ),
            color: HIT_RED,
            size: 4.0 + rng.gen::<f32>() * 4.0,
            life: 18,
        });
    }
}

/// Burst when the player takes damage
pub fn damage_burst(particles: &mut Vec<Particle>, center: Vec2, rng: &mut impl Rng) {
    for _ in 0..12 {
        particles.push(Particle {
            pos: center,
            vel: Vec2::new(
                (rng.gen::<f32>() - 0.5) * 8.0,
                -rng.gen::<f32>() * 7.0,
            ),
            color: HURT_RED,
            size: 5.0 + rng.gen::<f32>() * 4.0,
            life: 25,
        });
    }
}

/// Burst emitted by a dying enemy
pub fn death_burst(particles: &mut Vec<Particle>, center: Vec2, rng: &mut impl Rng) {
    for _ in 0..16 {
        particles.push(Particle {
            pos: center,
            vel: Vec2::new(
                (rng.gen::<f32>() - 0.5) * 10.0,
                -rng.gen::<f32>() * 8.0 - 2.0,
            ),
            color: DEATH_COLORS[rng.gen_range(0..DEATH_COLORS.len())],
            size: 5.0 + rng.gen::<f32>() * 5.0,
            life: 30,
        });
    }
}

/// Debris for one tile cleared by a blast
fn debris_burst(particles: &mut Vec<Particle>, center: Vec2, rng: &mut impl Rng) {
    for _ in 0..3 {
        particles.push(Particle {
            pos: center,
            vel: Vec2::new(
                (rng.gen::<f32>() - 0.5) * 12.0,
                -rng.gen::<f32>() * 10.0,
            ),
            color: DEBRIS_BROWN,
            size: 6.0 + rng.gen::<f32>() * 6.0,
            life: 35,
        });
    }
}

/// The big omnidirectional explosion burst
fn explosion_burst(particles: &mut Vec<Particle>, center: Vec2, rng: &mut impl Rng) {
    for _ in 0..40 {
        let angle = rng.gen::<f32>() * std::f32::consts::TAU;
        let speed = 3.0 + rng.gen::<f32>() * 8.0;
        particles.push(Particle {
            pos: center,
            vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - 3.0),
            color: EXPLOSION_COLORS[rng.gen_range(0..EXPLOSION_COLORS.len())],
            size: 8.0 + rng.gen::<f32>() * 8.0,
            life: 40,
        });
    }
}

/// Resting height for a drop spawned at a pixel position: just above the
/// first solid row below it.
pub fn ground_clamp_below(map: &TileMap, x: f32, y: f32) -> f32 {
    let (col, mut row) = TileMap::cell_of(x, y);
    while row < ROWS as i32 && !map.is_solid(col, row) {
        row += 1;
    }
    row as f32 * TILE - 10.0
}

/// Advance every bomb one frame: flight, fuse, detonation, explosion
/// animation, and removal of fully finished explosions.
pub fn update_bombs(
    bombs: &mut Vec<Bomb>,
    map: &mut TileMap,
    entities: &mut [Entity],
    player: &mut Player,
    pickups: &mut Vec<Pickup>,
    particles: &mut Vec<Particle>,
    sounds: &mut EventQueue<SoundEvent>,
    rng: &mut impl Rng,
) {
    for i in 0..bombs.len() {
        if bombs[i].exploded {
            bombs[i].explosion_frame += 1;
            continue;
        }

        if !bombs[i].deployed {
            let mut body = bombs[i].body;
            physics::apply_gravity(&mut body);
            physics::resolve_collisions(&mut body, map);
            bombs[i].body = body;
            bombs[i].deployed = body.on_ground;
        }

        // The fuse burns whether flying or resting
        bombs[i].fuse -= 1;
        if bombs[i].fuse <= 0 {
            bombs[i].exploded = true;
            bombs[i].explosion_frame = 0;
            let center = bombs[i].body.center();
            detonate(center, map, entities, player, pickups, particles, sounds, rng);
        }
    }

    // Sweep fully animated explosions, back to front
    let mut i = bombs.len();
    while i > 0 {
        i -= 1;
        if bombs[i].exploded && bombs[i].explosion_frame >= EXPLOSION_FRAMES {
            bombs.remove(i);
        }
    }
}

/// One detonation: destructive tile stamp, kill radius, player damage,
/// omnidirectional burst.
#[allow(clippy::too_many_arguments)]
fn detonate(
    center: Vec2,
    map: &mut TileMap,
    entities: &mut [Entity],
    player: &mut Player,
    pickups: &mut Vec<Pickup>,
    particles: &mut Vec<Particle>,
    sounds: &mut EventQueue<SoundEvent>,
    rng: &mut impl Rng,
) {
    sounds.push(SoundEvent::Explosion);

    // Roughly circular destructive footprint, per-cell Euclidean distance
    let (center_col, center_row) = TileMap::cell_of(center.x, center.y);
    for dr in -3i32..=3 {
        for dc in -3i32..=3 {
            let col = center_col + dc;
            let row = center_row + dr;
            let dist = ((dc * dc + dr * dr) as f32).sqrt();
            if dist >= BLAST_RADIUS_CELLS
                || col < 0
                || col >= COLS as i32
                || row < 0
                || row >= ROWS as i32
            {
                continue;
            }
            if matches!(map.get(col, row), Tile::Solid | Tile::Dirt | Tile::GoldVein) {
                map.set(col, row, Tile::Empty);
                let cell_center =
                    Vec2::new(col as f32 * TILE + TILE / 2.0, row as f32 * TILE + TILE / 2.0);
                debris_burst(particles, cell_center, rng);
            }
        }
    }

    // Instant kill with knockback for every living entity in range
    for entity in entities.iter_mut() {
        if !entity.alive {
            continue;
        }
        let c = entity.body.center();
        if c.distance(center) < BLAST_RADIUS {
            entity.hp = 0;
            entity.body.vel.x = (c.x - center.x) * 0.2;
            entity.body.vel.y = -8.0;
            entities::kill(entity, map, pickups, particles, sounds, rng);
        }
    }

    // Player damage plus knockback; the shove lands even through i-frames
    let pc = player.body.center();
    if pc.distance(center) < BLAST_RADIUS {
        player.take_damage(2, particles, sounds, rng);
        player.body.vel.x = (player.body.pos.x - center.x) * 0.15;
        player.body.vel.y = -10.0;
    }

    explosion_burst(particles, center, rng);
}

/// Advance pickups: ballistic motion, ground clamp, collection on player
/// contact. Gold is credited to the player.
pub fn update_pickups(
    pickups: &mut Vec<Pickup>,
    player: &mut Player,
    sounds: &mut EventQueue<SoundEvent>,
) {
    let mut i = pickups.len();
    while i > 0 {
        i -= 1;
        let p = &mut pickups[i];
        p.vel.y += 0.5;
        p.pos += p.vel;
        p.vel.x *= 0.9;
        if p.pos.y > p.ground_y {
            p.pos.y = p.ground_y;
            p.vel.y = 0.0;
            p.vel.x *= 0.7;
        }

        if physics::rects_overlap(
            p.pos.x - 10.0,
            p.pos.y - 10.0,
            20.0,
            20.0,
            player.body.pos.x,
            player.body.pos.y,
            player.body.size.x,
            player.body.size.y,
        ) {
            player.gold += pickups[i].gem.value();
            sounds.push(SoundEvent::GemPickup);
            pickups.swap_remove(i);
        }
    }
}

/// Advance particles: damped ballistic motion with size decay, removal at
/// end of life.
pub fn update_particles(particles: &mut Vec<Particle>) {
    let mut i = particles.len();
    while i > 0 {
        i -= 1;
        let p = &mut particles[i];
        p.vel.x *= 0.95;
        p.vel.y += 0.4;
        p.pos += p.vel;
        p.life -= 1;
        p.size = (p.size * 0.94).max(0.0);
        if p.life <= 0 {
            particles.swap_remove(i);
        }
    }
}
