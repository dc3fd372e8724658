//! Player controller
//!
//! One state branch executes movement per frame, in strict priority order:
//! dead, stunned, on a rope, on a ladder, then normal grounded/airborne
//! movement. Rope beats ladder beats everything else. Jumping runs through
//! a double buffer (a jump-press buffer plus a coyote grace window) so a
//! press a frame early or a frame late still lands the jump.

use macroquad::math::Vec2;
use rand::Rng;

use super::entities::Entity;
use super::events::{EventQueue, SoundEvent};
use super::hazards::{self, Bomb, Particle, Rope};
use super::physics::{self, Body, CLIMB_SPEED, JUMP_POWER, SPRINT_SPEED, WALK_SPEED};
use super::tiles::{TileMap, TILE};
use crate::input::ActionState;

/// Player hitbox width
pub const PLAYER_W: f32 = 32.0;
/// Player hitbox height
pub const PLAYER_H: f32 = 38.0;
/// Frames a whip swing stays active
pub const WHIP_FRAMES: u32 = 12;
/// Whip reach in pixels from the facing edge
pub const WHIP_REACH: f32 = 58.0;
/// Frames of invincibility after taking damage (1.5s at 60fps)
pub const INVINCIBLE_FRAMES: u32 = 90;
/// Grace window after leaving the ground during which a jump still fires
pub const COYOTE_FRAMES: u32 = 8;
/// Window after a jump press during which landing still triggers the jump
pub const JUMP_BUFFER_FRAMES: u32 = 10;

/// The player: a physics body plus resources, timers and animation flags.
/// hp/bombs/ropes/gold persist across levels; everything else resets.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub facing_right: bool,

    // Derived animation flags
    pub is_walking: bool,
    pub is_jumping: bool,
    pub is_crouching: bool,
    pub is_sprinting: bool,

    // Resources
    pub hp: i32,
    pub max_hp: i32,
    pub bombs: u32,
    pub ropes: u32,
    pub gold: u32,

    // Whip
    pub is_whipping: bool,
    pub whip_frame: u32,

    // Life state
    pub is_dead: bool,
    pub is_invincible: bool,
    pub invincible_timer: u32,
    pub stun_timer: u32,

    // Jump timing
    pub jump_buffer_timer: u32,
    pub coyote_timer: u32,

    pub frame_count: u64,
    was_on_ground: bool,
}

impl Player {
    /// A fresh player at a position with full default resources
    pub fn spawn(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos.x, pos.y, PLAYER_W, PLAYER_H),
            facing_right: true,
            is_walking: false,
            is_jumping: false,
            is_crouching: false,
            is_sprinting: false,
            hp: 4,
            max_hp: 4,
            bombs: 4,
            ropes: 4,
            gold: 0,
            is_whipping: false,
            whip_frame: 0,
            is_dead: false,
            is_invincible: false,
            invincible_timer: 0,
            stun_timer: 0,
            jump_buffer_timer: 0,
            coyote_timer: 0,
            frame_count: 0,
            was_on_ground: false,
        }
    }

    /// Carry persistent resources from the previous level's player
    pub fn carry_stats(&mut self, prev: &Player) {
        self.hp = prev.hp;
        self.max_hp = prev.max_hp;
        self.bombs = prev.bombs;
        self.ropes = prev.ropes;
        self.gold = prev.gold;
    }

    /// Advance the player one frame.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        input: &ActionState,
        map: &TileMap,
        ropes: &mut Vec<Rope>,
        bombs: &mut Vec<Bomb>,
        entities: &mut [Entity],
        particles: &mut Vec<Particle>,
        sounds: &mut EventQueue<SoundEvent>,
        rng: &mut impl Rng,
    ) {
        if self.is_dead {
            return;
        }
        self.frame_count += 1;

        if self.is_invincible {
            self.invincible_timer = self.invincible_timer.saturating_sub(1);
            if self.invincible_timer == 0 {
                self.is_invincible = false;
            }
        }

        // Stunned: ride out physics, ignore all input
        if self.stun_timer > 0 {
            self.stun_timer -= 1;
            physics::apply_gravity(&mut self.body);
            physics::resolve_collisions(&mut self.body, map);
            return;
        }

        // Coyote grace: refreshed on the ground, counts down in the air
        if self.body.on_ground {
            self.coyote_timer = COYOTE_FRAMES;
        } else {
            self.coyote_timer = self.coyote_timer.saturating_sub(1);
        }

        // Jump buffer: armed on a fresh press, counts down
        if input.jump_pressed {
            self.jump_buffer_timer = JUMP_BUFFER_FRAMES;
        } else {
            self.jump_buffer_timer = self.jump_buffer_timer.saturating_sub(1);
        }

        // ---- Rope climbing (highest movement priority) ----
        let near_rope = physics::touching_rope(&self.body, ropes);
        if near_rope.is_some() && (input.up || input.down) && !self.body.on_ground {
            self.body.on_rope = near_rope;
        }
        if near_rope.is_none() {
            self.body.on_rope = None;
        }

        if let Some(rope_idx) = self.body.on_rope {
            let rope = ropes[rope_idx];
            self.body.vel = Vec2::ZERO;
            self.body.pos.x = rope.x + TILE / 2.0 - self.body.size.x / 2.0;
            if input.up {
                self.body.pos.y -= CLIMB_SPEED;
            }
            if input.down {
                self.body.pos.y += CLIMB_SPEED;
            }
            if input.jump_pressed {
                self.body.on_rope = None;
                self.body.vel.y = JUMP_POWER;
                let dir = if input.right {
                    1.0
                } else if input.left {
                    -1.0
                } else if self.facing_right {
                    1.0
                } else {
                    -1.0
                };
                self.body.vel.x = dir * 3.0;
            }
            self.is_walking = input.up || input.down;
            return;
        }

        // ---- Ladder climbing ----
        let in_ladder = physics::on_ladder_tile(&self.body, map);
        if in_ladder && (input.up || input.down) {
            self.body.on_ladder = true;
        }
        if !in_ladder {
            self.body.on_ladder = false;
        }

        if self.body.on_ladder {
            self.body.vel = Vec2::ZERO;
            // Ease toward the ladder's column center
            let ladder_x = ((self.body.center().x) / TILE).floor() * TILE;
            self.body.pos.x +=
                (ladder_x - self.body.pos.x - self.body.size.x / 2.0 + TILE / 2.0) * 0.3;
            if input.up {
                self.body.pos.y -= CLIMB_SPEED;
            }
            if input.down {
                self.body.pos.y += CLIMB_SPEED;
            }
            if input.jump_pressed {
                self.body.on_ladder = false;
                self.body.vel.y = JUMP_POWER * 0.85;
                let dir = if input.right {
                    1.0
                } else if input.left {
                    -1.0
                } else {
                    0.0
                };
                self.body.vel.x = dir * 2.0;
            }
            self.is_walking = input.up || input.down;
            return;
        }

        // ---- Normal grounded/airborne movement ----
        self.is_crouching = input.down && self.body.on_ground;
        self.is_sprinting = input.sprint;
        let speed = if self.is_sprinting { SPRINT_SPEED } else { WALK_SPEED };

        if !self.is_crouching {
            if input.left {
                self.body.vel.x = -speed;
                self.facing_right = false;
                self.is_walking = true;
            } else if input.right {
                self.body.vel.x = speed;
                self.facing_right = true;
                self.is_walking = true;
            } else {
                self.body.vel.x *= 0.6;
                if self.body.vel.x.abs() < 0.2 {
                    self.body.vel.x = 0.0;
                }
                self.is_walking = false;
            }
        } else {
            self.body.vel.x *= 0.5;
            self.is_walking = false;
        }

        // Jump fires when a buffered press coincides with coyote grace
        if self.jump_buffer_timer > 0 && self.coyote_timer > 0 {
            self.body.vel.y = JUMP_POWER;
            self.is_jumping = true;
            self.jump_buffer_timer = 0;
            self.coyote_timer = 0;
            sounds.push(SoundEvent::Jump);
        }
        self.is_jumping = self.body.vel.y < 0.0;

        // Variable jump height: releasing jump while ascending cuts the rise
        if !input.jump && self.body.vel.y < -6.0 {
            self.body.vel.y = (self.body.vel.y + 1.5).max(-6.0);
        }

        // ---- Whip attack ----
        if input.whip_pressed && !self.is_whipping {
            self.is_whipping = true;
            self.whip_frame = 0;
            sounds.push(SoundEvent::Whip);
            self.whip_hit(entities, particles, sounds, rng);
        }
        if self.is_whipping {
            self.whip_frame += 1;
            if self.whip_frame >= WHIP_FRAMES {
                self.is_whipping = false;
                self.whip_frame = 0;
            }
        }

        // ---- Bomb: throw, or place when crouching ----
        if input.throw_bomb_pressed && self.bombs > 0 {
            self.bombs -= 1;
            if !self.is_crouching {
                let origin = Vec2::new(
                    self.body.pos.x + if self.facing_right { self.body.size.x } else { 0.0 },
                    self.body.pos.y + self.body.size.y / 2.0 - 10.0,
                );
                let vel = Vec2::new(if self.facing_right { 7.0 } else { -7.0 }, -7.0);
                bombs.push(Bomb::thrown(origin, vel));
                sounds.push(SoundEvent::RopeThrow);
            } else {
                bombs.push(Bomb::placed(Vec2::new(
                    self.body.pos.x + 8.0,
                    self.body.pos.y + self.body.size.y - 18.0,
                )));
            }
        }

        // ---- Rope throw ----
        if input.rope_pressed && self.ropes > 0 {
            self.ropes -= 1;
            match self.throw_rope(map) {
                Some(rope) => {
                    ropes.push(rope);
                    sounds.push(SoundEvent::RopeThrow);
                }
                None => self.ropes += 1, // no ceiling found: refund
            }
        }

        // ---- Gravity and collision ----
        physics::apply_gravity(&mut self.body);
        physics::resolve_collisions(&mut self.body, map);

        // Footsteps and landing
        if self.is_walking && self.body.on_ground && self.frame_count % 6 == 0 {
            sounds.push(SoundEvent::Step);
        }
        if self.body.on_ground && self.body.vel.y == 0.0 && !self.was_on_ground {
            sounds.push(SoundEvent::Land);
        }
        self.was_on_ground = self.body.on_ground;

        // Fell out of the world
        if self.body.pos.y > TileMap::height_px() + 200.0 {
            self.hp = 0;
        }
    }

    /// Single hit-test against the whip's reach rectangle, damaging every
    /// living entity whose center falls inside.
    fn whip_hit(
        &mut self,
        entities: &mut [Entity],
        particles: &mut Vec<Particle>,
        sounds: &mut EventQueue<SoundEvent>,
        rng: &mut impl Rng,
    ) {
        let whip_x = self.body.pos.x
            + if self.facing_right {
                self.body.size.x + WHIP_REACH
            } else {
                -WHIP_REACH
            };
        let whip_y = self.body.pos.y + self.body.size.y / 2.0;

        for entity in entities.iter_mut() {
            if !entity.alive {
                continue;
            }
            let c = entity.body.center();
            if (c.x - whip_x).abs() < WHIP_REACH + 20.0 && (c.y - whip_y).abs() < TILE * 0.8 {
                entity.hp -= 1;
                entity.stun_timer = 30;
                entity.body.vel.x = if self.facing_right { 6.0 } else { -6.0 };
                entity.body.vel.y = -5.0;
                sounds.push(SoundEvent::EnemyHit);
                hazards::hit_burst(particles, c, rng);
            }
        }
    }

    /// Is a world point inside the whip's current reach? Used by the
    /// session for chest opening mid-swing.
    pub fn whip_reaches(&self, point: Vec2) -> bool {
        let dx = point.x - self.body.center().x;
        let dy = point.y - self.body.center().y;
        dx.abs() < WHIP_REACH + TILE / 2.0
            && dy.abs() < TILE
            && ((self.facing_right && dx > 0.0) || (!self.facing_right && dx < 0.0))
    }

    /// Scan upward from the player's cell for the nearest ceiling and
    /// return the rope that would hang from it. None when no ceiling
    /// exists inside the grid.
    fn throw_rope(&self, map: &TileMap) -> Option<Rope> {
        let col = (self.body.center().x / TILE).floor() as i32;
        let row = (self.body.pos.y / TILE).floor() as i32;
        let mut top_row = row;
        while top_row > 0 && !map.is_solid(col, top_row - 1) {
            top_row -= 1;
        }
        // Reaching row zero means no solid cell exists above inside the grid
        if top_row == 0 {
            return None;
        }
        let length = (row - top_row + 1).max(0) as u32;
        if length == 0 {
            return None;
        }
        Some(Rope {
            x: col as f32 * TILE,
            y: top_row as f32 * TILE,
            length,
            deployed: true,
        })
    }

    /// Apply damage: ignored while invincible or dead, otherwise subtracts
    /// hp, opens the invincibility window, knocks the player upward and
    /// emits a burst. hp reaching zero kills.
    pub fn take_damage(
        &mut self,
        amount: i32,
        particles: &mut Vec<Particle>,
        sounds: &mut EventQueue<SoundEvent>,
        rng: &mut impl Rng,
    ) {
        if self.is_invincible || self.is_dead {
            return;
        }
        self.hp -= amount;
        self.is_invincible = true;
        self.invincible_timer = INVINCIBLE_FRAMES;
        sounds.push(SoundEvent::PlayerHit);
        self.body.vel.y = -6.0;
        hazards::damage_burst(particles, self.body.center(), rng);
        if self.hp <= 0 {
            self.is_dead = true;
            sounds.push(SoundEvent::Death);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tiles::{Tile, COLS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flat_map() -> TileMap {
        let mut map = TileMap::filled(Tile::Empty);
        map.seal_border();
        for col in 1..COLS as i32 - 1 {
            map.set(col, 20, Tile::Solid);
        }
        map
    }

    fn grounded_player(map: &TileMap) -> Player {
        let mut player = Player::spawn(Vec2::new(8.0 * TILE, 20.0 * TILE - PLAYER_H));
        let mut rng = StdRng::seed_from_u64(1);
        // Settle onto the floor so on_ground is set
        for _ in 0..5 {
            step(&mut player, map, &ActionState::default(), &mut rng);
        }
        assert!(player.body.on_ground);
        player
    }

    fn step(player: &mut Player, map: &TileMap, input: &ActionState, rng: &mut StdRng) {
        let mut ropes = Vec::new();
        let mut bombs = Vec::new();
        let mut entities = Vec::new();
        let mut particles = Vec::new();
        let mut sounds = EventQueue::new();
        player.update(
            input,
            map,
            &mut ropes,
            &mut bombs,
            &mut entities,
            &mut particles,
            &mut sounds,
            rng,
        );
    }

    #[test]
    fn test_jump_on_landing_frame() {
        let map = flat_map();
        let mut player = grounded_player(&map);
        let mut rng = StdRng::seed_from_u64(1);
        let jump = ActionState {
            jump: true,
            jump_pressed: true,
            ..Default::default()
        };
        step(&mut player, &map, &jump, &mut rng);
        assert!(player.body.vel.y < 0.0, "grounded jump press must jump");
    }

    #[test]
    fn test_coyote_jump_after_leaving_ground() {
        let map = flat_map();
        let mut player = grounded_player(&map);
        let mut rng = StdRng::seed_from_u64(1);

        // Fake walking off a ledge: airborne but coyote window still open
        player.body.on_ground = false;
        player.coyote_timer = COYOTE_FRAMES;
        step(&mut player, &map, &ActionState::default(), &mut rng);

        let jump = ActionState {
            jump: true,
            jump_pressed: true,
            ..Default::default()
        };
        step(&mut player, &map, &jump, &mut rng);
        assert_eq!(player.coyote_timer, 0, "jump consumes the coyote window");
        assert!(player.body.vel.y < -6.0);
    }

    #[test]
    fn test_no_jump_after_coyote_expires() {
        let map = flat_map();
        let mut player = Player::spawn(Vec2::new(8.0 * TILE, 5.0 * TILE));
        let mut rng = StdRng::seed_from_u64(1);

        // Fifteen airborne frames: well past the coyote window
        for _ in 0..15 {
            step(&mut player, &map, &ActionState::default(), &mut rng);
        }
        let vy_before = player.body.vel.y;
        let jump = ActionState {
            jump: true,
            jump_pressed: true,
            ..Default::default()
        };
        step(&mut player, &map, &jump, &mut rng);
        assert!(
            player.body.vel.y >= vy_before,
            "mid-air jump press must not fire"
        );
    }

    #[test]
    fn test_damage_invincibility_window() {
        let map = flat_map();
        let mut player = grounded_player(&map);
        let mut rng = StdRng::seed_from_u64(1);
        let mut particles = Vec::new();
        let mut sounds = EventQueue::new();

        player.take_damage(1, &mut particles, &mut sounds, &mut rng);
        assert_eq!(player.hp, 3);
        assert!(player.is_invincible);

        // A second hit inside the window changes nothing
        player.take_damage(1, &mut particles, &mut sounds, &mut rng);
        assert_eq!(player.hp, 3);

        // Ride out the invincibility window
        let mut frames = 0;
        while player.is_invincible && frames < 200 {
            step(&mut player, &map, &ActionState::default(), &mut rng);
            frames += 1;
        }
        player.take_damage(1, &mut particles, &mut sounds, &mut rng);
        assert_eq!(player.hp, 2);
    }

    #[test]
    fn test_rope_throw_refund_without_ceiling() {
        // No ceiling: a map with an open top edge
        let mut map = TileMap::filled(Tile::Empty);
        for col in 1..COLS as i32 - 1 {
            map.set(col, 20, Tile::Solid);
        }
        let mut player = Player::spawn(Vec2::new(8.0 * TILE, 20.0 * TILE - PLAYER_H));
        let ropes_before = player.ropes;
        let mut rng = StdRng::seed_from_u64(1);

        let mut ropes = Vec::new();
        let mut bombs = Vec::new();
        let mut entities = Vec::new();
        let mut particles = Vec::new();
        let mut sounds = EventQueue::new();
        let input = ActionState {
            rope: true,
            rope_pressed: true,
            ..Default::default()
        };
        player.update(
            &input,
            &map,
            &mut ropes,
            &mut bombs,
            &mut entities,
            &mut particles,
            &mut sounds,
            &mut rng,
        );
        assert!(ropes.is_empty());
        assert_eq!(player.ropes, ropes_before, "failed throw refunds the rope");
    }

    #[test]
    fn test_rope_throw_anchors_at_ceiling() {
        let mut map = flat_map();
        // Ceiling three cells above the floor row
        for col in 1..COLS as i32 - 1 {
            map.set(col, 15, Tile::Solid);
        }
        let player = Player::spawn(Vec2::new(8.0 * TILE, 20.0 * TILE - PLAYER_H));
        let rope = player.throw_rope(&map).expect("ceiling above");
        assert_eq!(rope.y, 16.0 * TILE);
        assert!(rope.deployed);
        assert_eq!(rope.length, ((20.0 * TILE - PLAYER_H) / TILE) as u32 - 16 + 1);
    }

    #[test]
    fn test_variable_jump_height_cut() {
        let map = flat_map();
        let mut player = grounded_player(&map);
        let mut rng = StdRng::seed_from_u64(1);
        let jump = ActionState {
            jump: true,
            jump_pressed: true,
            ..Default::default()
        };
        step(&mut player, &map, &jump, &mut rng);
        let rising = player.body.vel.y;
        assert!(rising < -6.0);

        // Release jump: the ascent eases toward -6
        step(&mut player, &map, &ActionState::default(), &mut rng);
        assert!(player.body.vel.y > rising);
    }

    #[test]
    fn test_whip_reach_respects_facing() {
        let map = flat_map();
        let mut player = grounded_player(&map);
        player.facing_right = true;
        let ahead = player.body.center() + Vec2::new(50.0, 0.0);
        let behind = player.body.center() - Vec2::new(50.0, 0.0);
        assert!(player.whip_reaches(ahead));
        assert!(!player.whip_reaches(behind));

        player.facing_right = false;
        assert!(player.whip_reaches(behind));
        assert!(!player.whip_reaches(ahead));
    }

    #[test]
    fn test_crouch_blocks_lateral_intent() {
        let map = flat_map();
        let mut player = grounded_player(&map);
        let mut rng = StdRng::seed_from_u64(1);
        let input = ActionState {
            down: true,
            right: true,
            ..Default::default()
        };
        step(&mut player, &map, &input, &mut rng);
        assert!(player.is_crouching);
        assert_eq!(player.body.vel.x, 0.0);
    }
}
