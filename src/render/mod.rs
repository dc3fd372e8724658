//! Presentation
//!
//! Pure consumer of the simulation: given the session and a camera offset
//! it draws the visible tile range, objects, entities, the player and the
//! overlays. Nothing in here mutates simulation state.

pub mod hud;
pub mod sprites;

use macroquad::prelude::{clear_background, draw_circle, draw_rectangle, draw_text, screen_height, screen_width, Color, Vec2, WHITE};

use crate::sim::entities::{Species, SpiderPhase};
use crate::sim::hazards::EXPLOSION_FRAMES;
use crate::sim::player::WHIP_FRAMES;
use crate::sim::{Session, Tile, COLS, ROWS, TILE};

const CAVE_BG: Color = Color::new(0.05, 0.035, 0.02, 1.0);

/// Draw one frame of the playfield. `cam` is the world position of the
/// screen's top-left corner.
pub fn draw_session(session: &Session, cam: Vec2) {
    clear_background(CAVE_BG);

    let ox = -cam.x.floor();
    let oy = -cam.y.floor();
    let frame = session.frame;

    // Visible tile range, one cell of slack on each side
    let start_c = ((cam.x / TILE).floor() as i32 - 1).max(0);
    let end_c = (((cam.x + screen_width()) / TILE).ceil() as i32 + 1).min(COLS as i32);
    let start_r = ((cam.y / TILE).floor() as i32 - 1).max(0);
    let end_r = (((cam.y + screen_height()) / TILE).ceil() as i32 + 1).min(ROWS as i32);

    for r in start_r..end_r {
        for c in start_c..end_c {
            let tx = c as f32 * TILE + ox;
            let ty = r as f32 * TILE + oy;
            let variant = ((c * 3 + r * 7) % 4) as usize;
            match session.map.get(c, r) {
                Tile::Solid => sprites::cave_tile(tx, ty, variant),
                Tile::Dirt => sprites::dirt_tile(tx, ty),
                Tile::Ladder => sprites::ladder(tx, ty),
                Tile::Spike => sprites::spikes(tx, ty),
                Tile::GoldVein => {
                    sprites::cave_tile(tx, ty, variant);
                    sprites::gold_vein(tx, ty);
                }
                Tile::Torch => sprites::torch(tx, ty, frame),
                _ => {}
            }
        }
    }

    // Cobweb dressing in corners next to rock, placed by a position hash
    for r in start_r..end_r {
        for c in start_c..end_c {
            if session.map.get(c, r) != Tile::Empty {
                continue;
            }
            let adjacent_rock = session.map.get(c, r - 1) == Tile::Solid
                || session.map.get(c - 1, r) == Tile::Solid;
            if adjacent_rock && (c * 13 + r * 17) % 20 < 2 {
                let corner = ((c * 13 + r * 7) % 4) as usize;
                sprites::cobweb(c as f32 * TILE + ox, r as f32 * TILE + oy, corner);
            }
        }
    }

    // Occasional loose nugget resting on the ground (cosmetic)
    for r in start_r..end_r {
        for c in start_c..end_c {
            if (c * 11 + r * 13) % 100 < 2
                && session.map.get(c, r) == Tile::Empty
                && session.map.is_solid(c, r + 1)
            {
                draw_circle(
                    c as f32 * TILE + ox + TILE / 2.0,
                    r as f32 * TILE + oy + TILE - 6.0,
                    4.0,
                    sprites::GOLD,
                );
            }
        }
    }

    // Exit door, with a hint when the player stands in front of it
    sprites::door(session.exit_door.x + ox, session.exit_door.y + oy);
    if !session.player.is_dead && session.player_at_door() {
        draw_text(
            "ENTER",
            session.exit_door.x + ox - 4.0,
            session.exit_door.y + oy - 50.0,
            18.0,
            WHITE,
        );
    }

    for chest in &session.chests {
        sprites::chest(
            chest.col as f32 * TILE + ox,
            chest.row as f32 * TILE + oy,
            chest.open,
        );
    }

    for rope in &session.ropes {
        if rope.deployed {
            sprites::rope(rope.x + ox, rope.y + oy, rope.length);
        }
    }

    for pickup in &session.pickups {
        sprites::gem(pickup.pos.x + ox, pickup.pos.y + oy, pickup.gem, 0.7);
    }

    for bomb in &session.bombs {
        if bomb.exploded {
            sprites::explosion(
                bomb.body.center().x + ox,
                bomb.body.center().y + oy,
                bomb.explosion_frame,
                EXPLOSION_FRAMES,
            );
        } else {
            sprites::bomb(bomb.body.pos.x + ox, bomb.body.pos.y + oy, frame);
        }
    }

    for entity in &session.entities {
        if !entity.alive {
            continue;
        }
        // Stunned entities flash
        if entity.stun_timer > 0 && (entity.stun_timer / 4) % 2 == 0 {
            continue;
        }
        let ex = entity.body.pos.x + ox;
        let ey = entity.body.pos.y + oy;
        match entity.species {
            Species::Snake { .. } => sprites::snake(ex, ey, entity.facing_right, frame),
            Species::Bat { .. } => sprites::bat(ex, ey, frame),
            Species::Spider { anchor_y, phase, .. } => {
                // Silk thread back to the anchor, except in free fall
                if phase != SpiderPhase::Falling {
                    let cx = entity.body.center().x + ox;
                    macroquad::prelude::draw_line(
                        cx,
                        anchor_y + oy,
                        cx,
                        ey,
                        2.0,
                        sprites::WOOD,
                    );
                }
                sprites::spider(ex, ey, frame)
            }
            Species::Caveman { .. } => sprites::caveman(ex, ey, entity.facing_right, frame),
        }
    }

    // Player, flickering through invincibility frames
    let p = &session.player;
    if p.is_dead {
        sprites::dead_player(p.body.pos.x + ox, p.body.pos.y + oy);
    } else {
        let visible = !p.is_invincible || (p.invincible_timer / 4) % 2 == 0;
        if visible {
            sprites::player(
                p.body.pos.x + ox,
                p.body.pos.y + oy,
                p.facing_right,
                p.is_walking,
                p.is_jumping,
                p.is_crouching,
                p.body.on_rope.is_some() || p.body.on_ladder,
                p.frame_count,
            );
            if p.is_whipping {
                sprites::whip(
                    p.body.pos.x + ox,
                    p.body.pos.y + oy,
                    p.facing_right,
                    p.whip_frame,
                    WHIP_FRAMES,
                );
            }
        }
    }

    for particle in &session.particles {
        sprites::particle(
            particle.pos.x + ox,
            particle.pos.y + oy,
            particle.color,
            particle.size,
        );
    }

    draw_vignette();
}

/// Darkened screen edges for the cave feel (no gradients in the
/// immediate-mode API, so layered translucent frames)
fn draw_vignette() {
    let w = screen_width();
    let h = screen_height();
    for i in 0..4 {
        let inset = i as f32 * 24.0;
        let alpha = 0.10 + i as f32 * 0.04;
        let shade = Color::new(0.0, 0.0, 0.0, alpha);
        draw_rectangle(0.0, inset, w, 24.0, shade);
        draw_rectangle(0.0, h - inset - 24.0, w, 24.0, shade);
        draw_rectangle(inset, 0.0, 24.0, h, shade);
        draw_rectangle(w - inset - 24.0, 0.0, 24.0, h, shade);
    }
}

/// Smooth-follow camera, clamped so the view never leaves the map.
#[derive(Debug, Default)]
pub struct Camera {
    pub pos: Vec2,
}

impl Camera {
    /// Jump straight to the player (level start)
    pub fn snap_to(&mut self, target: Vec2) {
        self.pos = Vec2::new(
            target.x - screen_width() / 2.0,
            target.y - screen_height() / 2.0,
        );
        self.clamp();
    }

    /// Ease toward the player's center
    pub fn follow(&mut self, target: Vec2) {
        let goal = Vec2::new(
            target.x - screen_width() / 2.0,
            target.y - screen_height() / 2.0,
        );
        self.pos += (goal - self.pos) * 0.12;
        self.clamp();
    }

    fn clamp(&mut self) {
        let max_x = (COLS as f32 * TILE - screen_width()).max(0.0);
        let max_y = (ROWS as f32 * TILE - screen_height()).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
        self.pos.y = self.pos.y.clamp(0.0, max_y);
    }
}
