//! Procedural sprites
//!
//! Everything on screen is drawn from primitives; there are no image
//! assets. Each function takes world coordinates already offset by the
//! camera. Variant parameters keep static tiles from looking uniform
//! without any per-frame randomness.

use macroquad::prelude::{
    draw_circle, draw_line, draw_rectangle, draw_triangle, Color, Vec2,
};

use crate::sim::hazards::GemKind;
use crate::sim::TILE;

// Cave palette
pub const ROCK: Color = Color::new(0.36, 0.25, 0.16, 1.0);
pub const ROCK_DARK: Color = Color::new(0.27, 0.18, 0.11, 1.0);
pub const ROCK_LIGHT: Color = Color::new(0.45, 0.32, 0.2, 1.0);
pub const DIRT: Color = Color::new(0.42, 0.27, 0.14, 1.0);
pub const WOOD: Color = Color::new(0.62, 0.42, 0.2, 1.0);
pub const WOOD_DARK: Color = Color::new(0.45, 0.3, 0.14, 1.0);
pub const GOLD: Color = Color::new(1.0, 0.84, 0.25, 1.0);
pub const BONE: Color = Color::new(0.9, 0.87, 0.78, 1.0);
pub const FLAME: Color = Color::new(1.0, 0.6, 0.1, 1.0);
pub const FLAME_CORE: Color = Color::new(1.0, 0.9, 0.4, 1.0);

/// Base rock tile with a per-variant pock pattern
pub fn cave_tile(x: f32, y: f32, variant: usize) {
    draw_rectangle(x, y, TILE, TILE, ROCK);
    draw_rectangle(x, y + TILE - 4.0, TILE, 4.0, ROCK_DARK);
    draw_rectangle(x, y, TILE, 3.0, ROCK_LIGHT);
    // A couple of darker pocks, placed by variant
    let spots: [(f32, f32); 2] = match variant % 4 {
        0 => [(8.0, 10.0), (26.0, 24.0)],
        1 => [(20.0, 8.0), (10.0, 28.0)],
        2 => [(30.0, 14.0), (14.0, 18.0)],
        _ => [(6.0, 22.0), (24.0, 6.0)],
    };
    for (sx, sy) in spots {
        draw_rectangle(x + sx, y + sy, 5.0, 4.0, ROCK_DARK);
    }
}

pub fn dirt_tile(x: f32, y: f32) {
    draw_rectangle(x, y, TILE, TILE, DIRT);
    draw_rectangle(x + 6.0, y + 12.0, 4.0, 3.0, ROCK_DARK);
    draw_rectangle(x + 24.0, y + 26.0, 5.0, 3.0, ROCK_DARK);
}

pub fn ladder(x: f32, y: f32) {
    let rail = WOOD_DARK;
    draw_rectangle(x + 6.0, y, 4.0, TILE, rail);
    draw_rectangle(x + TILE - 10.0, y, 4.0, TILE, rail);
    for i in 0..3 {
        draw_rectangle(x + 6.0, y + 6.0 + i as f32 * 13.0, TILE - 12.0, 3.0, WOOD);
    }
}

pub fn spikes(x: f32, y: f32) {
    draw_rectangle(x, y + TILE - 6.0, TILE, 6.0, ROCK_DARK);
    for i in 0..4 {
        let sx = x + i as f32 * 10.0;
        draw_triangle(
            Vec2::new(sx + 1.0, y + TILE - 4.0),
            Vec2::new(sx + 9.0, y + TILE - 4.0),
            Vec2::new(sx + 5.0, y + 6.0),
            BONE,
        );
    }
}

pub fn gold_vein(x: f32, y: f32) {
    for (gx, gy, r) in [(10.0, 12.0, 4.0), (26.0, 20.0, 3.0), (18.0, 30.0, 2.5)] {
        draw_circle(x + gx, y + gy, r, GOLD);
    }
}

pub fn torch(x: f32, y: f32, frame: u64) {
    cave_tile(x, y, 0);
    draw_rectangle(x + TILE - 6.0, y + 14.0, 8.0, 4.0, WOOD_DARK);
    // Flicker from the frame counter
    let flicker = ((frame / 4) % 3) as f32;
    let fx = x + TILE + 2.0;
    let fy = y + 12.0 - flicker;
    draw_circle(fx, fy, 6.0 + flicker, FLAME);
    draw_circle(fx, fy + 1.0, 3.0, FLAME_CORE);
}

pub fn door(x: f32, y: f32) {
    draw_rectangle(x - 4.0, y - TILE, TILE + 8.0, TILE * 2.0, ROCK_DARK);
    draw_rectangle(x, y - TILE + 6.0, TILE, TILE * 2.0 - 6.0, Color::new(0.1, 0.07, 0.05, 1.0));
    draw_rectangle(x + 2.0, y - TILE + 6.0, 4.0, TILE * 2.0 - 6.0, WOOD_DARK);
    draw_rectangle(x + TILE - 6.0, y - TILE + 6.0, 4.0, TILE * 2.0 - 6.0, WOOD_DARK);
}

pub fn chest(x: f32, y: f32, open: bool) {
    let lid = if open { 6.0 } else { 12.0 };
    draw_rectangle(x + 4.0, y + TILE - 22.0, TILE - 8.0, 22.0, WOOD);
    draw_rectangle(x + 4.0, y + TILE - 22.0 - lid, TILE - 8.0, lid, WOOD_DARK);
    draw_rectangle(x + TILE / 2.0 - 3.0, y + TILE - 20.0, 6.0, 8.0, GOLD);
    if open {
        draw_circle(x + TILE / 2.0, y + TILE - 24.0, 5.0, GOLD);
    }
}

pub fn rope(x: f32, y: f32, length: u32) {
    let cx = x + TILE / 2.0;
    let end = y + length as f32 * TILE;
    draw_line(cx, y, cx, end, 3.0, WOOD);
    let mut knot = y + 12.0;
    while knot < end {
        draw_rectangle(cx - 3.0, knot, 6.0, 3.0, WOOD_DARK);
        knot += 24.0;
    }
}

/// Small corner web. `corner` picks one of the four tile corners.
pub fn cobweb(x: f32, y: f32, corner: usize) {
    let gray = Color::new(0.85, 0.85, 0.85, 0.35);
    let (cx, cy, dx, dy) = match corner % 4 {
        0 => (x, y, 1.0, 1.0),
        1 => (x + TILE, y, -1.0, 1.0),
        2 => (x, y + TILE, 1.0, -1.0),
        _ => (x + TILE, y + TILE, -1.0, -1.0),
    };
    for i in 1..4 {
        let r = i as f32 * 5.0;
        draw_line(cx + dx * r, cy, cx, cy + dy * r, 1.0, gray);
    }
    draw_line(cx, cy, cx + dx * 14.0, cy + dy * 14.0, 1.0, gray);
}

pub fn bomb(x: f32, y: f32, frame: u64) {
    draw_circle(x + 7.0, y + 7.0, 7.0, Color::new(0.15, 0.15, 0.18, 1.0));
    draw_circle(x + 5.0, y + 5.0, 2.0, Color::new(0.4, 0.4, 0.45, 1.0));
    // Sparking fuse
    if (frame / 3) % 2 == 0 {
        draw_circle(x + 10.0, y - 2.0, 2.0, FLAME_CORE);
    }
    draw_line(x + 8.0, y, x + 10.0, y - 2.0, 2.0, WOOD_DARK);
}

pub fn explosion(x: f32, y: f32, frame: u32, max_frames: u32) {
    let t = frame as f32 / max_frames as f32;
    let radius = 20.0 + t * 60.0;
    let fade = 1.0 - t;
    draw_circle(x, y, radius, Color::new(1.0, 0.5, 0.1, fade * 0.7));
    draw_circle(x, y, radius * 0.6, Color::new(1.0, 0.8, 0.2, fade * 0.8));
    draw_circle(x, y, radius * 0.3, Color::new(1.0, 1.0, 0.8, fade));
}

pub fn gem(x: f32, y: f32, kind: GemKind, scale: f32) {
    let color = match kind {
        GemKind::Sapphire => Color::new(0.25, 0.45, 1.0, 1.0),
        GemKind::Emerald => Color::new(0.2, 0.9, 0.45, 1.0),
        GemKind::Ruby => Color::new(1.0, 0.25, 0.35, 1.0),
        GemKind::Nugget => GOLD,
    };
    let r = 7.0 * scale;
    draw_triangle(
        Vec2::new(x - r, y),
        Vec2::new(x + r, y),
        Vec2::new(x, y + r),
        color,
    );
    draw_triangle(
        Vec2::new(x - r, y),
        Vec2::new(x + r, y),
        Vec2::new(x, y - r * 0.6),
        color,
    );
    draw_line(x - r * 0.4, y - r * 0.2, x + r * 0.2, y - r * 0.2, 1.0, BONE);
}

pub fn snake(x: f32, y: f32, facing_right: bool, frame: u64) {
    let body = Color::new(0.3, 0.75, 0.3, 1.0);
    let wiggle = ((frame / 6) % 2) as f32 * 2.0;
    draw_rectangle(x, y + 8.0 + wiggle, 36.0, 14.0, body);
    let head_x = if facing_right { x + 28.0 } else { x };
    draw_rectangle(head_x, y + 2.0 + wiggle, 8.0, 12.0, body);
    let eye_x = if facing_right { head_x + 5.0 } else { head_x + 1.0 };
    draw_rectangle(eye_x, y + 5.0 + wiggle, 2.0, 2.0, Color::new(1.0, 0.2, 0.2, 1.0));
}

pub fn bat(x: f32, y: f32, frame: u64) {
    let body = Color::new(0.45, 0.3, 0.55, 1.0);
    let flap = ((frame / 4) % 2) as f32 * 6.0;
    draw_circle(x + 14.0, y + 11.0, 7.0, body);
    draw_triangle(
        Vec2::new(x + 8.0, y + 11.0),
        Vec2::new(x - 2.0, y + 4.0 + flap),
        Vec2::new(x + 6.0, y + 16.0),
        body,
    );
    draw_triangle(
        Vec2::new(x + 20.0, y + 11.0),
        Vec2::new(x + 30.0, y + 4.0 + flap),
        Vec2::new(x + 22.0, y + 16.0),
        body,
    );
    draw_rectangle(x + 10.0, y + 8.0, 2.0, 2.0, FLAME_CORE);
    draw_rectangle(x + 16.0, y + 8.0, 2.0, 2.0, FLAME_CORE);
}

pub fn spider(x: f32, y: f32, frame: u64) {
    let body = Color::new(0.2, 0.2, 0.22, 1.0);
    draw_circle(x + 14.0, y + 16.0, 9.0, body);
    draw_circle(x + 14.0, y + 7.0, 5.0, body);
    let twitch = ((frame / 5) % 2) as f32 * 2.0;
    for i in 0..3 {
        let ly = y + 12.0 + i as f32 * 4.0;
        draw_line(x + 6.0, ly, x - 2.0, ly + 4.0 + twitch, 1.5, body);
        draw_line(x + 22.0, ly, x + 30.0, ly + 4.0 + twitch, 1.5, body);
    }
    draw_rectangle(x + 11.0, y + 5.0, 2.0, 2.0, Color::new(1.0, 0.2, 0.2, 1.0));
    draw_rectangle(x + 15.0, y + 5.0, 2.0, 2.0, Color::new(1.0, 0.2, 0.2, 1.0));
}

pub fn caveman(x: f32, y: f32, facing_right: bool, frame: u64) {
    let skin = Color::new(0.85, 0.6, 0.45, 1.0);
    let fur = Color::new(0.5, 0.35, 0.2, 1.0);
    let step = ((frame / 6) % 2) as f32 * 3.0;
    // Legs
    draw_rectangle(x + 6.0, y + 28.0, 7.0, 12.0 - step, skin);
    draw_rectangle(x + 19.0, y + 28.0 + step, 7.0, 12.0 - step, skin);
    // Fur tunic and head
    draw_rectangle(x + 4.0, y + 12.0, 24.0, 18.0, fur);
    draw_circle(x + 16.0, y + 7.0, 7.0, skin);
    let eye_x = if facing_right { x + 19.0 } else { x + 11.0 };
    draw_rectangle(eye_x, y + 5.0, 2.0, 3.0, ROCK_DARK);
    // Club
    let club_x = if facing_right { x + 28.0 } else { x - 6.0 };
    draw_rectangle(club_x, y + 10.0, 6.0, 16.0, WOOD_DARK);
}

/// The player figure. State flags pick the pose.
#[allow(clippy::too_many_arguments)]
pub fn player(
    x: f32,
    y: f32,
    facing_right: bool,
    walking: bool,
    jumping: bool,
    crouching: bool,
    climbing: bool,
    frame: u64,
) {
    let skin = Color::new(0.92, 0.72, 0.55, 1.0);
    let shirt = Color::new(0.75, 0.25, 0.2, 1.0);
    let pants = Color::new(0.35, 0.3, 0.5, 1.0);
    let hat = Color::new(0.9, 0.85, 0.7, 1.0);

    let crouch_drop = if crouching { 8.0 } else { 0.0 };
    let step = if walking && !jumping {
        ((frame / 5) % 2) as f32 * 3.0
    } else {
        0.0
    };

    // Legs
    draw_rectangle(x + 6.0, y + 26.0 + crouch_drop, 8.0, 12.0 - crouch_drop - step, pants);
    draw_rectangle(
        x + 18.0,
        y + 26.0 + crouch_drop + step,
        8.0,
        12.0 - crouch_drop - step,
        pants,
    );
    // Torso
    draw_rectangle(x + 5.0, y + 12.0 + crouch_drop, 22.0, 15.0, shirt);
    // Arms up while climbing
    if climbing {
        draw_rectangle(x + 2.0, y + 4.0 + crouch_drop, 5.0, 12.0, shirt);
        draw_rectangle(x + 25.0, y + 4.0 + crouch_drop, 5.0, 12.0, shirt);
    }
    // Head and hat
    draw_circle(x + 16.0, y + 7.0 + crouch_drop, 7.0, skin);
    draw_rectangle(x + 7.0, y + crouch_drop - 2.0, 18.0, 5.0, hat);
    draw_rectangle(x + 9.0, y + crouch_drop - 5.0, 14.0, 4.0, hat);
    let eye_x = if facing_right { x + 19.0 } else { x + 11.0 };
    draw_rectangle(eye_x, y + 5.0 + crouch_drop, 2.0, 3.0, ROCK_DARK);
}

pub fn dead_player(x: f32, y: f32) {
    let shirt = Color::new(0.75, 0.25, 0.2, 1.0);
    draw_rectangle(x - 2.0, y + 26.0, 38.0, 12.0, shirt);
    draw_circle(x + 34.0, y + 30.0, 6.0, Color::new(0.92, 0.72, 0.55, 1.0));
}

/// The whip sweeps out over its active window.
pub fn whip(x: f32, y: f32, facing_right: bool, frame: u32, max_frames: u32) {
    let t = (frame as f32 / max_frames as f32).min(1.0);
    let sweep = (t * std::f32::consts::PI).sin();
    let reach = 58.0 * sweep;
    let hand_x = if facing_right { x + 30.0 } else { x + 2.0 };
    let hand_y = y + 16.0;
    let tip_x = if facing_right { hand_x + reach } else { hand_x - reach };
    let tip_y = hand_y - 10.0 * (1.0 - sweep);
    draw_line(hand_x, hand_y, tip_x, tip_y, 3.0, WOOD);
    draw_circle(tip_x, tip_y, 2.0, BONE);
}

pub fn particle(x: f32, y: f32, color: Color, size: f32) {
    if size > 0.5 {
        draw_rectangle(x - size / 2.0, y - size / 2.0, size, size, color);
    }
}
