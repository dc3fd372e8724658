//! Physics Resolver
//!
//! Gravity integration and axis-separated rectangle-vs-grid collision for
//! any physics body. Horizontal displacement is applied and resolved first,
//! then vertical; `on_ground` is only set by a downward hit. Sample points
//! sit at the leading edge of the body, inset a few pixels from the corners
//! so a body can slide past adjacent non-solid cells.

use macroquad::math::Vec2;

use super::hazards::Rope;
use super::tiles::{TileMap, Tile, TILE};

/// Downward acceleration per frame
pub const GRAVITY: f32 = 0.55;
/// Terminal fall speed
pub const MAX_FALL: f32 = 14.0;
/// Player walk speed
pub const WALK_SPEED: f32 = 3.2;
/// Player sprint speed
pub const SPRINT_SPEED: f32 = 5.8;
/// Jump impulse (negative = up)
pub const JUMP_POWER: f32 = -12.5;
/// Ladder and rope climb speed
pub const CLIMB_SPEED: f32 = 2.5;

/// An axis-aligned physics body. `pos` is the top-left corner.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
    pub on_ladder: bool,
    /// Index into the session's rope list while climbing
    pub on_rope: Option<usize>,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(w, h),
            on_ground: false,
            on_ladder: false,
            on_rope: None,
        }
    }

    /// Center of the body rectangle
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Accelerate a body downward unless it hangs on a rope or ladder.
/// Fall speed converges to `MAX_FALL` and never exceeds it.
pub fn apply_gravity(body: &mut Body) {
    if body.on_rope.is_none() && !body.on_ladder {
        body.vel.y += GRAVITY;
        if body.vel.y > MAX_FALL {
            body.vel.y = MAX_FALL;
        }
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Apply the body's velocity and resolve collisions against the grid,
/// one axis at a time. Position snaps to the cell boundary on hit and the
/// velocity component zeroes. The body is finally clamped to the map.
pub fn resolve_collisions(body: &mut Body, map: &TileMap) {
    // Move X first
    body.pos.x += body.vel.x;
    if let Some((tile_col, _)) = probe(body, map, Axis::X) {
        if body.vel.x > 0.0 {
            body.pos.x = tile_col as f32 * TILE - body.size.x;
        } else if body.vel.x < 0.0 {
            body.pos.x = (tile_col + 1) as f32 * TILE;
        }
        body.vel.x = 0.0;
    }

    // Then Y
    body.pos.y += body.vel.y;
    body.on_ground = false;
    if let Some((_, tile_row)) = probe(body, map, Axis::Y) {
        if body.vel.y > 0.0 {
            body.pos.y = tile_row as f32 * TILE - body.size.y;
            body.on_ground = true;
            body.vel.y = 0.0;
        } else if body.vel.y < 0.0 {
            body.pos.y = (tile_row + 1) as f32 * TILE;
            body.vel.y = 0.0;
        }
    }

    // Clamp to map bounds
    if body.pos.x < 0.0 {
        body.pos.x = 0.0;
        body.vel.x = 0.0;
    }
    if body.pos.x + body.size.x > TileMap::width_px() {
        body.pos.x = TileMap::width_px() - body.size.x;
        body.vel.x = 0.0;
    }
    if body.pos.y < 0.0 {
        body.pos.y = 0.0;
        body.vel.y = 0.0;
    }
}

/// Sample two leading-edge points in the direction of motion.
/// Returns the grid cell of the first solid hit.
fn probe(body: &Body, map: &TileMap, axis: Axis) -> Option<(i32, i32)> {
    let left = body.pos.x + 2.0;
    let right = body.pos.x + body.size.x - 2.0;
    let top = body.pos.y + 2.0;
    let bot = body.pos.y + body.size.y - 1.0;

    let points: [Vec2; 2] = match axis {
        Axis::X => {
            if body.vel.x > 0.0 {
                [Vec2::new(right, top + 4.0), Vec2::new(right, bot - 4.0)]
            } else {
                [Vec2::new(left, top + 4.0), Vec2::new(left, bot - 4.0)]
            }
        }
        Axis::Y => {
            if body.vel.y > 0.0 {
                [Vec2::new(left + 4.0, bot), Vec2::new(right - 4.0, bot)]
            } else {
                [Vec2::new(left + 4.0, top), Vec2::new(right - 4.0, top)]
            }
        }
    };

    for pt in points {
        let (col, row) = TileMap::cell_of(pt.x, pt.y);
        if map.is_solid(col, row) {
            return Some((col, row));
        }
    }
    None
}

/// Is the body's center inside a ladder tile?
pub fn on_ladder_tile(body: &Body, map: &TileMap) -> bool {
    let c = body.center();
    map.tile_at_px(c.x, c.y) == Tile::Ladder
}

/// Find a deployed rope the body is touching: within 15px of the rope's
/// centerline and vertically overlapping its hanging length.
pub fn touching_rope(body: &Body, ropes: &[Rope]) -> Option<usize> {
    for (i, rope) in ropes.iter().enumerate() {
        if !rope.deployed {
            continue;
        }
        let center_x = rope.x + TILE / 2.0;
        if (body.center().x - center_x).abs() < 15.0
            && body.pos.y < rope.y + rope.length as f32 * TILE
            && body.pos.y + body.size.y > rope.y
        {
            return Some(i);
        }
    }
    None
}

/// Axis-aligned rectangle overlap
pub fn rects_overlap(
    ax: f32, ay: f32, aw: f32, ah: f32,
    bx: f32, by: f32, bw: f32, bh: f32,
) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}

/// Point containment (inclusive edges), used for pickups
pub fn point_in_rect(px: f32, py: f32, rx: f32, ry: f32, rw: f32, rh: f32) -> bool {
    px >= rx && px <= rx + rw && py >= ry && py <= ry + rh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tiles::{COLS, ROWS};

    fn floor_map() -> TileMap {
        // Empty world with a solid floor on the bottom row
        let mut map = TileMap::filled(Tile::Empty);
        for col in 0..COLS as i32 {
            map.set(col, ROWS as i32 - 1, Tile::Solid);
        }
        map
    }

    #[test]
    fn test_gravity_clamps_to_max_fall() {
        let mut body = Body::new(100.0, 100.0, 32.0, 38.0);
        for _ in 0..100 {
            apply_gravity(&mut body);
            assert!(body.vel.y <= MAX_FALL);
        }
        assert_eq!(body.vel.y, MAX_FALL);
    }

    #[test]
    fn test_gravity_skipped_on_ladder_and_rope() {
        let mut body = Body::new(0.0, 0.0, 32.0, 38.0);
        body.on_ladder = true;
        apply_gravity(&mut body);
        assert_eq!(body.vel.y, 0.0);

        body.on_ladder = false;
        body.on_rope = Some(0);
        apply_gravity(&mut body);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_falling_body_lands_on_floor() {
        let map = floor_map();
        let mut body = Body::new(100.0, 900.0, 32.0, 38.0);
        for _ in 0..200 {
            apply_gravity(&mut body);
            resolve_collisions(&mut body, &map);
        }
        assert!(body.on_ground);
        assert_eq!(body.vel.y, 0.0);
        // Resting exactly on top of the bottom row
        assert_eq!(body.pos.y, (ROWS as f32 - 1.0) * TILE - body.size.y);
    }

    #[test]
    fn test_horizontal_hit_snaps_to_cell_boundary() {
        let mut map = TileMap::filled(Tile::Empty);
        map.set(10, 5, Tile::Solid);
        let mut body = Body::new(9.0 * TILE - 32.0, 5.0 * TILE, 30.0, 36.0);
        body.vel.x = 10.0;
        resolve_collisions(&mut body, &map);
        assert_eq!(body.pos.x, 10.0 * TILE - body.size.x);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_world_bounds_clamp() {
        let map = TileMap::filled(Tile::Empty);
        let mut body = Body::new(5.0, 5.0, 32.0, 38.0);
        body.vel.x = -50.0;
        body.vel.y = -50.0;
        resolve_collisions(&mut body, &map);
        assert_eq!(body.pos.x, 0.0);
        assert_eq!(body.pos.y, 0.0);
        assert_eq!(body.vel.x, 0.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_rects_overlap() {
        assert!(rects_overlap(0.0, 0.0, 10.0, 10.0, 5.0, 5.0, 10.0, 10.0));
        assert!(!rects_overlap(0.0, 0.0, 10.0, 10.0, 10.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_touching_rope_requires_deployed_and_span() {
        let rope = Rope {
            x: 5.0 * TILE,
            y: 2.0 * TILE,
            length: 4,
            deployed: true,
        };
        // Body centered on the rope column, inside the hanging span
        let body = Body::new(5.0 * TILE + 4.0, 3.0 * TILE, 32.0, 38.0);
        assert_eq!(touching_rope(&body, &[rope]), Some(0));

        let undeployed = Rope { deployed: false, ..rope };
        assert_eq!(touching_rope(&body, &[undeployed]), None);

        // Below the end of the rope
        let below = Body::new(5.0 * TILE + 4.0, 7.0 * TILE, 32.0, 38.0);
        assert_eq!(touching_rope(&below, &[rope]), None);
    }
}
