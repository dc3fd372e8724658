//! Procedural level generation
//!
//! Room-template generation: the grid is partitioned into 10x6-cell rooms,
//! a vertical path is walked from the top row to the bottom, each room is
//! stamped from a small library of fixed ASCII layouts, and shafts and
//! passages are carved along the path. Gold veins and torches are scattered
//! into the walls afterward. The random source is injected so tests can
//! drive generation with a seeded generator.
//!
//! Generation never fails: missing start/door markers fall back to fixed
//! coordinates near the top-left and bottom-right corners.

use macroquad::math::Vec2;
use rand::Rng;

use super::entities::SpawnKind;
use super::tiles::{Tile, TileMap, COLS, ROWS, TILE};

/// Room width in cells
pub const ROOM_W: usize = 10;
/// Room height in cells
pub const ROOM_H: usize = 6;

/// An enemy placement extracted from the stamped grid
#[derive(Debug, Clone, Copy)]
pub struct EntitySpawn {
    pub species_kind: SpawnKind,
    pub pos: Vec2,
    pub facing_right: bool,
}

/// Everything a new level needs
pub struct GeneratedLevel {
    pub map: TileMap,
    pub spawns: Vec<EntitySpawn>,
    pub player_start: Vec2,
    pub exit_door: Vec2,
}

// Room layouts. '#' solid, '.' empty, 'L' ladder, 'S' spike, 'G' gold vein,
// 'C' chest, 'D' exit door, 'P' player start, 'E' enemy (random species).

static NORMAL_ROOMS: [[&str; ROOM_H]; 5] = [
    [
        "##########",
        "#........#",
        "#........#",
        "#...##...#",
        "#...##...#",
        "##########",
    ],
    [
        "##########",
        "#........#",
        "#..####..#",
        "#........#",
        "#...LL...#",
        "##########",
    ],
    [
        "##########",
        "#........#",
        "#.##..##.#",
        "#........#",
        "#........#",
        "##########",
    ],
    [
        "##########",
        "#....#...#",
        "#....#...#",
        "#....L...#",
        "#...#L...#",
        "##########",
    ],
    [
        "##########",
        "#........#",
        "##.....###",
        "#........#",
        "#...##...#",
        "##########",
    ],
];

static ENEMY_ROOMS: [[&str; ROOM_H]; 3] = [
    [
        "##########",
        "#...E....#",
        "#........#",
        "#..####..#",
        "#........#",
        "##########",
    ],
    [
        "##########",
        "#........#",
        "#.E..E...#",
        "#..####..#",
        "#........#",
        "##########",
    ],
    [
        "##########",
        "#...E....#",
        "#..####..#",
        "#........#",
        "#.E......#",
        "##########",
    ],
];

static TREASURE_ROOMS: [[&str; ROOM_H]; 3] = [
    [
        "##########",
        "#........#",
        "#.G..C...#",
        "########.#",
        "#........#",
        "##########",
    ],
    [
        "##########",
        "#..CCC...#",
        "#........#",
        "#..####..#",
        "#...G....#",
        "##########",
    ],
    [
        "##########",
        "#..G.G...#",
        "#........#",
        "#...C....#",
        "#........#",
        "##########",
    ],
];

static START_ROOMS: [[&str; ROOM_H]; 1] = [[
    "##########",
    "#...P....#",
    "#........#",
    "#..####..#",
    "#........#",
    "##########",
]];

static END_ROOMS: [[&str; ROOM_H]; 1] = [[
    "##########",
    "#..D.....#",
    "#........#",
    "#...####.#",
    "#........#",
    "##########",
]];

static TRAP_ROOMS: [[&str; ROOM_H]; 1] = [[
    "##########",
    "#........#",
    "#........#",
    "#SSSSSSSS#",
    "##########",
    "##########",
]];

/// Generate a full level. Pure function of the injected random source.
pub fn generate(level: u32, rng: &mut impl Rng) -> GeneratedLevel {
    let mut map = TileMap::filled(Tile::Solid);
    let grid_cols = COLS / ROOM_W; // 4
    let grid_rows = ROWS / ROOM_H; // 4

    // Walk a vertical path from the top row of rooms to the bottom
    let mut path_col = rng.gen_range(1..=grid_cols - 2);
    let mut path = Vec::with_capacity(grid_rows);
    for _ in 0..grid_rows {
        path.push(path_col);
        let roll: f32 = rng.gen();
        if roll < 0.33 && path_col > 1 {
            path_col -= 1;
        } else if roll < 0.66 && path_col < grid_cols - 2 {
            path_col += 1;
        }
    }

    // Stamp one room per grid cell
    for gr in 0..grid_rows {
        for gc in 0..grid_cols {
            let on_path = path[gr] == gc;
            let template = if gr == 0 && on_path {
                pick(&START_ROOMS, rng)
            } else if gr == grid_rows - 1 && on_path {
                pick(&END_ROOMS, rng)
            } else if on_path {
                let roll: f32 = rng.gen();
                if roll < 0.5 {
                    pick(&NORMAL_ROOMS, rng)
                } else if roll < 0.75 {
                    pick(&ENEMY_ROOMS, rng)
                } else {
                    pick(&TRAP_ROOMS, rng)
                }
            } else {
                let roll: f32 = rng.gen();
                if roll < 0.4 {
                    pick(&NORMAL_ROOMS, rng)
                } else if roll < 0.65 {
                    pick(&ENEMY_ROOMS, rng)
                } else {
                    pick(&TREASURE_ROOMS, rng)
                }
            };

            let ox = gc * ROOM_W;
            let oy = gr * ROOM_H;
            stamp_room(&mut map, template, ox, oy, rng);

            // Vertical shaft down to the next room on the path
            if on_path && gr < grid_rows - 1 && path[gr + 1] == gc {
                let mid = (ox + ROOM_W / 2 - 1) as i32;
                for row in (oy + ROOM_H - 2) as i32..(oy + ROOM_H + 2) as i32 {
                    map.set(mid, row, Tile::Empty);
                    map.set(mid + 1, row, Tile::Empty);
                }
                for row in (oy + 1) as i32..(oy + ROOM_H - 1) as i32 {
                    if map.get(mid, row) == Tile::Empty {
                        map.set(mid, row, Tile::Ladder);
                    }
                    if map.get(mid + 1, row) == Tile::Empty {
                        map.set(mid + 1, row, Tile::Ladder);
                    }
                }
            }
        }
    }

    // Horizontal passages where the path column changes between rows
    for gr in 1..grid_rows {
        let from = path[gr - 1];
        let to = path[gr];
        if from == to {
            continue;
        }
        let pass_row = (gr * ROOM_H) as i32;
        let min_col = (from.min(to) * ROOM_W + ROOM_W / 2) as i32;
        let max_col = (from.max(to) * ROOM_W + ROOM_W / 2) as i32;
        for col in min_col..=max_col {
            map.set(col, pass_row, Tile::Empty);
            map.set(col, pass_row + 1, Tile::Empty);
        }
    }

    map.seal_border();

    // Scatter gold veins: only into cells still embedded in rock
    let vein_attempts = rng.gen_range(8..20);
    for _ in 0..vein_attempts {
        let col = rng.gen_range(1..COLS - 1) as i32;
        let row = rng.gen_range(1..ROWS - 1) as i32;
        if map.get(col, row) != Tile::Solid {
            continue;
        }
        let solid_neighbors = [(0, -1), (0, 1), (-1, 0), (1, 0)]
            .iter()
            .filter(|(dc, dr)| map.get(col + dc, row + dr) == Tile::Solid)
            .count();
        if solid_neighbors >= 3 {
            map.set(col, row, Tile::GoldVein);
        }
    }

    // Scatter torches onto wall faces with open air to the right
    for row in 2..ROWS as i32 - 2 {
        for col in 2..COLS as i32 - 2 {
            if map.get(col, row) == Tile::Solid
                && map.get(col + 1, row) == Tile::Empty
                && map.get(col, row - 1) == Tile::Solid
                && map.get(col, row + 1) == Tile::Solid
                && rng.gen::<f32>() < 0.015
            {
                map.set(col, row, Tile::Torch);
            }
        }
    }

    // Extract enemy spawns, the player start and the exit door
    let mut spawns = Vec::new();
    let mut player_start = Vec2::new(TILE * 3.0, TILE * 3.0);
    let mut exit_door = Vec2::new(TILE * (COLS as f32 - 4.0), TILE * (ROWS as f32 - 4.0));
    let mut start_found = false;
    let mut door_found = false;

    for row in 0..ROWS as i32 {
        for col in 0..COLS as i32 {
            let pos = Vec2::new(col as f32 * TILE, row as f32 * TILE);
            match map.get(col, row) {
                Tile::SnakeSpawn => {
                    spawns.push(EntitySpawn {
                        species_kind: SpawnKind::Snake,
                        pos,
                        facing_right: rng.gen_bool(0.5),
                    });
                    map.set(col, row, Tile::Empty);
                }
                Tile::BatSpawn => {
                    spawns.push(EntitySpawn {
                        species_kind: SpawnKind::Bat,
                        pos,
                        facing_right: true,
                    });
                    map.set(col, row, Tile::Empty);
                }
                Tile::SpiderSpawn => {
                    spawns.push(EntitySpawn {
                        species_kind: SpawnKind::Spider,
                        pos,
                        facing_right: true,
                    });
                    map.set(col, row, Tile::Empty);
                }
                Tile::CavemanSpawn => {
                    spawns.push(EntitySpawn {
                        species_kind: SpawnKind::Caveman,
                        pos,
                        facing_right: rng.gen_bool(0.5),
                    });
                    map.set(col, row, Tile::Empty);
                }
                Tile::Entry => {
                    if !start_found {
                        player_start = pos;
                        start_found = true;
                    }
                    map.set(col, row, Tile::Empty);
                }
                Tile::Door => {
                    // The door tile stays for rendering and interaction
                    if !door_found {
                        exit_door = pos;
                        door_found = true;
                    }
                }
                _ => {}
            }
        }
    }

    tracing::debug!(
        level,
        spawns = spawns.len(),
        start_marker = start_found,
        door_marker = door_found,
        "generated level"
    );

    GeneratedLevel {
        map,
        spawns,
        player_start,
        exit_door,
    }
}

fn pick<'a, const N: usize>(
    rooms: &'a [[&'a str; ROOM_H]; N],
    rng: &mut impl Rng,
) -> &'a [&'a str; ROOM_H] {
    &rooms[rng.gen_range(0..N)]
}

/// Stamp a template's characters onto the grid at a room offset.
/// Writes outside the grid are dropped.
fn stamp_room(
    map: &mut TileMap,
    template: &[&str; ROOM_H],
    ox: usize,
    oy: usize,
    rng: &mut impl Rng,
) {
    const SPECIES_MARKERS: [Tile; 4] = [
        Tile::SnakeSpawn,
        Tile::BatSpawn,
        Tile::SpiderSpawn,
        Tile::CavemanSpawn,
    ];

    for (r, line) in template.iter().enumerate() {
        for (c, ch) in line.chars().enumerate() {
            let col = (ox + c) as i32;
            let row = (oy + r) as i32;
            let tile = match ch {
                '#' => Tile::Solid,
                '.' => Tile::Empty,
                'L' => Tile::Ladder,
                'S' => Tile::Spike,
                'G' => Tile::GoldVein,
                'C' => Tile::Chest,
                'D' => Tile::Door,
                'T' => Tile::Torch,
                'P' => Tile::Entry,
                'E' => SPECIES_MARKERS[rng.gen_range(0..SPECIES_MARKERS.len())],
                _ => continue,
            };
            map.set(col, row, tile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn all_templates() -> Vec<&'static [&'static str; ROOM_H]> {
        let mut all: Vec<&[&str; ROOM_H]> = Vec::new();
        all.extend(NORMAL_ROOMS.iter());
        all.extend(ENEMY_ROOMS.iter());
        all.extend(TREASURE_ROOMS.iter());
        all.extend(START_ROOMS.iter());
        all.extend(END_ROOMS.iter());
        all.extend(TRAP_ROOMS.iter());
        all
    }

    #[test]
    fn test_templates_are_room_sized() {
        for template in all_templates() {
            for line in template.iter() {
                assert_eq!(line.len(), ROOM_W, "bad row: {line}");
            }
        }
    }

    #[test]
    fn test_border_always_solid() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let level = generate(1, &mut rng);
            for col in 0..COLS as i32 {
                assert_eq!(level.map.get(col, 0), Tile::Solid);
                assert_eq!(level.map.get(col, ROWS as i32 - 1), Tile::Solid);
            }
            for row in 0..ROWS as i32 {
                assert_eq!(level.map.get(0, row), Tile::Solid);
                assert_eq!(level.map.get(COLS as i32 - 1, row), Tile::Solid);
            }
        }
    }

    #[test]
    fn test_no_markers_survive_the_scan() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let level = generate(1, &mut rng);
            for (col, row, tile) in level.map.cells() {
                assert!(
                    !matches!(
                        tile,
                        Tile::Entry
                            | Tile::SnakeSpawn
                            | Tile::BatSpawn
                            | Tile::SpiderSpawn
                            | Tile::CavemanSpawn
                    ),
                    "marker left at ({col},{row})"
                );
            }
        }
    }

    #[test]
    fn test_gold_veins_stay_embedded() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let level = generate(1, &mut rng);
            for (col, row, tile) in level.map.cells() {
                if tile != Tile::GoldVein {
                    continue;
                }
                let solid = [(0, -1), (0, 1), (-1, 0), (1, 0)]
                    .iter()
                    .filter(|(dc, dr)| {
                        level.map.get(col as i32 + dc, row as i32 + dr) == Tile::Solid
                    })
                    .count();
                assert!(solid >= 3, "exposed vein at ({col},{row})");
            }
        }
    }

    #[test]
    fn test_start_and_door_inside_grid() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let level = generate(1, &mut rng);
            assert!(level.player_start.x >= 0.0 && level.player_start.x < TileMap::width_px());
            assert!(level.player_start.y >= 0.0 && level.player_start.y < TileMap::height_px());
            assert!(level.exit_door.x >= 0.0 && level.exit_door.x < TileMap::width_px());
            assert!(level.exit_door.y >= 0.0 && level.exit_door.y < TileMap::height_px());
        }
    }
}
