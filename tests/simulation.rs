//! Cross-module scenario tests: generation validity, collision
//! containment, jump timing against a real ledge, the full bomb
//! lifecycle, and the spider drop cycle.

use macroquad::math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use grotto::input::ActionState;
use grotto::leaderboard::{MockLeaderboard, ScoreRecord, ScoreService};
use grotto::sim::entities::{self, Entity, Species, SpawnKind, SpiderPhase};
use grotto::sim::hazards::{self, Bomb, EXPLOSION_FRAMES};
use grotto::sim::levelgen::{self, EntitySpawn};
use grotto::sim::physics::{self, Body, MAX_FALL};
use grotto::sim::player::{Player, PLAYER_H};
use grotto::sim::{EventQueue, Tile, TileMap, COLS, ROWS, TILE};

fn flat_map() -> TileMap {
    let mut map = TileMap::filled(Tile::Empty);
    map.seal_border();
    for col in 1..COLS as i32 - 1 {
        map.set(col, 20, Tile::Solid);
    }
    map
}

/// Step a player frame with no other objects in the world
fn step_player(player: &mut Player, map: &TileMap, input: &ActionState, rng: &mut StdRng) {
    let mut ropes = Vec::new();
    let mut bombs = Vec::new();
    let mut entities: Vec<Entity> = Vec::new();
    let mut particles = Vec::new();
    let mut sounds = EventQueue::new();
    player.update(
        input, map, &mut ropes, &mut bombs, &mut entities, &mut particles, &mut sounds, rng,
    );
}

// ---- Generation validity ------------------------------------------------

#[test]
fn generated_levels_are_valid() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let level = levelgen::generate(1, &mut rng);

        // Outer ring always solid
        for col in 0..COLS as i32 {
            assert_eq!(level.map.get(col, 0), Tile::Solid);
            assert_eq!(level.map.get(col, ROWS as i32 - 1), Tile::Solid);
        }
        for row in 0..ROWS as i32 {
            assert_eq!(level.map.get(0, row), Tile::Solid);
            assert_eq!(level.map.get(COLS as i32 - 1, row), Tile::Solid);
        }

        // Exactly one resolved start and one exit door (marker or fallback)
        assert!(level.player_start.x >= 0.0 && level.player_start.x < TileMap::width_px());
        assert!(level.exit_door.y >= 0.0 && level.exit_door.y < TileMap::height_px());

        // Every gold vein still embedded on at least three sides
        for (col, row, tile) in level.map.cells() {
            if tile == Tile::GoldVein {
                let solid = [(0, -1), (0, 1), (-1, 0), (1, 0)]
                    .iter()
                    .filter(|(dc, dr)| {
                        level.map.get(col as i32 + dc, row as i32 + dr) == Tile::Solid
                    })
                    .count();
                assert!(solid >= 3);
            }
        }
    }
}

// ---- Collision containment ---------------------------------------------

#[test]
fn bodies_never_end_inside_solid_cells() {
    let mut map = flat_map();
    // Scatter some interior platforms and pillars
    for col in [5, 6, 7, 15, 16, 25, 26, 27, 28] {
        map.set(col, 14, Tile::Solid);
    }
    for row in 8..14 {
        map.set(20, row, Tile::Solid);
    }

    let mut rng = StdRng::seed_from_u64(99);
    let mut body = Body::new(10.0 * TILE, 5.0 * TILE, 32.0, 38.0);

    for _ in 0..5000 {
        body.vel.x = rng.gen_range(-MAX_FALL..=MAX_FALL);
        body.vel.y = rng.gen_range(-MAX_FALL..=MAX_FALL);
        physics::resolve_collisions(&mut body, &map);

        // Never outside the grid
        assert!(body.pos.x >= 0.0);
        assert!(body.pos.y >= 0.0);
        assert!(body.pos.x + body.size.x <= TileMap::width_px());

        // The body's interior never overlaps a solid cell
        let inset = 6.0;
        let left = ((body.pos.x + inset) / TILE).floor() as i32;
        let right = ((body.pos.x + body.size.x - inset) / TILE).floor() as i32;
        let top = ((body.pos.y + inset) / TILE).floor() as i32;
        let bottom = ((body.pos.y + body.size.y - inset) / TILE).floor() as i32;
        for row in top..=bottom {
            for col in left..=right {
                assert!(
                    !map.is_solid(col, row),
                    "body at {:?} overlaps solid cell ({col},{row})",
                    body.pos
                );
            }
        }
    }
}

// ---- Jump timing against a real ledge ----------------------------------

#[test]
fn coyote_jump_one_frame_after_walking_off_a_ledge() {
    let mut map = TileMap::filled(Tile::Empty);
    map.seal_border();
    // A platform that ends mid-air at column 10
    for col in 1..=10 {
        map.set(col, 20, Tile::Solid);
    }

    let mut player = Player::spawn(Vec2::new(8.0 * TILE, 20.0 * TILE - PLAYER_H));
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..5 {
        step_player(&mut player, &map, &ActionState::default(), &mut rng);
    }
    assert!(player.body.on_ground);

    // Sprint right until the ground disappears underneath
    let run = ActionState {
        right: true,
        sprint: true,
        ..Default::default()
    };
    let mut frames = 0;
    while player.body.on_ground {
        step_player(&mut player, &map, &run, &mut rng);
        frames += 1;
        assert!(frames < 400, "never reached the ledge");
    }

    // One more airborne frame, then press jump: coyote must honor it
    step_player(&mut player, &map, &run, &mut rng);
    let jump = ActionState {
        right: true,
        jump: true,
        jump_pressed: true,
        ..Default::default()
    };
    step_player(&mut player, &map, &jump, &mut rng);
    assert!(player.body.vel.y < -6.0, "coyote jump did not fire");
}

// ---- Bomb lifecycle -----------------------------------------------------

#[test]
fn placed_bomb_explodes_on_fuse_and_is_removed_once() {
    let mut map = flat_map();
    let mut player = Player::spawn(Vec2::new(8.0 * TILE, 20.0 * TILE - PLAYER_H));
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..5 {
        step_player(&mut player, &map, &ActionState::default(), &mut rng);
    }
    assert_eq!(player.hp, 4);

    // Armed at the player's feet, as the crouch-place action does
    let mut bombs = vec![Bomb::placed(Vec2::new(
        player.body.pos.x + 8.0,
        player.body.pos.y + player.body.size.y - 18.0,
    ))];
    let mut entities: Vec<Entity> = Vec::new();
    let mut pickups = Vec::new();
    let mut particles = Vec::new();
    let mut sounds = EventQueue::new();

    for tick in 0..180 {
        assert!(!bombs[0].exploded, "exploded early at tick {tick}");
        hazards::update_bombs(
            &mut bombs,
            &mut map,
            &mut entities,
            &mut player,
            &mut pickups,
            &mut particles,
            &mut sounds,
            &mut rng,
        );
    }
    assert!(bombs[0].exploded);
    assert_eq!(bombs[0].explosion_frame, 0);

    // Standing on top of the blast: two points of damage, i-frames engaged
    assert_eq!(player.hp, 2);
    assert!(player.is_invincible);

    // The explosion animates out, then the bomb is removed exactly once
    for _ in 0..EXPLOSION_FRAMES {
        hazards::update_bombs(
            &mut bombs,
            &mut map,
            &mut entities,
            &mut player,
            &mut pickups,
            &mut particles,
            &mut sounds,
            &mut rng,
        );
    }
    assert!(bombs.is_empty());
}

#[test]
fn blast_radius_is_symmetric_for_entities_and_player() {
    let mut map = TileMap::filled(Tile::Empty);
    map.seal_border();
    let center = Vec2::new(20.0 * TILE, 14.0 * TILE);

    // Entity and player at the same distance on opposite sides
    let offset = 50.0;
    let mut entities = vec![Entity::from_spawn(&EntitySpawn {
        species_kind: SpawnKind::Snake,
        pos: Vec2::new(center.x + offset - 18.0, center.y - 12.0),
        facing_right: true,
    })];
    let mut player = Player::spawn(Vec2::new(center.x - offset - 16.0, center.y - PLAYER_H / 2.0));

    let mut bombs = vec![Bomb::placed(center - Vec2::new(7.0, 7.0))];
    bombs[0].fuse = 1;
    let mut pickups = Vec::new();
    let mut particles = Vec::new();
    let mut sounds = EventQueue::new();
    let mut rng = StdRng::seed_from_u64(6);

    hazards::update_bombs(
        &mut bombs,
        &mut map,
        &mut entities,
        &mut player,
        &mut pickups,
        &mut particles,
        &mut sounds,
        &mut rng,
    );

    assert!(!entities[0].alive, "entity inside the radius must die");
    assert_eq!(player.hp, 2, "player inside the radius takes 2 damage");
}

// ---- Spider cycle -------------------------------------------------------

#[test]
fn spider_drop_cycle_returns_to_anchor() {
    let mut map = TileMap::filled(Tile::Empty);
    map.seal_border();
    // Landing platform five rows below the anchor
    for col in 6..=12 {
        map.set(col, 15, Tile::Solid);
    }
    let anchor_y = 10.0 * TILE;
    let mut spiders = vec![Entity::from_spawn(&EntitySpawn {
        species_kind: SpawnKind::Spider,
        pos: Vec2::new(8.0 * TILE, anchor_y),
        facing_right: true,
    })];
    // Player below, inside the horizontal tolerance but out of contact
    let mut player = Player::spawn(Vec2::new(9.0 * TILE, 15.0 * TILE - PLAYER_H));

    let mut pickups = Vec::new();
    let mut particles = Vec::new();
    let mut sounds = EventQueue::new();
    let mut rng = StdRng::seed_from_u64(7);

    let mut dropped = false;
    let mut returned = false;
    for _ in 0..2000 {
        entities::update_all(
            &mut spiders,
            &mut player,
            &map,
            &mut pickups,
            &mut particles,
            &mut sounds,
            &mut rng,
        );
        let Species::Spider { phase, .. } = spiders[0].species else {
            panic!("species changed");
        };
        if phase != SpiderPhase::Hanging {
            dropped = true;
        }
        if dropped && phase == SpiderPhase::Hanging {
            returned = true;
            break;
        }
    }
    assert!(dropped, "spider never triggered its drop");
    assert!(returned, "spider never returned to hanging");
    assert_eq!(spiders[0].body.pos.y, anchor_y);
}

// ---- Leaderboard stub ---------------------------------------------------

#[test]
fn leaderboard_round_trip() {
    let mut board = MockLeaderboard::new();
    board
        .submit(ScoreRecord {
            name: "Integration".into(),
            gold: 12_000,
            level: "4-4".into(),
        })
        .unwrap();
    let top = board.top(1).unwrap();
    assert_eq!(top[0].name, "Integration");
}
