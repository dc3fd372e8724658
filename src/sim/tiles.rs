//! Tile Map
//!
//! The level is a fixed 42x28 grid of typed tiles with a 40px cell size.
//! The grid is the single source of truth for collision: a handful of tile
//! kinds count as solid, everything else is passable. Probes outside the
//! grid always read as solid so nothing can escape the world.

/// Width of the grid in cells
pub const COLS: usize = 42;
/// Height of the grid in cells
pub const ROWS: usize = 28;
/// Cell size in pixels
pub const TILE: f32 = 40.0;

/// One cell of the level grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
    Dirt,
    Ladder,
    RopeAnchor,
    Spike,
    GoldVein,
    Chest,
    Door,
    Torch,
    Cobweb,
    Push,
    /// Player start marker (consumed during the generation scan)
    Entry,
    // Enemy spawn markers, consumed during the generation scan
    SnakeSpawn,
    BatSpawn,
    SpiderSpawn,
    CavemanSpawn,
}

impl Tile {
    /// Does this tile block movement?
    /// Spikes block but never damage; gold veins and torches are wall tiles.
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Solid | Tile::Spike | Tile::GoldVein | Tile::Torch)
    }
}

/// The level grid. Row-major, `tiles[row][col]`.
#[derive(Clone)]
pub struct TileMap {
    tiles: [[Tile; COLS]; ROWS],
}

impl TileMap {
    /// A map with every cell set to `fill`
    pub fn filled(fill: Tile) -> Self {
        Self {
            tiles: [[fill; COLS]; ROWS],
        }
    }

    /// Tile at grid position. Out-of-range reads are Solid.
    pub fn get(&self, col: i32, row: i32) -> Tile {
        if col < 0 || col >= COLS as i32 || row < 0 || row >= ROWS as i32 {
            return Tile::Solid;
        }
        self.tiles[row as usize][col as usize]
    }

    /// Write a tile. Out-of-range writes are ignored.
    pub fn set(&mut self, col: i32, row: i32, tile: Tile) {
        if col < 0 || col >= COLS as i32 || row < 0 || row >= ROWS as i32 {
            return;
        }
        self.tiles[row as usize][col as usize] = tile;
    }

    /// Is the tile at grid position solid? Out-of-range is solid.
    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        self.get(col, row).is_solid()
    }

    /// Tile under a pixel position
    pub fn tile_at_px(&self, x: f32, y: f32) -> Tile {
        let (col, row) = Self::cell_of(x, y);
        self.get(col, row)
    }

    /// Grid cell containing a pixel position
    pub fn cell_of(x: f32, y: f32) -> (i32, i32) {
        ((x / TILE).floor() as i32, (y / TILE).floor() as i32)
    }

    /// Map width in pixels
    pub fn width_px() -> f32 {
        COLS as f32 * TILE
    }

    /// Map height in pixels
    pub fn height_px() -> f32 {
        ROWS as f32 * TILE
    }

    /// Force the outer ring of cells to Solid
    pub fn seal_border(&mut self) {
        for col in 0..COLS {
            self.tiles[0][col] = Tile::Solid;
            self.tiles[ROWS - 1][col] = Tile::Solid;
        }
        for row in 0..ROWS {
            self.tiles[row][0] = Tile::Solid;
            self.tiles[row][COLS - 1] = Tile::Solid;
        }
    }

    /// Iterate all cells as (col, row, tile)
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .flat_map(|(row, line)| line.iter().enumerate().map(move |(col, &t)| (col, row, t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_is_solid() {
        let map = TileMap::filled(Tile::Empty);
        assert!(map.is_solid(-1, 5));
        assert!(map.is_solid(COLS as i32, 5));
        assert!(map.is_solid(5, -1));
        assert!(map.is_solid(5, ROWS as i32));
        assert!(!map.is_solid(5, 5));
    }

    #[test]
    fn test_solid_kinds() {
        assert!(Tile::Solid.is_solid());
        assert!(Tile::Spike.is_solid());
        assert!(Tile::GoldVein.is_solid());
        assert!(Tile::Torch.is_solid());
        assert!(!Tile::Ladder.is_solid());
        assert!(!Tile::Door.is_solid());
        assert!(!Tile::Empty.is_solid());
    }

    #[test]
    fn test_seal_border() {
        let mut map = TileMap::filled(Tile::Empty);
        map.seal_border();
        for col in 0..COLS as i32 {
            assert_eq!(map.get(col, 0), Tile::Solid);
            assert_eq!(map.get(col, ROWS as i32 - 1), Tile::Solid);
        }
        for row in 0..ROWS as i32 {
            assert_eq!(map.get(0, row), Tile::Solid);
            assert_eq!(map.get(COLS as i32 - 1, row), Tile::Solid);
        }
    }

    #[test]
    fn test_cell_of() {
        assert_eq!(TileMap::cell_of(0.0, 0.0), (0, 0));
        assert_eq!(TileMap::cell_of(39.9, 39.9), (0, 0));
        assert_eq!(TileMap::cell_of(40.0, 80.0), (1, 2));
    }
}
