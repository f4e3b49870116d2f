//! The tile grid and its per-tick state machine

use std::collections::{HashMap, HashSet};

use glam::IVec2;

use super::marble::{Color, Direction, Marble};
use super::tile::{CollisionResult, Tile};
use crate::consts::ORIGIN;

/// Flood-fill neighbor order: +x, +y, -x, -y
const NEIGHBORS: [IVec2; 4] = [IVec2::X, IVec2::Y, IVec2::NEG_X, IVec2::NEG_Y];

/// A sparse, unbounded grid of tiles and the one marble falling through it.
///
/// The origin always holds a [`Tile::Drop`].
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    tiles: HashMap<IVec2, Tile>,
    marble: Marble,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        let mut tiles = HashMap::new();
        tiles.insert(ORIGIN, Tile::Drop);
        Self {
            tiles,
            marble: Marble::default(),
        }
    }

    /// Place a tile, replacing whatever was there. The origin only accepts a drop.
    pub fn add_tile(&mut self, pos: IVec2, tile: Tile) {
        if pos == ORIGIN && tile != Tile::Drop {
            log::debug!("ignoring {:?} at the origin", tile.kind());
            return;
        }
        self.tiles.insert(pos, tile);
    }

    pub fn get_tile(&self, pos: IVec2) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    pub fn get_tile_mut(&mut self, pos: IVec2) -> Option<&mut Tile> {
        self.tiles.get_mut(&pos)
    }

    /// Remove and return a tile. The origin drop stays put.
    pub fn remove_tile(&mut self, pos: IVec2) -> Option<Tile> {
        if pos == ORIGIN {
            log::debug!("origin drop cannot be removed");
            return None;
        }
        self.tiles.remove(&pos)
    }

    /// Toggle the tile at `pos`, if any
    pub fn interact(&mut self, pos: IVec2) {
        if let Some(tile) = self.tiles.get_mut(&pos) {
            tile.interact();
        }
    }

    pub fn tiles(&self) -> impl Iterator<Item = (IVec2, &Tile)> {
        self.tiles.iter().map(|(pos, tile)| (*pos, tile))
    }

    /// Number of occupied cells, origin included
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when only the origin drop is present
    pub fn is_empty(&self) -> bool {
        self.tiles.len() == 1
    }

    /// Grid owned by the recursive tile at `pos`
    pub fn nested_grid(&self, pos: IVec2) -> Option<&Grid> {
        self.tiles.get(&pos).and_then(Tile::nested_grid)
    }

    pub fn nested_grid_mut(&mut self, pos: IVec2) -> Option<&mut Grid> {
        self.tiles.get_mut(&pos).and_then(Tile::nested_grid_mut)
    }

    /// Levels of nesting below this grid (0 when no recursive tiles)
    pub fn depth(&self) -> usize {
        self.tiles
            .values()
            .filter_map(Tile::nested_grid)
            .map(|grid| grid.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn marble(&self) -> &Marble {
        &self.marble
    }

    /// Release a marble from the origin
    pub fn add_marble(&mut self, direction: Direction, color: Color) {
        self.marble.start(direction, color);
    }

    /// Advance the simulation one tick. Returns true when the marble is done
    /// and the driver should release the next one.
    pub fn update(&mut self, result: &mut CollisionResult) -> bool {
        self.step(result, true)
    }

    /// One tick of the state machine. `root` is false when driven by a
    /// recursive tile, in which case loop resets are reported to the caller
    /// instead of being absorbed here.
    pub(crate) fn step(&mut self, result: &mut CollisionResult, root: bool) -> bool {
        result.clear();

        let was_active = self.marble.active;
        if was_active {
            self.marble.advance();
        }
        let pos = self.marble.pos;

        let Some(tile) = self.tiles.get_mut(&pos) else {
            log::trace!("marble left the grid at {pos}");
            self.marble.stop();
            return true;
        };
        if !was_active && !tile.holds_marble() {
            return true;
        }

        let mut finished = tile.collide(&mut self.marble, result);
        if result.inside_tile {
            self.marble.stop();
        }
        if result.turn {
            self.turn_connected(pos, result);
        }
        if finished && result.marble_reset && root {
            log::trace!("marble recycled by loop at {pos}");
            finished = false;
        }
        finished
    }

    /// Spread a rotation from `pos` through every connected tile that opts in
    pub fn turn_connected(&mut self, pos: IVec2, result: &mut CollisionResult) {
        let mut visited = HashSet::from([pos]);
        self.turn_from(&mut visited, pos, result);
    }

    fn turn_from(&mut self, visited: &mut HashSet<IVec2>, pos: IVec2, result: &mut CollisionResult) {
        for offset in NEIGHBORS {
            let next = pos + offset;
            if visited.contains(&next) {
                continue;
            }
            let Some(tile) = self.tiles.get_mut(&next) else {
                continue;
            };
            visited.insert(next);
            if tile.turn(result) {
                self.turn_from(visited, next, result);
            }
        }
    }

    /// Stop the marble and restore every tile's tick-derived state, recursively
    pub fn reset(&mut self) {
        self.marble.stop();
        for tile in self.tiles.values_mut() {
            tile.reset();
        }
    }
}
