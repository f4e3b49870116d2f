//! Nested grids
//!
//! A recursive tile owns a complete grid of its own. A marble entering the
//! tile is handed to the nested grid and simulated there one step per outer
//! tick, until it falls out the bottom and resumes in the parent grid.

use super::grid::Grid;
use super::marble::{Color, Marble};
use super::tile::CollisionResult;
use crate::consts::ORIGIN;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecursiveTile {
    grid: Grid,
    color: Color,
    /// A marble is currently inside the nested grid
    active: bool,
}

impl RecursiveTile {
    pub fn new(grid: Grid, color: Color) -> Self {
        Self {
            grid,
            color,
            active: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Display band: walk the palette, skipping black
    pub fn cycle_color(&mut self) {
        self.color = match self.color {
            Color::Red => Color::Green,
            Color::Green => Color::Yellow,
            Color::Yellow => Color::Blue,
            Color::Blue => Color::Magenta,
            Color::Magenta => Color::Cyan,
            Color::Cyan => Color::White,
            Color::White | Color::Black => Color::Red,
        };
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.grid.reset();
    }

    pub(crate) fn collide(&mut self, marble: &mut Marble, result: &mut CollisionResult) -> bool {
        result.inside_tile = true;

        if !self.active {
            // Lands on the nested drop this tick, falls on the next one
            self.active = true;
            self.grid.add_marble(marble.direction, marble.color);
            log::trace!("marble entered nested grid at {}", marble.pos);
            return false;
        }

        let mut inner = CollisionResult::default();
        if self.grid.step(&mut inner, false) {
            if inner.exit_tile {
                // exits only end a run at the root, the nested marble keeps falling
            } else if inner.marble_reset {
                // a nested loop recycled the marble, it stays inside
                let recycled = *self.grid.marble();
                self.grid.add_marble(recycled.direction, recycled.color);
            } else {
                let nested = *self.grid.marble();
                self.active = false;
                result.inside_tile = false;
                marble.direction = nested.direction;
                marble.color = nested.color;
                marble.active = true;
                log::trace!("marble left nested grid at {}", marble.pos);
            }
        }

        if inner.turn_parent {
            result.turn = true;
        }
        if inner.marble_reset {
            result.marble_reset = true;
        }
        if inner.output.is_some() {
            result.output = inner.output;
        }

        // never finished here: a marble that left the nested grid is still
        // falling in this one
        false
    }

    /// Rotation arriving from the parent spins the nested gear train from its drop
    pub(crate) fn turn(&mut self) -> bool {
        let mut scratch = CollisionResult::default();
        self.grid.turn_connected(ORIGIN, &mut scratch);
        true
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::sim::marble::Direction;
    use crate::sim::tile::{Tile, TileKind};

    fn incoming(direction: Direction, color: Color) -> Marble {
        let mut m = Marble::default();
        m.start(direction, color);
        m
    }

    #[test]
    fn test_empty_nested_grid_passes_marble_through() {
        let mut tile = RecursiveTile::default();
        let mut m = incoming(Direction::Left, Color::Red);

        let mut result = CollisionResult::default();
        assert!(!tile.collide(&mut m, &mut result));
        assert!(result.inside_tile);
        assert!(tile.is_active());

        let mut result = CollisionResult::default();
        m.stop();
        assert!(!tile.collide(&mut m, &mut result));
        assert!(!result.inside_tile);
        assert!(!tile.is_active());
        assert!(!tile.grid().marble().active);
        assert!(m.active);
        assert_eq!(m.direction, Direction::Left);
        assert_eq!(m.color, Color::Red);
    }

    #[test]
    fn test_nested_ramp_changes_outgoing_direction() {
        let mut grid = Grid::new();
        grid.add_tile(IVec2::new(-1, 1), Tile::ramp(Direction::Right));
        let mut tile = RecursiveTile::new(grid, Color::White);
        let mut m = incoming(Direction::Left, Color::Blue);

        let mut result = CollisionResult::default();
        tile.collide(&mut m, &mut result);
        // onto the ramp
        assert!(!tile.collide(&mut m, &mut result));
        assert!(result.inside_tile);
        // off the nested grid
        assert!(!tile.collide(&mut m, &mut result));
        assert!(!result.inside_tile);
        assert_eq!(m.direction, Direction::Right);
    }

    #[test]
    fn test_nested_output_is_forwarded() {
        let mut grid = Grid::new();
        grid.add_tile(IVec2::new(1, 1), Tile::OutputValue);
        let mut tile = RecursiveTile::new(grid, Color::White);
        let mut m = incoming(Direction::Right, Color::Red);

        let mut result = CollisionResult::default();
        tile.collide(&mut m, &mut result);
        let mut result = CollisionResult::default();
        tile.collide(&mut m, &mut result);
        assert_eq!(result.output, Some(1));
    }

    #[test]
    fn test_nested_exit_keeps_marble_inside() {
        let mut grid = Grid::new();
        grid.add_tile(IVec2::new(1, 1), Tile::Exit);
        let mut tile = RecursiveTile::new(grid, Color::White);
        let mut m = incoming(Direction::Right, Color::Red);

        let mut result = CollisionResult::default();
        tile.collide(&mut m, &mut result);
        let mut result = CollisionResult::default();
        assert!(!tile.collide(&mut m, &mut result));
        assert!(result.inside_tile);
        assert!(tile.is_active());
    }

    #[test]
    fn test_nested_loop_recycles_inside() {
        let mut grid = Grid::new();
        grid.add_tile(IVec2::new(1, 1), Tile::looper(Color::Green));
        let mut tile = RecursiveTile::new(grid, Color::White);
        let mut m = incoming(Direction::Right, Color::Red);

        let mut result = CollisionResult::default();
        tile.collide(&mut m, &mut result);
        let mut result = CollisionResult::default();
        assert!(!tile.collide(&mut m, &mut result));
        assert!(result.marble_reset);
        assert!(result.inside_tile);
        let nested = tile.grid().marble();
        assert!(nested.active);
        assert_eq!(nested.pos, ORIGIN);
        assert_eq!(nested.color, Color::Green);
    }

    #[test]
    fn test_nested_boundary_turn_reaches_parent() {
        // gear bit next to the nested drop spins it, drop passes the turn outward
        let mut grid = Grid::new();
        grid.add_tile(IVec2::new(1, 1), Tile::gear_bit(Direction::Right));
        grid.add_tile(IVec2::new(1, 0), Tile::Gear);
        let mut tile = RecursiveTile::new(grid, Color::White);
        let mut m = incoming(Direction::Right, Color::Red);

        let mut result = CollisionResult::default();
        tile.collide(&mut m, &mut result);
        let mut result = CollisionResult::default();
        tile.collide(&mut m, &mut result);
        assert!(result.turn);
    }

    #[test]
    fn test_turn_spins_nested_gears() {
        let mut grid = Grid::new();
        grid.add_tile(IVec2::new(1, 0), Tile::Gear);
        grid.add_tile(IVec2::new(2, 0), Tile::gear_bit(Direction::Right));
        let mut tile = RecursiveTile::new(grid, Color::White);

        assert!(tile.turn());
        match tile.grid().get_tile(IVec2::new(2, 0)) {
            Some(Tile::GearBit(bit)) => assert_eq!(bit.current, Direction::Left),
            other => panic!("unexpected tile {other:?}"),
        }
    }

    #[test]
    fn test_reset_clears_nested_state() {
        let mut grid = Grid::new();
        grid.add_tile(IVec2::new(1, 1), Tile::bit(Direction::Right));
        let mut tile = RecursiveTile::new(grid, Color::White);
        let mut m = incoming(Direction::Right, Color::Red);
        let mut result = CollisionResult::default();
        tile.collide(&mut m, &mut result);
        tile.collide(&mut m, &mut result);

        tile.reset();
        assert!(!tile.is_active());
        assert!(!tile.grid().marble().active);
        assert_eq!(
            tile.grid().get_tile(IVec2::new(1, 1)),
            Some(&Tile::bit(Direction::Right))
        );
        assert_eq!(Tile::Recursive(tile).kind(), TileKind::Recursive);
    }

    #[test]
    fn test_color_band_cycles() {
        let mut tile = RecursiveTile::default();
        assert_eq!(tile.color(), Color::White);
        tile.cycle_color();
        assert_eq!(tile.color(), Color::Red);
        for _ in 0..6 {
            tile.cycle_color();
        }
        assert_eq!(tile.color(), Color::White);
    }
}
