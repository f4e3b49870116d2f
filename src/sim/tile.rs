//! Tile behavior
//!
//! Every mechanism shares one contract:
//! - `collide`: the marble just entered the cell
//! - `turn`: a gear train reached the cell during flood fill
//! - `interact`: user toggle (or the menu blink)
//! - `reset`: restore tick-derived state before a run
//!
//! Configuration (a ramp's bias, a loop's color) survives `reset`, phase does not.

use super::grid::Grid;
use super::marble::{Color, Direction, Marble};
use super::recursive::RecursiveTile;

/// Everything a collision or a turn reports back to the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResult {
    /// Emitted bit, if any
    pub output: Option<u8>,
    /// The marble was restarted by a loop
    pub marble_reset: bool,
    /// Flood-fill rotation requested at the collision cell
    pub turn: bool,
    /// Rotation reached a boundary tile and should continue in the parent grid
    pub turn_parent: bool,
    /// The marble now lives inside a nested grid
    pub inside_tile: bool,
    /// An exit tile was hit
    pub exit_tile: bool,
}

impl CollisionResult {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A drawable character with 16-color terminal codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub fg: u8,
    pub bg: u8,
}

impl Glyph {
    pub fn new(ch: char, fg: u8) -> Self {
        Self {
            ch,
            fg,
            bg: Color::Black.code(),
        }
    }
}

/// Fieldless tile discriminant, also the save-file vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Drop,
    OutputValue,
    OutputDirection,
    Exit,
    Loop,
    Ramp,
    Cross,
    Bit,
    Gear,
    GearBit,
    Recursive,
}

impl TileKind {
    /// Placeable tiles in tool-menu order (the origin drop is never placed by hand)
    pub const PALETTE: [TileKind; 10] = [
        TileKind::Ramp,
        TileKind::Bit,
        TileKind::GearBit,
        TileKind::Cross,
        TileKind::Gear,
        TileKind::OutputValue,
        TileKind::OutputDirection,
        TileKind::Exit,
        TileKind::Loop,
        TileKind::Recursive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Drop => "Drop",
            TileKind::OutputValue => "OutputValue",
            TileKind::OutputDirection => "OutputDirection",
            TileKind::Exit => "Exit",
            TileKind::Loop => "Loop",
            TileKind::Ramp => "Ramp",
            TileKind::Cross => "Cross",
            TileKind::Bit => "Bit",
            TileKind::Gear => "Gear",
            TileKind::GearBit => "GearBit",
            TileKind::Recursive => "Grid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Drop" => Some(TileKind::Drop),
            "OutputValue" => Some(TileKind::OutputValue),
            "OutputDirection" => Some(TileKind::OutputDirection),
            "Exit" => Some(TileKind::Exit),
            "Loop" => Some(TileKind::Loop),
            "Ramp" => Some(TileKind::Ramp),
            "Cross" => Some(TileKind::Cross),
            "Bit" => Some(TileKind::Bit),
            "Gear" => Some(TileKind::Gear),
            "GearBit" => Some(TileKind::GearBit),
            "Grid" => Some(TileKind::Recursive),
            _ => None,
        }
    }

    /// Menu slot lookup, `None` past the end of the palette
    pub fn from_palette(index: usize) -> Option<Self> {
        Self::PALETTE.get(index).copied()
    }
}

/// Restarts the marble at the top with a stored color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTile {
    pub color: Color,
}

impl Default for LoopTile {
    fn default() -> Self {
        Self { color: Color::Blue }
    }
}

impl LoopTile {
    /// Blue → red → green → blue
    pub fn cycle_color(&mut self) {
        self.color = match self.color {
            Color::Blue => Color::Red,
            Color::Red => Color::Green,
            _ => Color::Blue,
        };
    }
}

/// Fixed deflector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampTile {
    pub direction: Direction,
}

impl Default for RampTile {
    fn default() -> Self {
        Self {
            direction: Direction::Right,
        }
    }
}

/// Flip-flop deflector shared by `Bit` and `GearBit`.
///
/// `direction` is the configured bias, `current` the live phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitTile {
    pub direction: Direction,
    pub current: Direction,
}

impl Default for BitTile {
    fn default() -> Self {
        Self::new(Direction::Right)
    }
}

impl BitTile {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            current: direction,
        }
    }

    /// Deflect the marble along the current phase, then flip
    fn deflect(&mut self, marble: &mut Marble) {
        marble.direction = self.current;
        self.current = self.current.flipped();
    }

    fn flip(&mut self) {
        self.current = self.current.flipped();
    }

    fn toggle(&mut self) {
        self.direction = self.direction.flipped();
        self.current = self.direction;
    }

    fn reset(&mut self) {
        self.current = self.direction;
    }
}

/// A mechanism occupying one grid cell
#[derive(Debug, Clone, PartialEq)]
pub enum Tile {
    Drop,
    OutputValue,
    OutputDirection,
    Exit,
    Loop(LoopTile),
    Ramp(RampTile),
    Cross,
    Bit(BitTile),
    Gear,
    GearBit(BitTile),
    Recursive(RecursiveTile),
}

impl Tile {
    /// Fresh tile of the given kind with default configuration
    pub fn new(kind: TileKind) -> Self {
        match kind {
            TileKind::Drop => Tile::Drop,
            TileKind::OutputValue => Tile::OutputValue,
            TileKind::OutputDirection => Tile::OutputDirection,
            TileKind::Exit => Tile::Exit,
            TileKind::Loop => Tile::Loop(LoopTile::default()),
            TileKind::Ramp => Tile::Ramp(RampTile::default()),
            TileKind::Cross => Tile::Cross,
            TileKind::Bit => Tile::Bit(BitTile::default()),
            TileKind::Gear => Tile::Gear,
            TileKind::GearBit => Tile::GearBit(BitTile::default()),
            TileKind::Recursive => Tile::Recursive(RecursiveTile::default()),
        }
    }

    pub fn ramp(direction: Direction) -> Self {
        Tile::Ramp(RampTile { direction })
    }

    pub fn bit(direction: Direction) -> Self {
        Tile::Bit(BitTile::new(direction))
    }

    pub fn gear_bit(direction: Direction) -> Self {
        Tile::GearBit(BitTile::new(direction))
    }

    pub fn looper(color: Color) -> Self {
        Tile::Loop(LoopTile { color })
    }

    pub fn recursive(grid: Grid, color: Color) -> Self {
        Tile::Recursive(RecursiveTile::new(grid, color))
    }

    pub fn kind(&self) -> TileKind {
        match self {
            Tile::Drop => TileKind::Drop,
            Tile::OutputValue => TileKind::OutputValue,
            Tile::OutputDirection => TileKind::OutputDirection,
            Tile::Exit => TileKind::Exit,
            Tile::Loop(_) => TileKind::Loop,
            Tile::Ramp(_) => TileKind::Ramp,
            Tile::Cross => TileKind::Cross,
            Tile::Bit(_) => TileKind::Bit,
            Tile::Gear => TileKind::Gear,
            Tile::GearBit(_) => TileKind::GearBit,
            Tile::Recursive(_) => TileKind::Recursive,
        }
    }

    /// The marble just entered this cell. Returns true when the tick is finished.
    pub fn collide(&mut self, marble: &mut Marble, result: &mut CollisionResult) -> bool {
        match self {
            Tile::Drop | Tile::Cross | Tile::Gear => false,
            Tile::OutputValue => {
                result.output = marble.value();
                false
            }
            Tile::OutputDirection => {
                result.output = Some(match marble.direction {
                    Direction::Right => 1,
                    Direction::Left => 0,
                });
                false
            }
            Tile::Exit => {
                result.exit_tile = true;
                true
            }
            Tile::Loop(tile) => {
                result.marble_reset = true;
                marble.start(marble.direction, tile.color);
                true
            }
            Tile::Ramp(tile) => {
                marble.direction = tile.direction;
                false
            }
            Tile::Bit(tile) => {
                tile.deflect(marble);
                false
            }
            Tile::GearBit(tile) => {
                tile.deflect(marble);
                result.turn = true;
                false
            }
            Tile::Recursive(tile) => tile.collide(marble, result),
        }
    }

    /// Rotation reached this cell. Returns true if it should spread to the neighbors.
    pub fn turn(&mut self, result: &mut CollisionResult) -> bool {
        match self {
            Tile::Drop | Tile::Exit => {
                result.turn_parent = true;
                false
            }
            Tile::Gear => true,
            Tile::GearBit(tile) => {
                tile.flip();
                true
            }
            Tile::Recursive(tile) => tile.turn(),
            _ => false,
        }
    }

    pub fn interact(&mut self) {
        match self {
            Tile::Loop(tile) => tile.cycle_color(),
            Tile::Ramp(tile) => tile.direction = tile.direction.flipped(),
            Tile::Bit(tile) | Tile::GearBit(tile) => tile.toggle(),
            Tile::Recursive(tile) => tile.cycle_color(),
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        match self {
            Tile::Bit(tile) | Tile::GearBit(tile) => tile.reset(),
            Tile::Recursive(tile) => tile.reset(),
            _ => {}
        }
    }

    pub fn nested_grid(&self) -> Option<&Grid> {
        match self {
            Tile::Recursive(tile) => Some(tile.grid()),
            _ => None,
        }
    }

    pub fn nested_grid_mut(&mut self) -> Option<&mut Grid> {
        match self {
            Tile::Recursive(tile) => Some(tile.grid_mut()),
            _ => None,
        }
    }

    /// True for a recursive tile currently holding a marble
    pub fn holds_marble(&self) -> bool {
        matches!(self, Tile::Recursive(tile) if tile.is_active())
    }

    pub fn glyph(&self) -> Glyph {
        let slash = |d: Direction| if d == Direction::Right { '\\' } else { '/' };
        match self {
            Tile::Drop => Glyph::new('^', Color::White.code()),
            Tile::OutputValue => Glyph::new('v', Color::White.code()),
            Tile::OutputDirection => Glyph::new('w', Color::White.code()),
            Tile::Exit => Glyph::new('=', Color::Red.bright()),
            Tile::Loop(tile) => Glyph::new('Y', tile.color.code()),
            Tile::Ramp(tile) => Glyph::new(slash(tile.direction), Color::Green.bright()),
            Tile::Cross => Glyph::new('x', Color::White.code()),
            Tile::Bit(tile) => Glyph::new(slash(tile.current), Color::Cyan.code()),
            Tile::Gear => Glyph::new('+', Color::Red.bright()),
            Tile::GearBit(tile) => Glyph::new(slash(tile.current), Color::Magenta.code()),
            Tile::Recursive(tile) => Glyph::new('#', tile.color().code()),
        }
    }
}
