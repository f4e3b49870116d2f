//! Text save format
//!
//! One tile per line, `X Y Type [args]`. Nested grids open with
//! `X Y Grid <color> {` and close with a line holding only `}`:
//!
//! ```text
//! 0 0 Drop
//! 1 1 Ramp -1
//! -1 1 Grid 3 {
//! 0 0 Drop
//! 1 1 GearBit 1
//! }
//! ```

use std::fmt;
use std::io::{self, BufRead, Write};

use glam::IVec2;

use crate::error::{LoadError, ParseError, ParseErrorKind};
use crate::sim::{Color, Direction, Grid, Tile, TileKind};

/// The save-file text of a grid, nested grids included
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<(IVec2, &Tile)> = self.tiles().collect();
        entries.sort_by_key(|(pos, _)| (pos.y, pos.x));

        for (pos, tile) in entries {
            write!(f, "{} {} {}", pos.x, pos.y, tile.kind().as_str())?;
            match tile {
                Tile::Loop(tile) => writeln!(f, " {}", tile.color.code())?,
                Tile::Ramp(tile) => writeln!(f, " {}", tile.direction.as_i32())?,
                Tile::Bit(tile) | Tile::GearBit(tile) => {
                    writeln!(f, " {}", tile.direction.as_i32())?
                }
                Tile::Recursive(tile) => {
                    writeln!(f, " {} {{", tile.color().code())?;
                    write!(f, "{}", tile.grid())?;
                    writeln!(f, "}}")?;
                }
                _ => writeln!(f)?,
            }
        }
        Ok(())
    }
}

impl Grid {
    /// Write this grid in save-file form
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }

    /// Read a complete grid. Nothing is returned unless every line parses.
    pub fn deserialize<R: BufRead>(reader: R, max_depth: usize) -> Result<Grid, LoadError> {
        let lines = reader.lines().collect::<io::Result<Vec<_>>>()?;
        let mut parser = Parser::new(&lines, max_depth);
        Ok(parser.grid(0, 0)?)
    }

    /// Replace this grid with one read from `reader`, leaving it untouched on failure
    pub fn load<R: BufRead>(&mut self, reader: R, max_depth: usize) -> Result<(), LoadError> {
        *self = Grid::deserialize(reader, max_depth)?;
        Ok(())
    }
}

/// Render a grid to a string
pub fn to_string(grid: &Grid) -> String {
    grid.to_string()
}

/// Parse a grid from a string
pub fn from_str(text: &str, max_depth: usize) -> Result<Grid, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    Parser::new(&lines, max_depth).grid(0, 0)
}

struct Parser<'a, S> {
    lines: &'a [S],
    next: usize,
    max_depth: usize,
}

impl<'a, S: AsRef<str>> Parser<'a, S> {
    fn new(lines: &'a [S], max_depth: usize) -> Self {
        Self {
            lines,
            next: 0,
            max_depth,
        }
    }

    /// Parse entries until end of input (root) or a closing brace (nested).
    /// `opened_at` is the line of the `Grid ... {` entry for nested grids.
    fn grid(&mut self, depth: usize, opened_at: usize) -> Result<Grid, ParseError> {
        let mut grid = Grid::new();
        let lines = self.lines;

        while let Some(line) = lines.get(self.next) {
            self.next += 1;
            let number = self.next;
            let line = line.as_ref().trim();

            if line.is_empty() {
                continue;
            }
            if line == "}" {
                if depth == 0 {
                    return Err(ParseError::new(number, ParseErrorKind::UnexpectedCloseBrace));
                }
                return Ok(grid);
            }

            let (pos, tile) = self.entry(line, number, depth)?;
            grid.add_tile(pos, tile);
        }

        if depth > 0 {
            return Err(ParseError::new(opened_at, ParseErrorKind::MissingCloseBrace));
        }
        Ok(grid)
    }

    fn entry(&mut self, line: &str, number: usize, depth: usize) -> Result<(IVec2, Tile), ParseError> {
        let err = |kind| ParseError::new(number, kind);
        let mut fields = line.split_whitespace();

        let x = int(fields.next(), "x coordinate").map_err(err)?;
        let y = int(fields.next(), "y coordinate").map_err(err)?;
        let name = fields
            .next()
            .ok_or(ParseErrorKind::MissingField("tile type"))
            .map_err(err)?;
        let kind = TileKind::from_str(name)
            .ok_or_else(|| ParseErrorKind::UnknownTile(name.to_string()))
            .map_err(err)?;

        let tile = match kind {
            TileKind::Drop => Tile::Drop,
            TileKind::OutputValue => Tile::OutputValue,
            TileKind::OutputDirection => Tile::OutputDirection,
            TileKind::Exit => Tile::Exit,
            TileKind::Cross => Tile::Cross,
            TileKind::Gear => Tile::Gear,
            TileKind::Loop => Tile::looper(color(fields.next()).map_err(err)?),
            TileKind::Ramp => Tile::ramp(direction(fields.next()).map_err(err)?),
            TileKind::Bit => Tile::bit(direction(fields.next()).map_err(err)?),
            TileKind::GearBit => Tile::gear_bit(direction(fields.next()).map_err(err)?),
            TileKind::Recursive => {
                let band = color(fields.next()).map_err(err)?;
                match fields.next() {
                    Some("{") => {}
                    Some(other) => {
                        return Err(err(ParseErrorKind::TrailingInput(other.to_string())));
                    }
                    None => return Err(err(ParseErrorKind::MissingField("`{`"))),
                }
                if let Some(extra) = fields.next() {
                    return Err(err(ParseErrorKind::TrailingInput(extra.to_string())));
                }
                if depth + 1 > self.max_depth {
                    return Err(err(ParseErrorKind::TooDeep {
                        limit: self.max_depth,
                    }));
                }
                let nested = self.grid(depth + 1, number)?;
                return Ok((IVec2::new(x, y), Tile::recursive(nested, band)));
            }
        };

        if let Some(extra) = fields.next() {
            return Err(err(ParseErrorKind::TrailingInput(extra.to_string())));
        }
        Ok((IVec2::new(x, y), tile))
    }
}

fn int(field: Option<&str>, name: &'static str) -> Result<i32, ParseErrorKind> {
    let value = field.ok_or(ParseErrorKind::MissingField(name))?;
    value.parse().map_err(|_| ParseErrorKind::InvalidNumber {
        field: name,
        value: value.to_string(),
    })
}

fn direction(field: Option<&str>) -> Result<Direction, ParseErrorKind> {
    int(field, "direction").map(Direction::from_i32)
}

fn color(field: Option<&str>) -> Result<Color, ParseErrorKind> {
    let code = int(field, "color")?;
    Color::from_code(i64::from(code)).ok_or(ParseErrorKind::InvalidColor(i64::from(code)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_NESTING_DEPTH, ORIGIN};
    use proptest::prelude::*;

    fn sample() -> Grid {
        let mut inner = Grid::new();
        inner.add_tile(IVec2::new(1, 1), Tile::gear_bit(Direction::Left));
        inner.add_tile(IVec2::new(2, 2), Tile::Exit);

        let mut grid = Grid::new();
        grid.add_tile(IVec2::new(-1, 1), Tile::ramp(Direction::Left));
        grid.add_tile(IVec2::new(1, 1), Tile::bit(Direction::Right));
        grid.add_tile(IVec2::new(0, 2), Tile::recursive(inner, Color::Yellow));
        grid.add_tile(IVec2::new(0, 3), Tile::looper(Color::Red));
        grid.add_tile(IVec2::new(-5, 3), Tile::OutputDirection);
        grid
    }

    #[test]
    fn test_serialize_format() {
        let text = to_string(&sample());
        let expected = "\
0 0 Drop
-1 1 Ramp -1
1 1 Bit 1
0 2 Grid 3 {
0 0 Drop
1 1 GearBit -1
2 2 Exit
}
-5 3 OutputDirection
0 3 Loop 1
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_serialize_writer_matches_display() {
        let grid = sample();
        let mut buf = Vec::new();
        grid.serialize(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), grid.to_string());
        assert_eq!(to_string(&grid), format!("{grid}"));
    }

    #[test]
    fn test_round_trip_keeps_configuration() {
        let grid = sample();
        let loaded = from_str(&to_string(&grid), MAX_NESTING_DEPTH).unwrap();
        assert_eq!(loaded, grid);
    }

    #[test]
    fn test_phase_does_not_survive() {
        let mut grid = Grid::new();
        grid.add_tile(IVec2::new(1, 1), Tile::bit(Direction::Right));
        grid.add_marble(Direction::Right, Color::Blue);
        let mut result = crate::sim::CollisionResult::default();
        grid.update(&mut result);

        let loaded = from_str(&to_string(&grid), MAX_NESTING_DEPTH).unwrap();
        assert_eq!(loaded.get_tile(IVec2::new(1, 1)), Some(&Tile::bit(Direction::Right)));
        assert!(!loaded.marble().active);
    }

    #[test]
    fn test_origin_seeded_without_entry() {
        let grid = from_str("2 2 Cross\n", MAX_NESTING_DEPTH).unwrap();
        assert_eq!(grid.get_tile(ORIGIN), Some(&Tile::Drop));
        assert_eq!(grid.len(), 2);

        let empty = from_str("", MAX_NESTING_DEPTH).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_blank_lines_and_spacing() {
        let grid = from_str("\n  3   -4   Ramp   1  \n\n", MAX_NESTING_DEPTH).unwrap();
        assert_eq!(grid.get_tile(IVec2::new(3, -4)), Some(&Tile::ramp(Direction::Right)));
    }

    #[test]
    fn test_unknown_tile_fails() {
        let err = from_str("0 0 Drop\n1 1 Spring\n", MAX_NESTING_DEPTH).unwrap_err();
        assert_eq!(err, ParseError::new(2, ParseErrorKind::UnknownTile("Spring".into())));
    }

    #[test]
    fn test_malformed_fields_fail() {
        let cases = [
            ("x 1 Drop", ParseErrorKind::InvalidNumber { field: "x coordinate", value: "x".into() }),
            ("1", ParseErrorKind::MissingField("y coordinate")),
            ("1 1", ParseErrorKind::MissingField("tile type")),
            ("1 1 Ramp", ParseErrorKind::MissingField("direction")),
            ("1 1 Loop 9", ParseErrorKind::InvalidColor(9)),
            ("1 1 Gear 2", ParseErrorKind::TrailingInput("2".into())),
            ("1 1 Grid 2", ParseErrorKind::MissingField("`{`")),
            ("}", ParseErrorKind::UnexpectedCloseBrace),
        ];
        for (text, kind) in cases {
            assert_eq!(from_str(text, MAX_NESTING_DEPTH), Err(ParseError::new(1, kind)), "{text}");
        }
    }

    #[test]
    fn test_missing_close_brace() {
        let err = from_str("0 0 Drop\n1 1 Grid 7 {\n0 1 Gear\n", MAX_NESTING_DEPTH).unwrap_err();
        assert_eq!(err, ParseError::new(2, ParseErrorKind::MissingCloseBrace));
    }

    #[test]
    fn test_depth_limit() {
        let mut text = String::new();
        for _ in 0..3 {
            text.push_str("0 1 Grid 7 {\n");
        }
        for _ in 0..3 {
            text.push_str("}\n");
        }
        assert_eq!(from_str(&text, 3).map(|g| g.depth()), Ok(3));
        assert_eq!(
            from_str(&text, 2),
            Err(ParseError::new(3, ParseErrorKind::TooDeep { limit: 2 }))
        );
    }

    #[test]
    fn test_failed_load_leaves_grid_untouched() {
        let mut grid = sample();
        let before = grid.clone();
        let result = grid.load("0 1 Gear\n1 1 Bogus\n".as_bytes(), MAX_NESTING_DEPTH);
        assert!(matches!(result, Err(LoadError::Parse(_))));
        assert_eq!(grid, before);

        grid.load("4 4 Cross\n".as_bytes(), MAX_NESTING_DEPTH).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.get_tile(IVec2::new(4, 4)), Some(&Tile::Cross));
        assert_eq!(grid.get_tile(IVec2::new(1, 1)), None);
    }

    fn arb_tile() -> impl Strategy<Value = Tile> {
        let dir = prop_oneof![Just(Direction::Left), Just(Direction::Right)];
        let color = (0i64..8).prop_map(|c| Color::from_code(c).unwrap_or_default());
        let leaf = prop_oneof![
            Just(Tile::OutputValue),
            Just(Tile::OutputDirection),
            Just(Tile::Exit),
            Just(Tile::Cross),
            Just(Tile::Gear),
            color.clone().prop_map(Tile::looper),
            dir.clone().prop_map(Tile::ramp),
            dir.clone().prop_map(Tile::bit),
            dir.prop_map(Tile::gear_bit),
        ];
        leaf.prop_recursive(3, 24, 6, move |inner| {
            (
                prop::collection::vec(((-6i32..6, -6i32..6), inner), 0..6),
                0i64..8,
            )
                .prop_map(|(cells, code)| {
                    let mut grid = Grid::new();
                    for ((x, y), tile) in cells {
                        grid.add_tile(IVec2::new(x, y), tile);
                    }
                    Tile::recursive(grid, Color::from_code(code).unwrap_or_default())
                })
        })
    }

    proptest! {
        #[test]
        fn prop_round_trip(cells in prop::collection::vec(((-20i32..20, -20i32..20), arb_tile()), 0..30)) {
            let mut grid = Grid::new();
            for ((x, y), tile) in cells {
                grid.add_tile(IVec2::new(x, y), tile);
            }
            let loaded = from_str(&to_string(&grid), MAX_NESTING_DEPTH).unwrap();
            prop_assert_eq!(loaded, grid);
        }
    }
}
