//! Cell queries for renderers
//!
//! Renderers never touch tiles directly: they ask for a [`Cell`] at a world
//! coordinate and draw whatever glyph comes back.

use glam::IVec2;

use crate::sim::{Color, Glyph, Grid};

/// What occupies a world coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Tile glyph, `None` for an empty cell
    pub glyph: Option<Glyph>,
    /// The active marble sits here
    pub marble: bool,
}

impl Cell {
    /// Character to draw: marble, tile, or the checkerboard dot
    pub fn display_char(&self, pos: IVec2) -> char {
        if self.marble {
            return '@';
        }
        match self.glyph {
            Some(glyph) => glyph.ch,
            None if is_odd(pos) => ' ',
            None => '.',
        }
    }
}

/// Checkerboard parity of a cell, well defined for negative coordinates
pub fn is_odd(pos: IVec2) -> bool {
    (pos.x.rem_euclid(2) ^ pos.y.rem_euclid(2)) == 1
}

impl Grid {
    pub fn cell(&self, pos: IVec2) -> Cell {
        Cell {
            glyph: self.get_tile(pos).map(|tile| tile.glyph()),
            marble: self.marble().is_at(pos),
        }
    }

    /// Glyph of the marble, drawn in its own color
    pub fn marble_glyph(&self) -> Glyph {
        Glyph::new('@', self.marble().color.code())
    }
}

/// A screen-sized window onto the grid, centered on `center`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
    pub center: IVec2,
}

impl Viewport {
    pub fn new(width: i32, height: i32, center: IVec2) -> Self {
        Self {
            width,
            height,
            center,
        }
    }

    /// World coordinate under screen cell `(sx, sy)`
    pub fn to_world(&self, screen: IVec2) -> IVec2 {
        self.center + screen - IVec2::new(self.width / 2, self.height / 2)
    }

    /// Plain-text rows of the visible area
    pub fn render(&self, grid: &Grid) -> Vec<String> {
        (0..self.height)
            .map(|sy| {
                (0..self.width)
                    .map(|sx| {
                        let pos = self.to_world(IVec2::new(sx, sy));
                        grid.cell(pos).display_char(pos)
                    })
                    .collect()
            })
            .collect()
    }

    /// Rows with ANSI 16-color escapes
    pub fn render_ansi(&self, grid: &Grid) -> Vec<String> {
        (0..self.height)
            .map(|sy| {
                let mut row = String::new();
                for sx in 0..self.width {
                    let pos = self.to_world(IVec2::new(sx, sy));
                    let cell = grid.cell(pos);
                    let glyph = if cell.marble {
                        grid.marble_glyph()
                    } else {
                        cell.glyph
                            .unwrap_or(Glyph::new(cell.display_char(pos), Color::Black.bright()))
                    };
                    row.push_str(&ansi(glyph));
                }
                row.push_str("\x1b[0m");
                row
            })
            .collect()
    }
}

fn ansi(glyph: Glyph) -> String {
    let fg = if glyph.fg < 8 { 30 + glyph.fg } else { 90 + glyph.fg - 8 };
    let bg = if glyph.bg < 8 { 40 + glyph.bg } else { 100 + glyph.bg - 8 };
    format!("\x1b[{fg};{bg}m{}", glyph.ch)
}
