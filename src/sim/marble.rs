//! The falling marble and the values it carries

use glam::IVec2;

use crate::consts::ORIGIN;

/// Horizontal drift of a marble, one column per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl Direction {
    /// Any non-negative value is `Right`, anything below zero is `Left`
    pub fn from_i32(value: i32) -> Self {
        if value >= 0 { Direction::Right } else { Direction::Left }
    }

    /// Signed column step (-1 or +1), also the persisted encoding
    pub fn as_i32(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Input bit convention: 1 rolls right, 0 rolls left
    pub fn from_bit(bit: bool) -> Self {
        if bit { Direction::Right } else { Direction::Left }
    }
}

/// Terminal palette. The numeric code is what save files store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    #[default]
    White,
}

impl Color {
    pub const ALL: [Color; 8] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
    ];

    pub fn code(self) -> u8 {
        match self {
            Color::Black => 0,
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Blue => 4,
            Color::Magenta => 5,
            Color::Cyan => 6,
            Color::White => 7,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    /// Bright variant of this color as a 16-color terminal code
    pub fn bright(self) -> u8 {
        self.code() + 8
    }

    /// Bit encoded by a marble of this color: blue is 0, red is 1
    pub fn value(self) -> Option<u8> {
        match self {
            Color::Blue => Some(0),
            Color::Red => Some(1),
            _ => None,
        }
    }

    /// Input bit convention: 1 is red, 0 is blue
    pub fn from_bit(bit: bool) -> Self {
        if bit { Color::Red } else { Color::Blue }
    }
}

/// The single marble a grid simulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Marble {
    pub pos: IVec2,
    pub direction: Direction,
    pub color: Color,
    pub active: bool,
}

impl Marble {
    /// Release the marble from the origin
    pub fn start(&mut self, direction: Direction, color: Color) {
        self.active = true;
        self.direction = direction;
        self.color = color;
        self.pos = ORIGIN;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Fall one row while drifting one column
    pub fn advance(&mut self) {
        self.pos += IVec2::new(self.direction.as_i32(), 1);
    }

    pub fn value(&self) -> Option<u8> {
        self.color.value()
    }

    pub fn is_at(&self, pos: IVec2) -> bool {
        self.active && self.pos == pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_i32() {
        assert_eq!(Direction::from_i32(5), Direction::Right);
        assert_eq!(Direction::from_i32(0), Direction::Right);
        assert_eq!(Direction::from_i32(-1), Direction::Left);
        assert_eq!(Direction::Left.flipped(), Direction::Right);
    }

    #[test]
    fn test_color_values() {
        assert_eq!(Color::Blue.value(), Some(0));
        assert_eq!(Color::Red.value(), Some(1));
        assert_eq!(Color::Green.value(), None);
        assert_eq!(Color::White.value(), None);
    }

    #[test]
    fn test_color_codes() {
        for color in Color::ALL {
            assert_eq!(Color::from_code(color.code() as i64), Some(color));
        }
        assert_eq!(Color::from_code(8), None);
        assert_eq!(Color::from_code(-1), None);
    }

    #[test]
    fn test_marble_advance() {
        let mut marble = Marble::default();
        marble.start(Direction::Left, Color::Blue);
        marble.advance();
        assert_eq!(marble.pos, IVec2::new(-1, 1));

        marble.direction = Direction::Right;
        marble.advance();
        assert_eq!(marble.pos, IVec2::new(0, 2));
        assert!(marble.is_at(IVec2::new(0, 2)));

        marble.stop();
        assert!(!marble.is_at(IVec2::new(0, 2)));
    }
}
