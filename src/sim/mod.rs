//! Deterministic simulation module
//!
//! All machine logic lives here. This module must be pure and deterministic:
//! - One marble per grid, advanced one cell per tick
//! - Fixed flood-fill neighbor order
//! - No rendering, I/O or timing dependencies

pub mod grid;
pub mod marble;
pub mod recursive;
pub mod tick;
pub mod tile;

pub use grid::Grid;
pub use marble::{Color, Direction, Marble};
pub use recursive::RecursiveTile;
pub use tick::{Run, RunPhase, RunReport, run_to_completion};
pub use tile::{BitTile, CollisionResult, Glyph, LoopTile, RampTile, Tile, TileKind};
