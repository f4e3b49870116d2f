//! Save/load of grids
//!
//! Features:
//! - Line-oriented text format (see [`text`])
//! - Nested grids inline between braces
//! - Discard-on-failure loading: a bad file never yields a partial grid

pub mod text;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::consts::FILE_EXTENSION;
use crate::error::LoadError;
use crate::sim::Grid;

pub use text::{from_str, to_string};

/// Write `grid` to `path`
pub fn save(grid: &Grid, path: &Path) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    grid.serialize(&mut out)?;
    out.flush()?;
    log::info!("Saved {} tiles to {}", grid.len(), path.display());
    Ok(())
}

/// Save under `name` with the save-file extension appended
pub fn save_with_extension(grid: &Grid, name: &str) -> std::io::Result<PathBuf> {
    let path = PathBuf::from(format!("{name}.{FILE_EXTENSION}"));
    save(grid, &path)?;
    Ok(path)
}

/// Read a grid from `path`
pub fn load(path: &Path, max_depth: usize) -> Result<Grid, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    let grid = Grid::deserialize(reader, max_depth)?;
    log::info!("Loaded {} tiles from {}", grid.len(), path.display());
    Ok(grid)
}
