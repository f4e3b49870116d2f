//! Tumble Sim - a marble-computer puzzle engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tiles, grid update, gear flood fill, nested grids)
//! - `persistence`: Text save format for grids
//! - `view`: Per-cell query and viewport mapping for renderers
//! - `settings`: Run limits and loader configuration
//! - `logging`: `env_logger` setup used by the binary

pub mod error;
pub mod logging;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod view;

pub use error::{LoadError, ParseError, ParseErrorKind, RunError};
pub use settings::Settings;

/// Engine constants
pub mod consts {
    use glam::IVec2;

    /// Where marbles are released and the mandatory drop sits
    pub const ORIGIN: IVec2 = IVec2::ZERO;

    /// Deepest nesting the loader accepts by default
    pub const MAX_NESTING_DEPTH: usize = 32;

    /// Default ceiling on grid updates for a single run
    pub const DEFAULT_MAX_TICKS: u64 = 100_000;

    /// Save file extension
    pub const FILE_EXTENSION: &str = "ttsim";
}
