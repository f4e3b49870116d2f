//! Logger setup for the `tumble-sim` binary
//!
//! The engine only talks to the `log` facade. Run lifecycle and file I/O log
//! at info, per-tick marble movement at debug and trace, so `--verbose` is
//! the switch for watching a machine work. `RUST_LOG` takes precedence, e.g.
//! `RUST_LOG=tumble_sim::sim=trace`.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Level used when `RUST_LOG` is unset
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    // a second install (tests, embedding) keeps the first logger
    let _ = Builder::from_env(env).format_timestamp(None).try_init();
}
