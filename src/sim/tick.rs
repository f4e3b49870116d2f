//! Headless run driver
//!
//! Feeds a tape of input marbles through a grid one tick at a time and
//! collects the bits the machine emits. Pacing is the caller's business:
//! call [`Run::tick`] as often as you like.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::marble::{Color, Direction};
use super::tile::CollisionResult;
use crate::error::RunError;
use crate::settings::Settings;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    /// Not started yet
    #[default]
    Idle,
    /// Marbles are falling
    Running,
    /// Input tape exhausted (or aborted), grid reset
    Finished,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Emitted bits in order
    pub outputs: Vec<u8>,
    /// Grid updates performed
    pub ticks: u64,
}

impl RunReport {
    /// Outputs as a string of `0`/`1`
    pub fn bits(&self) -> String {
        self.outputs
            .iter()
            .map(|b| if *b > 0 { '1' } else { '0' })
            .collect()
    }
}

/// A tape of input marbles being run through a grid
#[derive(Debug, Clone)]
pub struct Run {
    inputs: VecDeque<bool>,
    outputs: Vec<u8>,
    ticks: u64,
    max_ticks: u64,
    phase: RunPhase,
}

impl Run {
    pub fn new(inputs: impl IntoIterator<Item = bool>, max_ticks: u64) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
            outputs: Vec::new(),
            ticks: 0,
            max_ticks,
            phase: RunPhase::Idle,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn outputs(&self) -> &[u8] {
        &self.outputs
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Input marbles not yet released
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }

    /// Reset the grid and release the first marble
    pub fn start(&mut self, grid: &mut Grid) -> Result<(), RunError> {
        if self.inputs.is_empty() {
            return Err(RunError::NoInput);
        }
        grid.reset();
        self.outputs.clear();
        self.ticks = 0;
        self.phase = RunPhase::Running;
        log::info!("run started with {} input marbles", self.inputs.len());
        self.release_next(grid);
        Ok(())
    }

    /// One driver tick. Updates repeat while the marble is inside a nested
    /// grid so nested machines run at full speed.
    pub fn tick(&mut self, grid: &mut Grid) -> Result<RunPhase, RunError> {
        if self.phase != RunPhase::Running {
            return Ok(self.phase);
        }

        loop {
            if self.ticks >= self.max_ticks {
                self.stop(grid);
                log::warn!("run aborted after {} ticks", self.ticks);
                return Err(RunError::TickLimit {
                    limit: self.max_ticks,
                });
            }
            self.ticks += 1;

            let mut result = CollisionResult::default();
            let finished = grid.update(&mut result);

            if let Some(bit) = result.output {
                log::debug!("output {bit}");
                self.outputs.push(bit);
            }
            if finished {
                self.release_next(grid);
                break;
            }
            if !result.inside_tile {
                break;
            }
        }

        Ok(self.phase)
    }

    /// Abort the run, clearing the marble and tile phases
    pub fn stop(&mut self, grid: &mut Grid) {
        grid.reset();
        self.phase = RunPhase::Finished;
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            outputs: self.outputs.clone(),
            ticks: self.ticks,
        }
    }

    fn release_next(&mut self, grid: &mut Grid) {
        match self.inputs.pop_front() {
            Some(bit) => {
                log::debug!("releasing marble {}", u8::from(bit));
                grid.add_marble(Direction::from_bit(bit), Color::from_bit(bit));
            }
            None => {
                grid.reset();
                self.phase = RunPhase::Finished;
                log::info!(
                    "run finished after {} ticks with {} outputs",
                    self.ticks,
                    self.outputs.len()
                );
            }
        }
    }
}

/// Run a whole input tape through `grid`
pub fn run_to_completion(
    grid: &mut Grid,
    inputs: impl IntoIterator<Item = bool>,
    settings: &Settings,
) -> Result<RunReport, RunError> {
    let mut run = Run::new(inputs, settings.max_ticks);
    run.start(grid)?;
    while run.tick(grid)? == RunPhase::Running {}
    Ok(run.report())
}
