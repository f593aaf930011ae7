//! Fixed-timestep accumulator.

use crate::config::ClockConfig;

/// One fixed step handed to every pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
}

/// Converts variable frame times into whole `dt` steps. Frames longer than
/// `max_frame` are truncated so a stall cannot snowball into ever longer catch-ups.
#[derive(Debug, Clone)]
pub struct FixedClock {
    dt: f64,
    max_frame: f64,
    accumulator: f64,
    tick: u64,
}

impl FixedClock {
    pub fn new(config: ClockConfig) -> Self {
        Self {
            dt: config.dt.max(1e-6),
            max_frame: config.max_frame.max(0.0),
            accumulator: 0.0,
            tick: 0,
        }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Leftover time carried into the next frame.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn accumulate(&mut self, elapsed: f64) {
        self.accumulator += elapsed.clamp(0.0, self.max_frame);
    }

    /// Consume one step from the accumulator, if enough time has built up.
    pub fn next_step(&mut self) -> Option<TickContext> {
        if self.accumulator < self.dt {
            return None;
        }
        self.accumulator -= self.dt;
        Some(self.force_step())
    }

    /// Advance one step regardless of the accumulator.
    pub fn force_step(&mut self) -> TickContext {
        self.tick += 1;
        TickContext {
            tick: self.tick,
            dt_seconds: self.dt as f32,
        }
    }
}
