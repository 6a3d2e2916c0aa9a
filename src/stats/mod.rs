//! Stats module - per-group statistical calculations

mod calculator;

pub use calculator::{GroupStatistics, StatsCalculator, StatsError};
