//! Charts module - group chart rendering

mod plotter;

pub use plotter::ChartPlotter;
