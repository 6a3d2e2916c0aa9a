//! GUI module - User interface components

mod app;
mod group_panel;
mod student_panel;

pub use app::GradeBoardApp;
pub use group_panel::GroupPanel;
pub use student_panel::StudentPanel;
