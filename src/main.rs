//! Grade Board - Grade Sheet Lookup & Group Statistics Dashboard
//!
//! Students look up their own scores by email and browse per-group statistics.

mod charts;
mod config;
mod data;
mod gui;
mod lookup;
mod stats;

use config::AppConfig;
use data::TableCache;
use eframe::egui;
use gui::GradeBoardApp;
use log::error;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::resolve().inspect_err(|e| error!("{}", e))?;
    let cache = Arc::new(TableCache::new(
        config.source_path()?,
        config.schema.clone(),
    ));

    // Configure native options
    let title = config.labels.window_title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 850.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title(&title),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(GradeBoardApp::new(cc, config, cache)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
}
