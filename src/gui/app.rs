//! Grade Board Main Application
//! Loads the grade table in the background, then shows the lookup and group panels.

use crate::config::AppConfig;
use crate::data::{Table, TableCache};
use crate::gui::{GroupPanel, StudentPanel};
use egui::{Color32, RichText};
use log::{error, info};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

/// Table loading result from background thread
enum LoadResult {
    Complete(Arc<Table>),
    Error(String),
}

/// Main application window.
pub struct GradeBoardApp {
    config: AppConfig,
    table: Option<Arc<Table>>,
    load_error: Option<String>,
    student_panel: StudentPanel,
    group_panel: GroupPanel,

    // Async table loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl GradeBoardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        cache: Arc<TableCache>,
    ) -> Self {
        let mut app = Self {
            config,
            table: None,
            load_error: None,
            student_panel: StudentPanel::new(),
            group_panel: GroupPanel::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_loading(cache);
        app
    }

    /// Load the table in a background thread
    fn start_loading(&mut self, cache: Arc<TableCache>) {
        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        info!("Loading grade sheet {}", cache.path().display());

        thread::spawn(move || {
            let result = match cache.get() {
                Ok(table) => LoadResult::Complete(table),
                Err(e) => {
                    error!("{}", e);
                    LoadResult::Error(e.to_string())
                }
            };
            let _ = tx.send(result);
        });
    }

    /// Check for table loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(table)) => {
                self.table = Some(table);
                self.is_loading = false;
            }
            Ok(LoadResult::Error(message)) => {
                self.load_error = Some(message);
                self.is_loading = false;
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                // Put receiver back, still loading
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.load_error = Some("Grade sheet loader stopped unexpectedly".to_string());
                self.is_loading = false;
            }
        }
    }

    fn draw_header(&self, ui: &mut egui::Ui) {
        let labels = &self.config.labels;
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(&labels.title)
                    .size(30.0)
                    .strong()
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            if !labels.subtitle.is_empty() {
                ui.label(RichText::new(&labels.subtitle).size(20.0));
            }
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);
    }
}

impl eframe::App for GradeBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_header(ui);

            // A failed load halts the rest of the page
            if let Some(message) = &self.load_error {
                ui.label(
                    RichText::new(format!("Error while loading the grade sheet: {}", message))
                        .size(16.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
                return;
            }

            let Some(table) = self.table.clone() else {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading grade sheet...");
                });
                return;
            };

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.student_panel.show(ui, &table, &self.config.labels);

                    ui.add_space(20.0);

                    egui::CollapsingHeader::new(
                        RichText::new(&self.config.labels.group_panel).size(16.0),
                    )
                    .default_open(false)
                    .show(ui, |ui| {
                        self.group_panel.show(ui, &table, &self.config);
                    });
                });
        });
    }
}
