//! Group Panel Widget
//! Group selector and per-field statistics cards.

use crate::charts::ChartPlotter;
use crate::config::AppConfig;
use crate::data::Table;
use crate::stats::{GroupStatistics, StatsCalculator, StatsError};
use egui::{Color32, ComboBox, RichText};
use log::info;

const CARD_BORDER: Color32 = Color32::from_rgb(100, 149, 237);
const NOTICE_COLOR: Color32 = Color32::from_rgb(243, 156, 18);

/// Selected group and the statistics computed for it.
#[derive(Default)]
pub struct GroupPanel {
    pub selected_group: Option<String>,
    pub results: Vec<(String, Result<GroupStatistics, StatsError>)>,
}

impl GroupPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a group and recompute its statistics.
    pub fn select(&mut self, table: &Table, group: String, fields: &[String]) {
        info!("Computing statistics for group {}", group);
        self.results = StatsCalculator::group_statistics_for_fields(table, &group, fields);
        self.selected_group = Some(group);
    }

    /// Draw the panel
    pub fn show(&mut self, ui: &mut egui::Ui, table: &Table, config: &AppConfig) {
        if !table.columns.group {
            Self::notice(
                ui,
                &format!(
                    "Column '{}' (group) does not exist in the data.",
                    table.schema.group_col
                ),
            );
            return;
        }

        let groups = table.group_labels();
        if groups.is_empty() {
            Self::notice(ui, "No group found in the data.");
            return;
        }

        // The first group is shown until the user picks another
        if self.selected_group.is_none() {
            self.select(table, groups[0].clone(), &config.chart_fields);
        }

        let mut picked: Option<String> = None;
        ui.horizontal(|ui| {
            ui.label(RichText::new("Choose a group:").size(14.0));
            ComboBox::from_id_salt("group_select")
                .width(150.0)
                .selected_text(self.selected_group.as_deref().unwrap_or_default())
                .show_ui(ui, |ui| {
                    for group in &groups {
                        let selected = self.selected_group.as_deref() == Some(group.as_str());
                        if ui.selectable_label(selected, group).clicked() && !selected {
                            picked = Some(group.clone());
                        }
                    }
                });
        });

        if let Some(group) = picked {
            self.select(table, group, &config.chart_fields);
        }

        ui.add_space(10.0);

        for (field, result) in &self.results {
            match result {
                Ok(stats) => Self::draw_field_card(ui, stats, config.histogram_bins),
                Err(StatsError::Empty { group, .. }) => Self::notice(
                    ui,
                    &format!("No {} scores available for group {}", field, group),
                ),
                Err(e) => Self::notice(ui, &e.to_string()),
            }
            ui.add_space(15.0);
        }
    }

    fn notice(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(format!("⚠ {}", text)).size(14.0).color(NOTICE_COLOR));
    }

    /// Charts and metrics of one field
    fn draw_field_card(ui: &mut egui::Ui, stats: &GroupStatistics, bins: usize) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, CARD_BORDER))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("{} statistics - group {}", stats.field, stats.group))
                        .size(18.0)
                        .strong()
                        .color(CARD_BORDER),
                );
                ui.add_space(8.0);

                let half_width = (ui.available_width() - 20.0) / 2.0;

                ui.horizontal_top(|ui| {
                    ui.vertical(|ui| {
                        ui.set_width(half_width);
                        ui.label(RichText::new("Category breakdown").size(14.0).strong());
                        ChartPlotter::draw_category_pie(ui, stats);
                        ui.add_space(10.0);
                        ui.label(RichText::new("Histogram").size(14.0).strong());
                        ChartPlotter::draw_histogram(ui, stats, bins);
                    });

                    ui.add_space(20.0);

                    ui.vertical(|ui| {
                        ui.set_width(half_width);
                        ui.label(RichText::new("Boxplot").size(14.0).strong());
                        ChartPlotter::draw_boxplot(ui, stats);
                        ui.add_space(10.0);
                        ChartPlotter::draw_metrics(ui, stats);
                    });
                });
            });
    }
}
