//! Chart Plotter Module
//! Histogram, boxplot, category pie and metric cards using egui_plot and the egui painter.

use crate::data::Category;
use crate::stats::{GroupStatistics, StatsCalculator};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Plot, PlotPoints, Points};
use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Histogram bar color
pub const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(99, 110, 250);
/// Boxplot color
pub const BOX_COLOR: Color32 = Color32::from_rgb(52, 152, 219);

const CHART_HEIGHT: f32 = 260.0;
const PIE_SIZE: f32 = 180.0;
/// Pie slices are drawn as convex pieces no wider than this
const PIE_PIECE: f32 = FRAC_PI_2;
const PIE_STEP: f32 = 0.05;

/// Creates the per-field charts of the group panel.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for a category.
    pub fn category_color(category: Category) -> Color32 {
        match category {
            Category::Insufficient => Color32::from_rgb(231, 76, 60),
            Category::Passing => Color32::from_rgb(243, 156, 18),
            Category::FairlyGood => Color32::from_rgb(26, 188, 156),
            Category::Good => Color32::from_rgb(46, 204, 113),
            Category::VeryGood => Color32::from_rgb(52, 152, 219),
            Category::Undefined => Color32::from_rgb(96, 125, 139),
        }
    }

    /// Two-decimal display; undefined statistics (N = 1 variance) show as "n/a".
    pub fn format_metric(value: f64) -> String {
        if value.is_finite() {
            format!("{:.2}", value)
        } else {
            "n/a".to_string()
        }
    }

    /// Calculate beeswarm positions for points with duplicate values.
    pub fn beeswarm_positions(y_values: &[f64], center: f64, width: f64) -> Vec<f64> {
        let n = y_values.len();
        if n == 0 {
            return Vec::new();
        }

        let mut positions = vec![center; n];

        // Round values and find duplicates
        let precision = 1e6;
        let mut value_indices: HashMap<i64, Vec<usize>> = HashMap::new();

        for (i, &y) in y_values.iter().enumerate() {
            let key = (y * precision).round() as i64;
            value_indices.entry(key).or_default().push(i);
        }

        // Spread duplicates symmetrically
        for indices in value_indices.values() {
            if indices.len() > 1 {
                let count = indices.len();
                let step = width / (count.max(2) - 1) as f64;
                let start = center - width / 2.0;

                for (i, &idx) in indices.iter().enumerate() {
                    positions[idx] = start + i as f64 * step;
                }
            }
        }

        positions
    }

    /// Histogram of the group's scores.
    pub fn draw_histogram(ui: &mut egui::Ui, stats: &GroupStatistics, bins: usize) {
        let bars: Vec<Bar> = StatsCalculator::histogram_bins(&stats.values, bins)
            .into_iter()
            .map(|bin| {
                // 20% gap between bars
                Bar::new((bin.start + bin.end) / 2.0, bin.count as f64)
                    .width((bin.end - bin.start) * 0.8)
                    .name(format!("{:.2} - {:.2}", bin.start, bin.end))
            })
            .collect();

        Plot::new(format!("histogram_{}_{}", stats.group, stats.field))
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label(format!("{} score", stats.field))
            .y_axis_label("Count")
            .include_y(0.0)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(HISTOGRAM_COLOR));
            });
    }

    /// Boxplot with every score overlaid.
    pub fn draw_boxplot(ui: &mut egui::Ui, stats: &GroupStatistics) {
        let summary = stats.box_summary;
        let field = stats.field.clone();

        Plot::new(format!("boxplot_{}_{}", stats.group, stats.field))
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .y_axis_label(format!("{} score", stats.field))
            .include_x(-1.0)
            .include_x(1.0)
            .x_axis_formatter(move |mark, _range| {
                if mark.value.round() == 0.0 {
                    field.clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let box_elem = BoxElem::new(
                    0.0,
                    BoxSpread::new(
                        summary.lower_whisker,
                        summary.q1,
                        summary.median,
                        summary.q3,
                        summary.upper_whisker,
                    ),
                )
                .box_width(0.5)
                .fill(BOX_COLOR.gamma_multiply(0.3))
                .stroke(egui::Stroke::new(1.5, BOX_COLOR));

                plot_ui.box_plot(BoxPlot::new(vec![box_elem]).name(&stats.field));

                // Draw scatter points (all points, no sampling)
                let x_positions = Self::beeswarm_positions(&stats.values, 0.0, 0.35);
                let points: PlotPoints = x_positions
                    .iter()
                    .zip(stats.values.iter())
                    .map(|(&x, &y)| [x, y])
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .radius(3.0)
                        .color(BOX_COLOR.gamma_multiply(0.7))
                        .name("Scores"),
                );
            });
    }

    /// Category breakdown as a pie with a legend.
    pub fn draw_category_pie(ui: &mut egui::Ui, stats: &GroupStatistics) {
        let total: usize = stats.distribution.iter().map(|(_, n)| n).sum();
        if total == 0 {
            return;
        }

        ui.horizontal(|ui| {
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(PIE_SIZE, PIE_SIZE), egui::Sense::hover());
            let center = rect.center();
            let radius = PIE_SIZE / 2.0 - 4.0;
            let painter = ui.painter();

            let mut angle = -FRAC_PI_2;
            for &(category, count) in &stats.distribution {
                if count == 0 {
                    continue;
                }
                let sweep = count as f32 / total as f32 * TAU;
                let color = Self::category_color(category);

                for (from, to) in Self::pie_pieces(angle, sweep) {
                    let steps = ((to - from) / PIE_STEP).ceil().max(1.0) as usize;
                    let mut points = vec![center];
                    points.extend((0..=steps).map(|i| {
                        let a = from + (to - from) * i as f32 / steps as f32;
                        center + radius * egui::vec2(a.cos(), a.sin())
                    }));
                    painter.add(egui::Shape::convex_polygon(
                        points,
                        color,
                        egui::Stroke::NONE,
                    ));
                }
                angle += sweep;
            }

            ui.add_space(12.0);

            // Legend
            ui.vertical(|ui| {
                for &(category, count) in &stats.distribution {
                    if count == 0 {
                        continue;
                    }
                    ui.horizontal(|ui| {
                        let (rect, _) = ui
                            .allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                        ui.painter()
                            .rect_filled(rect, 3.0, Self::category_color(category));
                        ui.label(
                            RichText::new(format!(
                                "{}: {} ({:.1}%)",
                                category.label(),
                                count,
                                count as f64 / total as f64 * 100.0
                            ))
                            .size(12.0),
                        );
                    });
                }
            });
        });
    }

    /// Split a slice into convex pieces.
    fn pie_pieces(start: f32, sweep: f32) -> Vec<(f32, f32)> {
        let mut pieces = Vec::new();
        let mut from = start;
        let end = start + sweep;
        while from < end {
            let to = (from + PIE_PIECE).min(end);
            pieces.push((from, to));
            from = to;
        }
        pieces
    }

    /// Summary metrics of one field.
    pub fn draw_metrics(ui: &mut egui::Ui, stats: &GroupStatistics) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!(
                    "metrics_{}_{}",
                    stats.group, stats.field
                )))
                .striped(true)
                .min_col_width(70.0)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    let rows = [
                        ("Count", stats.count.to_string()),
                        ("Mean", Self::format_metric(stats.mean)),
                        ("Median", Self::format_metric(stats.median)),
                        ("Variance", Self::format_metric(stats.variance)),
                        ("Std deviation", Self::format_metric(stats.std)),
                    ];
                    for (name, value) in rows {
                        ui.label(RichText::new(name).strong().size(13.0));
                        ui.label(RichText::new(value).size(13.0));
                        ui.end_row();
                    }
                });
            });
    }
}
