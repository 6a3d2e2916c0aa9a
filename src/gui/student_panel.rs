//! Student Panel Widget
//! Email input and the student's own results.

use crate::charts::ChartPlotter;
use crate::config::Labels;
use crate::data::Table;
use crate::lookup::{find_student, LookupError, StudentView};
use egui::{Color32, RichText, TextEdit};

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const WARNING_COLOR: Color32 = Color32::from_rgb(243, 156, 18);

/// Email lookup with the last submitted result.
#[derive(Default)]
pub struct StudentPanel {
    pub email_input: String,
    pub result: Option<Result<StudentView, LookupError>>,
}

impl StudentPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the lookup for the current input. Blank input clears the result.
    pub fn submit(&mut self, table: &Table) {
        self.result = if self.email_input.trim().is_empty() {
            None
        } else {
            Some(find_student(table, &self.email_input))
        };
    }

    /// Draw the panel
    pub fn show(&mut self, ui: &mut egui::Ui, table: &Table, labels: &Labels) {
        ui.label(RichText::new(&labels.email_prompt).size(22.0).strong());
        ui.add_space(5.0);

        let mut submitted = false;
        ui.horizontal(|ui| {
            let response = ui.add(
                TextEdit::singleline(&mut self.email_input)
                    .hint_text(labels.email_placeholder.as_str())
                    .desired_width(360.0)
                    .font(egui::TextStyle::Heading),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submitted = true;
            }
            if ui.button(RichText::new("🔍 Search").size(16.0)).clicked() {
                submitted = true;
            }
        });

        if submitted {
            self.submit(table);
        }

        ui.add_space(10.0);

        match &self.result {
            None => {}
            Some(Ok(view)) => Self::draw_results(ui, view, labels),
            Some(Err(e)) => {
                ui.label(RichText::new(format!("✖ {}", e)).size(15.0).color(ERROR_COLOR));
            }
        }
    }

    fn draw_results(ui: &mut egui::Ui, view: &StudentView, labels: &Labels) {
        ui.label(RichText::new("Student results").size(18.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                egui::Grid::new("student_results")
                    .striped(true)
                    .min_col_width(90.0)
                    .spacing([16.0, 6.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Name").strong());
                        ui.label(&view.name);
                        ui.label("");
                        ui.end_row();

                        ui.label(RichText::new("Group").strong());
                        ui.label(&view.group);
                        ui.label("");
                        ui.end_row();

                        for score in &view.scores {
                            ui.label(RichText::new(&score.field).strong());
                            ui.label(RichText::new(&score.display).size(15.0));
                            ui.label(
                                RichText::new(score.category.label())
                                    .color(ChartPlotter::category_color(score.category)),
                            );
                            ui.end_row();
                        }
                    });
            });

        if view.absent {
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("⚠ {}", labels.absence_warning))
                    .size(15.0)
                    .color(WARNING_COLOR),
            );
        }
    }
}
