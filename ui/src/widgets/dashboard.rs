use egui::{Align, Layout, RichText, Ui};
use sadtime_business::{Summary, UserRef};

use crate::utils::colors::COLOR_AMBER;

/// Title, greeting and logout button. Returns `true` when logout was clicked.
pub fn dashboard_header(ui: &mut Ui, user: &UserRef) -> bool {
    ui.horizontal(|ui| {
        ui.heading("SADTIME Dashboard");
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let clicked = ui.button("Logout").clicked();
            ui.label(format!("Welcome, {}", user.username));
            if user.is_staff {
                ui.label(RichText::new("staff").small().color(COLOR_AMBER));
            }
            clicked
        })
        .inner
    })
    .inner
}

/// The five summary counters, or a placeholder until the first fetch succeeds.
pub fn summary_view(ui: &mut Ui, summary: Option<&Summary>) {
    let Some(summary) = summary else {
        ui.label("Loading...");
        return;
    };

    egui::Grid::new("summary_counters")
        .num_columns(2)
        .spacing([24.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            for (label, value) in summary.counters() {
                ui.label(label);
                ui.label(RichText::new(value.to_string()).strong().size(18.0));
                ui.end_row();
            }
        });
}
