use egui::{Align, Layout, Response, Ui};

/// Placeholder shown while the session is being checked.
pub fn loading_page(ui: &mut Ui) -> Response {
    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        ui.add_space(40.0);
        ui.spinner();
        ui.label("Loading...");
    })
    .response
}
