use std::time::Duration;

use sadtime_business::Route;

use crate::{pages, state::State, widgets};

/// Polling interval for command results that arrive between input events.
const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

pub struct SadtimeApp {
    state: State,
}

impl SadtimeApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}

impl eframe::App for SadtimeApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.begin_frame();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                widgets::api_status(&self.state.ctx, ui);
                ui.label("SADTIME");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.state.route() {
            Route::Loading => pages::loading_page(ui),
            Route::Login => pages::login_page(&mut self.state, ui),
            Route::Dashboard => pages::dashboard_page(&mut self.state, ui),
        });

        self.state.end_frame();
        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
