//! Login widget for user authentication.
//!
//! Displays a centered login form with username and password fields. A rejected login
//! shows the backend's message above the form.

use crate::utils::colors::COLOR_RED;
use egui::{Align, Layout, Response, Ui};
use sadtime_business::{LoginCommand, LoginCompute, LoginInput};
use sadtime_states::StateCtx;

/// Displays the login form and dispatches [`LoginCommand`] on submit.
pub fn login_widget(state_ctx: &mut StateCtx, ui: &mut Ui) -> Response {
    let (pending, error) = state_ctx
        .cached::<LoginCompute>()
        .map(|c| (c.is_pending(), c.error().map(str::to_owned)))
        .unwrap_or_default();

    let login_input = state_ctx.state::<LoginInput>();
    let mut username = login_input.username.clone();
    let mut password = login_input.password.clone();
    let mut should_login = false;

    let response = ui
        .with_layout(Layout::top_down(Align::Center), |ui| {
            ui.add_space(20.0);
            ui.heading("SADTIME");
            ui.add_space(40.0);

            if let Some(err) = &error {
                ui.colored_label(COLOR_RED, err);
                ui.add_space(8.0);
            }

            ui.horizontal(|ui| {
                ui.label("Username:");
                ui.add_enabled(!pending, egui::TextEdit::singleline(&mut username));
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Password:");
                let password_response = ui.add_enabled(
                    !pending,
                    egui::TextEdit::singleline(&mut password).password(true),
                );

                if password_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
                {
                    should_login = true;
                }
            });

            ui.add_space(16.0);

            let can_login = !pending && !username.trim().is_empty() && !password.trim().is_empty();
            if ui
                .add_enabled(can_login, egui::Button::new("Login"))
                .clicked()
            {
                should_login = true;
            }

            if pending {
                ui.add_space(8.0);
                ui.spinner();
            }
        })
        .response;

    let login_input = state_ctx.state_mut::<LoginInput>();
    if login_input.username != username {
        login_input.username = username;
    }
    if login_input.password != password {
        login_input.password = password;
    }

    if should_login && !pending && login_input.is_complete() {
        state_ctx.dispatch::<LoginCommand>();
    }

    response
}
