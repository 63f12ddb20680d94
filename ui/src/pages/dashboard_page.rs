//! Dashboard shown once a session exists.

use crate::{state::State, utils::colors::COLOR_GREEN, widgets};
use egui::{Response, RichText, Ui};
use gatehouse_business::{ActiveSession, LogoutCommand};
use log::warn;

/// Renders the signed-in landing page with a sign-out button.
pub fn dashboard_page(state: &mut State, ui: &mut Ui) -> Response {
    let record = state.ctx.state::<ActiveSession>().record.clone();
    let mut sign_out = false;

    let response = ui
        .vertical_centered(|ui| {
            ui.add_space(24.0);
            widgets::header(ui);
            ui.add_space(24.0);

            match &record {
                Some(record) => {
                    ui.label(
                        RichText::new(format!("Welcome, {}", record.name))
                            .size(24.0)
                            .color(COLOR_GREEN),
                    );
                    ui.add_space(8.0);
                    ui.label(format!("Signed in as {} ({})", record.email, record.role.label()));
                    ui.label(format!(
                        "Since {}",
                        widgets::format_clock(&record.login_timestamp.with_timezone(&chrono::Local))
                    ));
                    if record.remember_me {
                        ui.label(RichText::new("This device is remembered").weak());
                    }
                }
                None => {
                    ui.label("Welcome");
                }
            }

            ui.add_space(16.0);
            if ui.button("Sign Out").clicked() {
                sign_out = true;
            }
        })
        .response;

    if sign_out && let Err(err) = state.ctx.dispatch::<LogoutCommand>() {
        warn!("Sign out ignored: {err}");
    }

    response
}
