//! Login page for unauthenticated users.

use crate::{state::State, widgets};
use egui::{Response, Ui};

/// Renders the login page with a centered login form.
pub fn login_page(state: &mut State, ui: &mut Ui) -> Response {
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        widgets::header(ui);
        ui.add_space(4.0);
        widgets::clock(&mut state.ctx, ui);
        ui.add_space(24.0);

        widgets::login_form(&mut state.ctx, ui);

        ui.add_space(24.0);
        ui.vertical_centered(widgets::security_badge);
    })
    .response
}
