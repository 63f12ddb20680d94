//! Static connection indicator.
//!
//! Purely decorative: nothing on this screen talks to a network.

use egui::{Response, Ui};

use crate::utils::colors::COLOR_GREEN;

pub const BADGE_TEXT: &str = "256-bit encrypted connection";

pub fn security_badge(ui: &mut Ui) -> Response {
    ui.horizontal(|ui| {
        ui.colored_label(COLOR_GREEN, "🔒");
        ui.colored_label(COLOR_GREEN, BADGE_TEXT);
    })
    .response
}
