//! Product header shown above every page.

use egui::{Response, RichText, Ui};

pub const PRODUCT_NAME: &str = "Gatehouse";
pub const SUBTITLE: &str = "Secure Employee Portal";

pub fn header(ui: &mut Ui) -> Response {
    ui.vertical_centered(|ui| {
        ui.heading(RichText::new(PRODUCT_NAME).strong());
        ui.label(RichText::new(SUBTITLE).weak());
    })
    .response
}
