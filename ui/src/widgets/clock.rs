//! System clock widget.
//!
//! Renders the [`Time`] state in local time. The app ticks `Time` once per
//! frame, so the widget itself never reads the system clock.

use chrono::{DateTime, Local};
use egui::{Response, RichText, Ui};
use gatehouse_states::{StateCtx, Time};

/// e.g. `Friday, October 16, 2026 09:05:03`
pub const CLOCK_FORMAT: &str = "%A, %B %-d, %Y %H:%M:%S";

pub fn format_clock(at: &DateTime<Local>) -> String {
    at.format(CLOCK_FORMAT).to_string()
}

pub fn clock(state_ctx: &mut StateCtx, ui: &mut Ui) -> Response {
    let text = format_clock(&state_ctx.state::<Time>().local());
    ui.label(RichText::new(text).monospace().weak())
}
