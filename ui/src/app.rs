use std::time::Duration;

use chrono::Utc;
use gatehouse_states::Time;

use crate::{pages, state::State};

/// Repaint interval while a submission is in flight, so the spinner keeps moving.
const BUSY_REPAINT: Duration = Duration::from_millis(100);
/// Repaint interval for the clock.
const IDLE_REPAINT: Duration = Duration::from_secs(1);

pub struct GatehouseApp {
    pub state: State,
}

impl GatehouseApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }
}

impl eframe::App for GatehouseApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply command results before rendering
        self.state.ctx.sync_states();
        self.state.ctx.update::<Time>(|time| time.tick(Utc::now()));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                pages::current_page(&mut self.state, ui);
            });
        });

        let after = if self.state.ctx.in_flight() > 0 {
            BUSY_REPAINT
        } else {
            IDLE_REPAINT
        };
        ctx.request_repaint_after(after);
    }
}
