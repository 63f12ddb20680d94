//! Pages module for the application.
//!
//! One page per [`Route`]:
//! - `login_page`: header, badge, clock and the login form
//! - `dashboard_page`: the signed-in landing page

mod dashboard_page;
mod login_page;

use egui::{Response, Ui};
use gatehouse_business::Route;

use crate::state::State;

pub use dashboard_page::dashboard_page;
pub use login_page::login_page;

/// Renders whichever page the current [`Route`] points at.
pub fn current_page(state: &mut State, ui: &mut Ui) -> Response {
    match state.ctx.state::<Route>() {
        Route::Login => login_page(state, ui),
        Route::Dashboard => dashboard_page(state, ui),
    }
}
