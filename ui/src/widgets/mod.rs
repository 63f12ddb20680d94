mod clock;
mod header;
mod login_form;
mod security_badge;

pub use clock::{CLOCK_FORMAT, clock, format_clock};
pub use header::{PRODUCT_NAME, SUBTITLE, header};
pub use login_form::login_form;
pub use security_badge::{BADGE_TEXT, security_badge};
