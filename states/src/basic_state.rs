use chrono::{DateTime, Local, Utc};

use crate::State;

/// Wall-clock time as last observed by the UI loop.
#[derive(Debug, Clone, Copy)]
pub struct Time {
    virt: DateTime<Utc>,
}

impl Time {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { virt: at }
    }

    /// Moves the clock to `at`.
    pub fn tick(&mut self, at: DateTime<Utc>) {
        self.virt = at;
    }

    pub fn local(&self) -> DateTime<Local> {
        self.virt.with_timezone(&Local)
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl State for Time {}

impl AsMut<DateTime<Utc>> for Time {
    fn as_mut(&mut self) -> &mut DateTime<Utc> {
        &mut self.virt
    }
}

impl AsRef<DateTime<Utc>> for Time {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.virt
    }
}
