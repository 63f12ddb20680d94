//! Route state for page navigation.

use gatehouse_states::State;

/// The page currently on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    /// Shown until a session exists.
    #[default]
    Login,
    /// The protected area.
    Dashboard,
}

impl State for Route {}
