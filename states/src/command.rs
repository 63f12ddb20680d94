use std::{any::Any, future::Future, pin::Pin};

use crate::{Dep, Updater};

/// Boxed future spawned for a pending command.
pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// What a command left behind after its synchronous part ran.
pub enum CommandStage {
    /// Everything was published through the updater already.
    Finished,
    /// Work continues in a spawned task; results arrive through the updater.
    Pending(CommandFuture),
}

impl CommandStage {
    pub fn pending(future: impl Future<Output = ()> + Send + 'static) -> Self {
        Self::Pending(Box::pin(future))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl std::fmt::Debug for CommandStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finished => f.write_str("Finished"),
            Self::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// A user action that reads states and publishes new ones.
///
/// Commands run only when dispatched explicitly. At most one task per command type
/// is in flight at any time; see [`StateCtx::dispatch`](crate::StateCtx::dispatch).
pub trait Command: Any {
    fn run(&self, deps: Dep<'_>, updater: Updater) -> CommandStage;
}
