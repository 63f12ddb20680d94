//! Typed state context for the Gatehouse login screen.
//!
//! States are plain values stored by type inside a [`StateCtx`]. Commands read them
//! through a [`Dep`] view, may spawn one asynchronous task, and publish new values
//! through an [`Updater`]. Published values are applied on the owning thread when the
//! context is synced, so the UI only ever observes whole states.

mod basic_state;
mod command;
mod ctx;
mod error;
mod runtime;
mod state;
mod task;

pub use basic_state::Time;
pub use command::{Command, CommandFuture, CommandStage};
pub use ctx::{Dep, StateCtx};
pub use error::Error;
pub use runtime::StateRuntime;
pub use state::{State, Updater};
pub use task::{TaskHandle, TaskId};
