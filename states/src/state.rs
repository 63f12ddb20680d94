use std::any::{Any, TypeId, type_name};

use flume::Sender;
use log::warn;

use crate::TaskId;

/// A value that lives in a [`StateCtx`](crate::StateCtx), keyed by its type.
///
/// States must be `Send` so asynchronous command tasks can hand new values back to
/// the owning thread through an [`Updater`].
pub trait State: Any + Send {}

/// Messages flowing from commands back into the context.
pub(crate) enum Update {
    Assign {
        id: TypeId,
        name: &'static str,
        value: Box<dyn Any + Send>,
    },
    Finished(TaskId),
}

/// Publishes new state values to the context that issued it.
///
/// Values are queued and applied when the context is synced; an updater that
/// outlives its context silently drops what it is given.
#[derive(Debug, Clone)]
pub struct Updater {
    send: Sender<Update>,
}

impl Updater {
    pub(crate) fn new(send: Sender<Update>) -> Self {
        Self { send }
    }

    /// Replaces the state of type `T` at the next sync.
    pub fn set<T: State>(&self, state: T) {
        let update = Update::Assign {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            value: Box::new(state),
        };
        if self.send.send(update).is_err() {
            warn!(
                "Updater: state context is gone, dropping {}",
                type_name::<T>()
            );
        }
    }

    pub(crate) fn finish(&self, task: TaskId) {
        // Nobody is left to retire the task when the context has been dropped.
        let _ignored = self.send.send(Update::Finished(task));
    }
}
