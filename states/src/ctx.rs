use std::{
    any::{Any, TypeId, type_name},
    collections::BTreeMap,
};

use log::{debug, warn};

use crate::{Command, CommandStage, Error, State, StateRuntime, state::Update};

/// Owner of every state on screen and of the tasks commands spawn.
///
/// All access happens on one thread. Asynchronous work publishes through an
/// [`Updater`](crate::Updater) and becomes visible after [`StateCtx::sync_states`].
#[derive(Debug, Default)]
pub struct StateCtx {
    runtime: StateRuntime,

    storage: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl StateCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `state`, replacing any previous value of the same type.
    pub fn add_state<T: State>(&mut self, state: T) {
        self.storage.insert(TypeId::of::<T>(), Box::new(state));
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.storage
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .ok_or_else(Error::state_not_found::<T>)
    }

    pub fn try_state_mut<T: State>(&mut self) -> Result<&mut T, Error> {
        self.storage
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut::<T>())
            .ok_or_else(Error::state_not_found::<T>)
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        self.try_state_mut::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Mutates a registered state in place.
    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    /// Runs `C::default()`; see [`StateCtx::dispatch_with`].
    pub fn dispatch<C: Command + Default>(&mut self) -> Result<(), Error> {
        self.dispatch_with(C::default())
    }

    /// Runs `command` against the current states.
    ///
    /// Values the command publishes synchronously are applied before this returns.
    /// A pending stage is spawned on the current Tokio runtime, and until it has
    /// finished and been synced, further dispatches of `C` fail with
    /// [`Error::CommandInFlight`] without running anything.
    pub fn dispatch_with<C: Command>(&mut self, command: C) -> Result<(), Error> {
        if self.runtime.is_running(TypeId::of::<C>()) {
            debug!("{} dispatched while in flight", type_name::<C>());
            return Err(Error::command_in_flight::<C>());
        }

        let stage = command.run(Dep { ctx: self }, self.runtime.updater());
        if let CommandStage::Pending(future) = stage {
            self.runtime.spawn::<C>(future);
        }
        self.sync_states();
        Ok(())
    }

    /// Whether a task spawned by `C` is still outstanding.
    pub fn is_running<C: Command>(&self) -> bool {
        self.runtime.is_running(TypeId::of::<C>())
    }

    /// Number of command tasks not yet retired.
    pub fn in_flight(&self) -> usize {
        self.runtime.in_flight()
    }

    /// Applies every queued update and retires finished tasks.
    pub fn sync_states(&mut self) {
        while let Some(update) = self.runtime.try_recv() {
            self.apply(update);
        }
    }

    /// Waits until every in-flight task has finished and its updates are applied.
    pub async fn wait_idle(&mut self) {
        self.sync_states();
        while self.runtime.in_flight() > 0 {
            match self.runtime.recv().await {
                Some(update) => self.apply(update),
                None => break,
            }
        }
        self.sync_states();
    }

    pub fn cancel_all(&mut self) {
        self.runtime.cancel_all();
    }

    pub fn runtime(&self) -> &StateRuntime {
        &self.runtime
    }

    fn apply(&mut self, update: Update) {
        match update {
            Update::Assign { id, name, value } => {
                if self.storage.insert(id, value).is_none() {
                    warn!("{name} was published before it was registered");
                }
            }
            Update::Finished(task) => self.runtime.retire(task),
        }
    }
}

impl Drop for StateCtx {
    fn drop(&mut self) {
        self.runtime.cancel_all();
    }
}

/// Read-only view of the context handed to [`Command::run`].
pub struct Dep<'a> {
    ctx: &'a StateCtx,
}

impl<'a> Dep<'a> {
    pub fn try_state_ref<T: State>(&self) -> Result<&'a T, Error> {
        self.ctx.try_state::<T>()
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn get_state_ref<T: State>(&self) -> &'a T {
        self.ctx.state::<T>()
    }
}
