use std::{
    any::{TypeId, type_name},
    collections::BTreeMap,
};

use flume::{Receiver, Sender};
use log::{debug, info};
use tokio_util::sync::CancellationToken;

use crate::{
    CommandFuture, TaskHandle, TaskId, Updater,
    state::Update,
};

/// Update channel plus the registry of in-flight command tasks.
#[derive(Debug)]
pub struct StateRuntime {
    send: Sender<Update>,
    recv: Receiver<Update>,

    tasks: BTreeMap<TypeId, TaskHandle>,
    generation: u64,
}

impl Default for StateRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRuntime {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            send,
            recv,
            tasks: BTreeMap::new(),
            generation: 0,
        }
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    pub(crate) fn try_recv(&self) -> Option<Update> {
        self.recv.try_recv().ok()
    }

    pub(crate) async fn recv(&self) -> Option<Update> {
        self.recv.recv_async().await.ok()
    }

    /// Whether a task spawned by the command type `id` has not finished yet.
    pub fn is_running(&self, id: TypeId) -> bool {
        self.tasks.contains_key(&id)
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Spawns `future` on the current Tokio runtime on behalf of `C`.
    pub(crate) fn spawn<C: 'static>(&mut self, future: CommandFuture) -> TaskId {
        self.generation += 1;
        let id = TaskId::new(TypeId::of::<C>(), self.generation);
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let updater = self.updater();
        let name = type_name::<C>();

        tokio::spawn(async move {
            tokio::select! {
                () = cancelled.cancelled() => {
                    debug!("{name}: task {} cancelled", id.generation());
                }
                () = future => {}
            }
            updater.finish(id);
        });

        self.tasks.insert(id.type_id(), TaskHandle::new(id, token));
        id
    }

    /// Forgets a finished task unless a newer one took its slot.
    pub(crate) fn retire(&mut self, id: TaskId) {
        if self
            .tasks
            .get(&id.type_id())
            .is_some_and(|handle| handle.id() == id)
        {
            self.tasks.remove(&id.type_id());
        }
    }

    pub fn cancel_all(&mut self) {
        if !self.tasks.is_empty() {
            info!("Cancelling {} in-flight task(s)", self.tasks.len());
        }
        for handle in self.tasks.values() {
            handle.cancel();
        }
        self.tasks.clear();
    }
}
