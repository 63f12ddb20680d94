//! Identity and cancellation for command tasks.
//!
//! Every pending [`Command`](crate::Command) becomes one Tokio task. The task is
//! identified by the command's `TypeId` plus a generation counter, so a late
//! "finished" message from an older task never retires a newer one.

use std::any::TypeId;

use tokio_util::sync::CancellationToken;

/// Identifier of a spawned command task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    /// `TypeId` of the command that spawned the task.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Higher generations were spawned later.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle kept by the runtime for each in-flight task.
///
/// Cancellation is cooperative: the task is wrapped in a `tokio::select!` against
/// the token, so it stops at its next await point.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}
