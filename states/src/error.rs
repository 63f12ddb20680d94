use std::any::TypeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("State not found: {name} ({id:?})")]
    StateNotFound { id: TypeId, name: &'static str },
    #[error("Command {name} is still in flight")]
    CommandInFlight { name: &'static str },
}

impl Error {
    pub fn state_not_found<T: 'static>() -> Self {
        Self::StateNotFound {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn command_in_flight<T: 'static>() -> Self {
        Self::CommandInFlight {
            name: std::any::type_name::<T>(),
        }
    }
}
