use thiserror::Error;

use ir_actor::ActorError;
use ir_core::{ActionId, ActorId, CoreError};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("{0} is not a live actor")]
    UnknownActor(ActorId),

    #[error("{actor} has no {action}")]
    UnknownAction { actor: ActorId, action: ActionId },

    #[error(transparent)]
    Actor(#[from] ActorError),

    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

pub type SimResult<T> = Result<T, SimError>;
