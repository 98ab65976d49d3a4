use thiserror::Error;

use ir_core::ActorId;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("{actor} has no action named `{name}`")]
    UnknownAction { actor: ActorId, name: String },
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
