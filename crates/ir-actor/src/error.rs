use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActorError {
    #[error("invalid action `{action}`: {reason}")]
    InvalidAction { action: String, reason: &'static str },

    #[error("action `{0}` registered twice")]
    DuplicateAction(String),

    #[error("action `{0}` costs mana but the actor has no mana pool")]
    MissingManaPool(String),

    #[error("template `{template}` names action `{action}` with no bound handler")]
    MissingHandler { template: String, action: String },

    #[error("actor state diverged from the scheduler: {0}")]
    Inconsistent(String),

    #[error("template parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ActorResult<T> = Result<T, ActorError>;
