//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert into
//! `CoreError` via `From` or wrap it as one variant.

use thiserror::Error;

use crate::ActorId;

/// The top-level error type for `ir-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ir-core`.
pub type CoreResult<T> = Result<T, CoreError>;
