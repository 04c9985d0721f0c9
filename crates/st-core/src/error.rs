//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `StError` as one
//! variant, so configuration problems surface with the same message whether
//! they are caught while generating agents or while starting a run.

use thiserror::Error;

use crate::{AgentId, NodeId};

/// The top-level error type for `st-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum StError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// Fatal, reported before any simulation work starts.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StError {
    /// Shorthand for building a [`StError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        StError::Config(msg.into())
    }
}

/// Shorthand result type for all `st-*` crates.
pub type StResult<T> = Result<T, StError>;
