use st_core::{AgentId, NodeId, StError};
use st_traffic::TrafficError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] StError),

    #[error("traffic model error: {0}")]
    Traffic(#[from] TrafficError),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("route of {agent} steps from {from} to {to} without an edge")]
    BrokenRoute {
        agent: AgentId,
        from:  NodeId,
        to:    NodeId,
    },
}

pub type SimResult<T> = Result<T, SimError>;
