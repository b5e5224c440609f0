use crate::core::types::{ActorId, Cell};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrainsError {
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Cell {cell} is occupied by {occupant}")]
    CellOccupied { cell: Cell, occupant: ActorId },

    #[error("Cell {0} is outside the arena")]
    OutOfBounds(Cell),

    #[error("Arena is full")]
    ArenaFull,

    #[error("Actor {actor} faulted: {reason}")]
    ActorFault { actor: ActorId, reason: String },

    #[error("Decision service error: {0}")]
    Decision(String),

    #[error("Decision for {0} timed out")]
    DecisionTimeout(ActorId),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BrainsError>;
