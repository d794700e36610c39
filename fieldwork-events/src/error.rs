//! Event errors

use thiserror::Error;

/// Event emitter errors
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Listener {id} for event '{event}' doesn't exist")]
    ListenerNotFound { event: String, id: u64 },
}

pub type Result<T> = std::result::Result<T, EventError>;
