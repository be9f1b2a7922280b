//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed requests to the dispatcher.
/// These are independent of process execution and configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown output channel: {0}")]
    UnknownChannel(String),

    #[error("empty command name")]
    EmptyCommand,
}
