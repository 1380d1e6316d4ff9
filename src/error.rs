// src/error.rs
//
// Error taxonomy for the computation engine. Every variant that can occur
// while serving a request is turned into an ERROR envelope by the dispatcher.

use std::collections::TryReserveError;
use thiserror::Error;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The envelope named a kind no kernel is registered for.
    #[error("Unknown request kind: {kind}")]
    UnknownKind { kind: String },

    /// The payload could not be read as the input schema of its kind.
    #[error("Malformed {kind} payload: {source}")]
    MalformedPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// The requested sizes do not fit in memory.
    #[error("Cannot allocate {kind} result: {source}")]
    AllocationFailed {
        kind: String,
        #[source]
        source: TryReserveError,
    },

    /// A kernel panicked while computing.
    #[error("Computation failed for {kind}: {message}")]
    KernelPanicked { kind: String, message: String },

    /// The worker has shut down and no longer accepts requests.
    #[error("Worker is closed")]
    WorkerClosed,
}

impl EngineError {
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::UnknownKind { kind: kind.into() }
    }

    pub fn malformed_payload(kind: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedPayload {
            kind: kind.into(),
            source,
        }
    }

    pub fn allocation_failed(kind: impl Into<String>, source: TryReserveError) -> Self {
        Self::AllocationFailed {
            kind: kind.into(),
            source,
        }
    }

    pub fn kernel_panicked(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::KernelPanicked {
            kind: kind.into(),
            message: message.into(),
        }
    }
}
