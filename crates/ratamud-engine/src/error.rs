//! Error types for the engine.

use ratamud_core::CoreError;
use thiserror::Error;

use crate::registry::ApiMode;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while driving an engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A player, world or map operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The engine's own state is inconsistent. The host should stop driving
    /// this engine.
    #[error("processing error: {0}")]
    Processing(String),

    /// The call belongs to one API family while another one is active.
    #[error("the {active} API is active")]
    ApiModeConflict {
        /// The family currently holding live state.
        active: ApiMode,
    },

    /// The simple API was used before `init`.
    #[error("the simple API is not initialized")]
    NotInitialized,

    /// `init` was called twice without `cleanup`.
    #[error("the simple API is already initialized")]
    AlreadyInitialized,
}
