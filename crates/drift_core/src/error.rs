//! Error types for the motion simulation.

use thiserror::Error;

use crate::kinematics::EntityId;

/// Result type alias using [`MotionError`].
pub type Result<T> = std::result::Result<T, MotionError>;

/// Top-level error type for all motion simulation errors.
///
/// All failures at this layer are local and non-propagating: a bad snapshot
/// affects only its entity, never the session as a whole. No retries are
/// meaningful here (retries belong to the transport).
#[derive(Debug, Error)]
pub enum MotionError {
    /// Snapshot is missing a required field or carries an invalid value.
    #[error("Malformed snapshot: missing or invalid field '{field}'")]
    MalformedSnapshot {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Snapshot references an entity that has not been created locally.
    ///
    /// Recoverable: the entity-lifecycle collaborator is responsible for
    /// creating the entity before forwarding movement updates for it.
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// Attempted to create an entity with an id that is already tracked.
    #[error("Entity already exists: {0}")]
    DuplicateEntity(EntityId),

    /// Motion profile id not present in the registry.
    #[error("Unknown motion profile: '{0}'")]
    UnknownProfile(String),

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParse {
        /// Path (or source name) of the data that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Invalid internal state (serialization failures and the like).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Recording format version mismatch.
    #[error("Recording version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build understands.
        expected: u32,
        /// Version found in the file.
        found: u32,
    },
}
