use crate::handle::Handle;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when creating or manipulating players, worlds and maps.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A constructor or setter received a malformed argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The handle was never issued, or the resource behind it has been released.
    #[error("invalid handle: {0}")]
    InvalidHandle(Handle),

    /// The map name did not resolve to any map.
    #[error("map not found: \"{0}\"")]
    MapNotFound(String),

    /// The map resolved but its data failed validation.
    #[error("invalid map \"{name}\": {reason}")]
    InvalidMap {
        /// The requested map name.
        name: String,
        /// Why the map was rejected.
        reason: String,
    },

    /// The map source could not be read or parsed.
    #[error("failed to read map \"{name}\": {message}")]
    MapSource {
        /// The requested map name.
        name: String,
        /// The underlying I/O or parse error, rendered as text.
        message: String,
    },
}
