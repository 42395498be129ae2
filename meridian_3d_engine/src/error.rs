//! Error types for the Meridian3D engine
//!
//! This module defines the error types used throughout the engine:
//! scene hierarchy edits, geometry validation, camera math, and failures
//! reported by the graphics device collaborator.

use std::fmt;

/// Result type for Meridian3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Meridian3D engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Geometry cannot be drawn (missing `position` attribute, malformed buffer)
    GeometryInvalid(String),

    /// A matrix that must be invertible is not (camera world, projection-view)
    DegenerateTransform(String),

    /// A hierarchy edit would make a node its own ancestor
    InvalidHierarchy(String),

    /// A node key that does not exist in the scene
    NodeNotFound(String),

    /// Error reported by the graphics device (GL, Vulkan, etc.)
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::GeometryInvalid(msg) => write!(f, "Invalid geometry: {}", msg),
            Error::DegenerateTransform(msg) => write!(f, "Degenerate transform: {}", msg),
            Error::InvalidHierarchy(msg) => write!(f, "Invalid hierarchy: {}", msg),
            Error::NodeNotFound(msg) => write!(f, "Node not found: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an [`Error`] variant and log it as ERROR (with file:line).
///
/// # Example
///
/// ```ignore
/// let parent = self.nodes.get(key)
///     .ok_or_else(|| engine_err!(NodeNotFound, "meridian3d::Scene", "parent {:?}", key))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::meridian3d::Error::$variant(message)
    }};
}

/// Log an error and return it from the current function.
///
/// # Example
///
/// ```ignore
/// engine_bail!(InvalidHierarchy, "meridian3d::Scene", "node cannot parent itself");
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($variant:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($variant, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
