//! Error types for the Lattice look-and-feel core.

use thiserror::Error;

use crate::object::ComponentId;

/// Errors that can occur while mutating or querying the component tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    /// The component ID is invalid or the component has been destroyed.
    #[error("invalid or destroyed component {0:?}")]
    InvalidComponent(ComponentId),
    /// Attempted to set a component as its own parent or ancestor.
    #[error("cannot make {0:?} its own parent or ancestor")]
    CircularParentage(ComponentId),
    /// The operation requires a window (root pane) component.
    #[error("component {0:?} is not a window")]
    NotAWindow(ComponentId),
    /// Windows are top-level; they cannot be placed under another component.
    #[error("a window cannot be placed under component {0:?}")]
    WindowParent(ComponentId),
}

/// A specialized Result type for component tree operations.
pub type ComponentResult<T> = std::result::Result<T, ComponentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    #[test]
    fn test_error_display() {
        let id = ComponentId::from(KeyData::from_ffi(1));
        let err = ComponentError::NotAWindow(id);
        assert!(err.to_string().contains("is not a window"));
    }
}
