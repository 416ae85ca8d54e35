//! Keyboard focus: the focus manager and the shared menu focus coordinator.

mod coordinator;
mod host;
mod manager;

pub use coordinator::{CoordinatorHandle, CoordinatorOptions, CoordinatorPhase, MenuFocusCoordinator};
pub use host::{FocusHost, KeyListener, KeyListenerId};
pub use manager::{FocusManager, FocusReason};
