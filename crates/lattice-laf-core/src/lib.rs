//! Core systems for the Lattice look-and-feel layer.
//!
//! This crate provides the foundations the look-and-feel delegates build on:
//!
//! - **Component Tree**: windows, menus and widgets with parent/child and
//!   window-owner relationships, effective visibility and focusability
//! - **Signal/Slot System**: synchronous, re-entrant change notification
//! - **Thread Affinity**: debug checks that UI-thread state stays on the UI thread
//! - **Logging**: `tracing` targets and component tree visualization
//!
//! # Example
//!
//! ```
//! use lattice_laf_core::{ComponentKind, ComponentTree, Signal};
//!
//! let mut tree = ComponentTree::new();
//! let window = tree.create_window("main");
//! let field = tree.create_child(window, ComponentKind::Widget, "field").unwrap();
//! tree.set_focusable(field, true).unwrap();
//! assert!(tree.can_accept_focus(field));
//!
//! let focus_changed = Signal::<Option<lattice_laf_core::ComponentId>>::new();
//! focus_changed.connect(|owner| println!("focus now on {owner:?}"));
//! focus_changed.emit(Some(field));
//! ```

mod error;
pub mod logging;
pub mod object;
pub mod signal;
pub mod thread_check;

pub use error::{ComponentError, ComponentResult};
pub use logging::{ComponentTreeDebug, PerfSpan, TreeFormatOptions, TreeStyle};
pub use object::{ComponentId, ComponentKind, ComponentState, ComponentTree};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use thread_check::{are_thread_checks_enabled, set_thread_checks_enabled, ThreadAffinity};

// Compile-time verification that shared types can cross threads.
static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(ComponentTree: Send, Sync);
static_assertions::assert_impl_all!(ComponentId: Send, Sync, Copy);
