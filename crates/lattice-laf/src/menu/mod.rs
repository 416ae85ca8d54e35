//! Menus: actions, menu trees, the selection path and accelerator routing.

mod accelerator;
mod action;
mod node;
mod selection;

pub use accelerator::{AcceleratorMatch, MenuAcceleratorRouter, MenuHost};
pub use action::{Action, ActionEvent};
pub use node::{MenuBar, MenuItem, MenuNode, SubMenu};
pub use selection::{MenuElement, MenuElementKind, MenuSelectionManager};
