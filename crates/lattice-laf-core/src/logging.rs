//! Logging and debugging facilities for the look-and-feel layer.
//!
//! This module provides:
//! - Target names for filtering `tracing` output by subsystem
//! - Debug visualization for component trees
//! - Performance tracing hooks for profiling
//!
//! Nothing here installs a subscriber. Applications (and tests) do that:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("lattice_laf::accelerator=trace,lattice_laf::focus=debug")
//!     .init();
//! ```

use std::fmt::{self, Write as FmtWrite};

use crate::error::ComponentResult;
use crate::object::{ComponentId, ComponentTree};

/// Span names used for tracing.
pub mod span_names {
    /// Accelerator routing span.
    pub const ACCELERATOR: &str = "lattice_laf::accelerator";
    /// Menu focus coordination span.
    pub const FOCUS_COORDINATION: &str = "lattice_laf::focus_coordination";
    /// Directory validation span.
    pub const DIRECTORY_SCAN: &str = "lattice_laf::directory_scan";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "lattice_laf_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "lattice_laf_core::signal";
    /// Component tree target.
    pub const COMPONENT: &str = "lattice_laf_core::component";
    /// Key dispatch target.
    pub const KEYS: &str = "lattice_laf::keys";
    /// Accelerator routing target.
    pub const ACCELERATOR: &str = "lattice_laf::accelerator";
    /// Menu selection path target.
    pub const MENU_SELECTION: &str = "lattice_laf::menu_selection";
    /// Focus management and menu focus coordination target.
    pub const FOCUS: &str = "lattice_laf::focus";
    /// Directory model and file chooser target.
    pub const DIRECTORY: &str = "lattice_laf::directory";
    /// Performance spans target.
    pub const PERF: &str = "lattice_laf::perf";
}

/// Style options for component tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Configuration for component tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show component ids.
    pub show_ids: bool,
    /// Whether to show visible/enabled/focusable flags.
    pub show_state: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_state: true,
            max_depth: None,
        }
    }
}

/// Debug utility for visualizing a [`ComponentTree`].
///
/// Owned windows are printed below their owner, marked `(owned)`.
pub struct ComponentTreeDebug<'a> {
    tree: &'a ComponentTree,
    options: TreeFormatOptions,
}

impl<'a> ComponentTreeDebug<'a> {
    /// Create a new debug visualizer with default options.
    pub fn new(tree: &'a ComponentTree) -> Self {
        Self {
            tree,
            options: TreeFormatOptions::default(),
        }
    }

    /// Set custom options.
    pub fn with_options(mut self, options: TreeFormatOptions) -> Self {
        self.options = options;
        self
    }

    /// Format every unowned window and everything below it.
    pub fn format_all(&self) -> ComponentResult<String> {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "Component Tree ({} components):",
            self.tree.component_count()
        );

        let mut roots: Vec<ComponentId> = Vec::new();
        for window in self.tree.windows() {
            if self.tree.owner(window)?.is_none() {
                roots.push(window);
            }
        }
        if roots.is_empty() {
            let _ = writeln!(output, "  (empty)");
        }
        for root in roots {
            self.format_into(root, 0, &mut output)?;
        }
        Ok(output)
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree(&self, root: ComponentId) -> ComponentResult<String> {
        let mut output = String::new();
        self.format_into(root, 0, &mut output)?;
        Ok(output)
    }

    fn format_into(&self, id: ComponentId, depth: usize, output: &mut String) -> ComponentResult<()> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        let indent = match self.options.style {
            TreeStyle::Ascii => "|  ",
            TreeStyle::Unicode => "\u{2502}  ",
        };
        let connector = match self.options.style {
            TreeStyle::Ascii => "+- ",
            TreeStyle::Unicode => "\u{251c}\u{2500} ",
        };
        if depth > 0 {
            for _ in 0..depth - 1 {
                output.push_str(indent);
            }
            output.push_str(connector);
        }

        let name = self.tree.name(id)?;
        output.push_str(if name.is_empty() { "(unnamed)" } else { name });
        if let Some(kind) = self.tree.kind(id) {
            let _ = write!(output, " <{kind:?}>");
        }
        if self.options.show_ids {
            let _ = write!(output, " [{id:?}]");
        }
        if self.options.show_state {
            let state = self.tree.state(id)?;
            if !state.visible {
                output.push_str(" hidden");
            }
            if !state.enabled {
                output.push_str(" disabled");
            }
            if state.focusable {
                output.push_str(" focusable");
            }
        }
        if self.tree.kind(id).is_some_and(|k| k.is_window()) && self.tree.owner(id)?.is_some() {
            output.push_str(" (owned)");
        }
        output.push('\n');

        for &child in self.tree.children(id)? {
            self.format_into(child, depth + 1, output)?;
        }

        let owned: Vec<ComponentId> = self
            .tree
            .windows()
            .filter(|&w| self.tree.owner(w).ok().flatten() == Some(id))
            .collect();
        for window in owned {
            self.format_into(window, depth + 1, output)?;
        }
        Ok(())
    }
}

impl fmt::Display for ComponentTreeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format_all() {
            Ok(output) => write!(f, "{}", output),
            Err(e) => write!(f, "Error formatting component tree: {}", e),
        }
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time directory scans and accelerator searches.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "lattice_laf::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
