//! Directory listings for file choosers.
//!
//! - [`FileSystem`] / [`LocalFileSystem`]: enumeration and renaming
//! - [`FileFilter`]: glob or predicate filters
//! - [`DirectoryModel`]: the cached, filtered, directories-first listing
//! - [`FileChooser`]: chooser settings and selection, revalidating the model
//!   whenever a setting changes
//!
//! # Example
//!
//! ```ignore
//! use lattice_laf::file::{FileChooser, FileFilter};
//!
//! let chooser = FileChooser::local();
//! chooser.set_filter(Some(FileFilter::glob("Rust Files", &["*.rs"])?));
//! chooser.set_current_directory("src");
//! for entry in chooser.model().entries() {
//!     println!("{}{}", entry.name, if entry.is_directory { "/" } else { "" });
//! }
//! ```

mod chooser;
mod error;
mod filter;
mod model;
mod system;

pub use chooser::{ChooserProperty, FileChooser};
pub use error::{FileError, FileErrorKind, FileResult};
pub use filter::FileFilter;
pub use model::{DirectoryModel, FileSelectionMode, ListingOptions};
pub use system::{DirectoryEntry, FileSystem, LocalFileSystem, is_hidden_name};
