/*!
 * gdipak - Repackage GDI disc dumps for GDEMU
 *
 * This library renames the descriptor and track files of a GDI dump to the
 * fixed names GDEMU expects, rewrites the file references inside the
 * descriptor to match, and copies or moves the result to an output
 * directory, optionally over a whole tree of game directories.
 */

pub mod config;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod naming;
pub mod packer;
pub mod report;
pub mod runner;
pub mod transpose;
pub mod types;
pub mod utils;


// Re-export main components for easier access
pub use config::Config;
pub use descriptor::{Descriptor, DescriptorEntry, DescriptorRewriter};
pub use error::{GdipakError, Result};
pub use naming::{canonical_name, canonical_path};
pub use packer::{CopyAction, FileAction, MoveAction, Packer, PackerState};
pub use report::{PackReport, PackedFile, ReportFormat, Reporter, RunReport};
pub use runner::{run, GameJob, Runner};
pub use transpose::transpose;
pub use types::{FileRole, GameFile, PackingAction, RecursionMode};
pub use utils::format_file_size;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
