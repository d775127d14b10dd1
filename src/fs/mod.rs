//! Filesystem module.
//!
//! Provides:
//! - Path and directory management
//! - Filename generation and sanitising

pub mod naming;
pub mod paths;

pub use naming::{make_unique_filename, media_file_name, sanitize_filename, sanitize_path_component};
pub use paths::{ensure_dir, export_file, media_directory, output_root};
