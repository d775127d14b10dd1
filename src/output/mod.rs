//! Output module for console output, progress and exports.
//!
//! Provides:
//! - Colored console output
//! - Progress bars
//! - Statistics reporting
//! - Metadata export

pub mod console;
pub mod export;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_error, print_info, print_outcome, print_success, print_warning,
};
pub use export::{render_posts, write_export};
pub use progress::{create_download_bar, create_spinner};
pub use stats::print_batch_stats;
