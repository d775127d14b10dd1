//! Download module for media persistence.
//!
//! This module provides:
//! - Direct link resolution
//! - Single media downloading (direct copy or manifest remux)
//! - Concurrent batch downloading
//! - Batch statistics

pub mod batch;
pub mod m3u8;
pub mod media;
pub mod resolver;
pub mod state;

pub use batch::{download_all, DownloadOutcome};
pub use media::{DownloadOptions, MediaDownloader};
pub use resolver::{MediaResolver, ResolvedMedia, DEFAULT_MAX_RESOLVE_DEPTH};
pub use state::BatchStats;
