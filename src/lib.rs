//! Skraper - export social network posts and download their media.
//!
//! Page parsing is done by providers implementing [`Skraper`]; this crate
//! turns the media references they produce into files on disk.
//!
//! # Features
//!
//! - Recursive resolution of embed/redirect links to direct links
//! - Dedicated resolution for video hosts (YouTube through yt-dlp)
//! - M3U8/HLS manifests remuxed to mp4 with ffmpeg, with timeout and kill
//! - Concurrent batch downloads with per-item outcomes
//! - Post metadata export
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use skraper::{
//!     download_all, FeedSkraper, FfmpegRunner, MediaDownloader, MediaResolver, ReqwestClient,
//!     Skraper,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(ReqwestClient::new("skraper", false)?);
//!     let skraper = Arc::new(FeedSkraper::new("web", client.clone()));
//!     let posts = skraper.get_latest_posts("posts.json", 10).await?;
//!
//!     let resolver = MediaResolver::new(skraper);
//!     let downloader = MediaDownloader::new(client, resolver, Arc::new(FfmpegRunner::default()));
//!
//!     for outcome in download_all(&downloader, &posts, Path::new("media"), 4).await {
//!         println!("{:?}", outcome);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod net;
pub mod output;
pub mod process;
pub mod provider;

// Re-exports for convenience
pub use config::{Config, OutputFormat, OverwritePolicy};
pub use download::{
    download_all, BatchStats, DownloadOptions, DownloadOutcome, MediaDownloader, MediaResolver,
    ResolvedMedia,
};
pub use error::{Error, Result};
pub use media::{ImageSize, Media, MediaKind, Post};
pub use net::{HttpClient, ReqwestClient};
pub use process::{FfmpegRunner, ProcessRunner};
pub use provider::{FeedSkraper, Skraper, VideoHostResolver, YoutubeResolver};
