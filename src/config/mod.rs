//! Configuration module for skraper.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Output format and overwrite policy definitions
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{Config, DownloadConfig, FfmpegConfig, HttpConfig, YoutubeConfig};
pub use modes::{OutputFormat, OverwritePolicy};
pub use validation::{validate_config, validate_parallelism, validate_provider_name};
