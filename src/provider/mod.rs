//! Providers: per-site page parsers and dedicated video host resolvers.
//!
//! This module provides:
//! - The [`Skraper`] site parser interface
//! - The [`VideoHostResolver`] interface for hosts needing a dedicated resolver
//! - A JSON feed provider
//! - A yt-dlp backed YouTube resolver

pub mod feed;
pub mod youtube;

use async_trait::async_trait;

use crate::error::Result;
use crate::media::{ImageSize, Media, Post};

pub use feed::FeedSkraper;
pub use youtube::YoutubeResolver;

/// A site parser.
#[async_trait]
pub trait Skraper: Send + Sync {
    /// Short provider name, used as a directory component.
    fn name(&self) -> &str;

    /// Latest posts of the page at `uri`, at most `limit`.
    async fn get_latest_posts(&self, uri: &str, limit: usize) -> Result<Vec<Post>>;

    /// Follow one indirection hop (embed page, redirect) of `media`.
    async fn resolve(&self, media: &Media) -> Result<Media>;

    /// Logo of the page at `uri`, if the page has one.
    async fn get_page_logo_url(&self, uri: &str, size: ImageSize) -> Result<Option<String>>;
}

/// Resolver for a video host whose pages never expose a direct link.
#[async_trait]
pub trait VideoHostResolver: Send + Sync {
    /// Host names handled by this resolver, lowercase.
    fn hosts(&self) -> &[&str];

    /// Container format of the resolved stream.
    fn container(&self) -> &str {
        "mp4"
    }

    /// Turn a page link into a direct stream link.
    async fn resolve(&self, media: &Media) -> Result<Media>;

    fn handles(&self, host: &str) -> bool {
        self.hosts().iter().any(|known| known.eq_ignore_ascii_case(host))
    }
}
