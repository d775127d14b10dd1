//! Provider reading posts from a JSON feed document.
//!
//! The feed is either a local file or a URL serving:
//!
//! ```json
//! {
//!   "logo": "https://cdn.example/logo.png",
//!   "posts": [
//!     { "id": "p1", "media": [{ "kind": "image", "url": "https://cdn.example/x/y.jpg" }] }
//!   ]
//! }
//! ```
//!
//! A bare array of posts is accepted as well. `-` reads the document from stdin.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncReadExt;

use crate::error::Result;
use crate::media::{ImageSize, Media, Post};
use crate::net::HttpClient;
use crate::provider::Skraper;

/// Feed location meaning standard input.
const STDIN_URI: &str = "-";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    Feed {
        #[serde(default)]
        logo: Option<String>,
        #[serde(default)]
        posts: Vec<Post>,
    },
    Posts(Vec<Post>),
}

impl FeedDocument {
    fn into_parts(self) -> (Option<String>, Vec<Post>) {
        match self {
            FeedDocument::Feed { logo, posts } => (logo, posts),
            FeedDocument::Posts(posts) => (None, posts),
        }
    }
}

/// Reads posts from a JSON feed and follows HTTP redirects to resolve media.
pub struct FeedSkraper {
    name: String,
    client: Arc<dyn HttpClient>,
}

impl FeedSkraper {
    pub fn new(name: impl Into<String>, client: Arc<dyn HttpClient>) -> Self {
        Self {
            name: name.into(),
            client,
        }
    }

    async fn load(&self, uri: &str) -> Result<FeedDocument> {
        let content = if uri == STDIN_URI {
            let mut content = String::new();
            tokio::io::stdin().read_to_string(&mut content).await?;
            content
        } else if is_remote(uri) {
            self.client.fetch(uri).await?
        } else {
            tokio::fs::read_to_string(uri).await?
        };

        Ok(serde_json::from_str(&content)?)
    }
}

fn is_remote(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}

#[async_trait]
impl Skraper for FeedSkraper {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_latest_posts(&self, uri: &str, limit: usize) -> Result<Vec<Post>> {
        let (_, mut posts) = self.load(uri).await?.into_parts();
        posts.truncate(limit);

        tracing::debug!("Loaded {} posts from {}", posts.len(), uri);
        Ok(posts)
    }

    async fn resolve(&self, media: &Media) -> Result<Media> {
        if !is_remote(media.url()) {
            return Ok(media.clone());
        }

        let target = self.client.final_url(media.url()).await?;
        if target != media.url() {
            tracing::debug!("{} redirects to {}", media.url(), target);
        }

        media.with_url(target)
    }

    async fn get_page_logo_url(&self, uri: &str, _size: ImageSize) -> Result<Option<String>> {
        let (logo, _) = self.load(uri).await?.into_parts();
        Ok(logo)
    }
}
