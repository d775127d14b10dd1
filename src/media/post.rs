//! Post representation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::media::item::Media;

/// Requested size of a page logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// A post scraped from a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Provider-scoped identifier, also used as the base filename.
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Publication time, epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views_count: Option<u64>,

    #[serde(default)]
    pub media: Vec<Media>,
}

impl Post {
    /// Create a post with only an id and its media.
    pub fn new(id: impl Into<String>, media: Vec<Media>) -> Self {
        Self {
            id: id.into(),
            text: None,
            published_at: None,
            rating: None,
            comments_count: None,
            views_count: None,
            media,
        }
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Post(id={}", self.id)?;
        if let Some(text) = &self.text {
            write!(f, ", text={:?}", text)?;
        }
        if let Some(published_at) = self.published_at {
            write!(f, ", published_at={}", published_at)?;
        }
        if let Some(rating) = self.rating {
            write!(f, ", rating={}", rating)?;
        }
        if let Some(comments) = self.comments_count {
            write!(f, ", comments={}", comments)?;
        }
        if let Some(views) = self.views_count {
            write!(f, ", views={}", views)?;
        }
        let urls: Vec<&str> = self.media.iter().map(Media::url).collect();
        write!(f, ", media=[{}])", urls.join(", "))
    }
}
