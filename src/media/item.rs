//! Media reference representation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::media::url::{file_extension, file_name_without_extension};

/// Kind of media content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// Extension used when the URL carries none.
    pub fn default_extension(&self) -> &'static str {
        match self {
            MediaKind::Image => "png",
            MediaKind::Video => "mp4",
            MediaKind::Audio => "mp3",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

/// A media reference found in a post.
///
/// The URL is not necessarily downloadable as is: it may point to an embed
/// page, a redirect, or a streaming manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMedia")]
pub struct Media {
    kind: MediaKind,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<f64>,
}

#[derive(Deserialize)]
struct RawMedia {
    kind: MediaKind,
    url: String,
    #[serde(default)]
    aspect_ratio: Option<f64>,
}

impl TryFrom<RawMedia> for Media {
    type Error = Error;

    fn try_from(raw: RawMedia) -> Result<Self> {
        Ok(Media::new(raw.kind, raw.url)?.with_aspect_ratio(raw.aspect_ratio))
    }
}

impl Media {
    /// Create a media reference. The URL must not be blank.
    pub fn new(kind: MediaKind, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(Error::Media(format!("empty {} url", kind)));
        }

        Ok(Self {
            kind,
            url,
            aspect_ratio: None,
        })
    }

    pub fn image(url: impl Into<String>) -> Result<Self> {
        Self::new(MediaKind::Image, url)
    }

    pub fn video(url: impl Into<String>) -> Result<Self> {
        Self::new(MediaKind::Video, url)
    }

    pub fn audio(url: impl Into<String>) -> Result<Self> {
        Self::new(MediaKind::Audio, url)
    }

    /// Attach a width/height ratio reported by the page.
    pub fn with_aspect_ratio(mut self, aspect_ratio: Option<f64>) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Same kind of media, pointing somewhere else.
    pub fn with_url(&self, url: impl Into<String>) -> Result<Self> {
        Ok(Self::new(self.kind, url)?.with_aspect_ratio(self.aspect_ratio))
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    /// Extension taken from the URL path, or the kind default.
    pub fn extension(&self) -> Result<String> {
        Ok(file_extension(&self.url)?.unwrap_or_else(|| self.kind.default_extension().to_string()))
    }

    /// Last path segment of the URL without its extension.
    pub fn file_name_without_extension(&self) -> Result<String> {
        file_name_without_extension(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_url_rejected() {
        assert!(Media::image("").is_err());
        assert!(Media::video("   ").is_err());
    }

    #[test]
    fn test_extension_from_url() {
        let media = Media::image("https://cdn.example/x/y.jpg").unwrap();
        assert_eq!(media.extension().unwrap(), "jpg");
    }

    #[test]
    fn test_extension_defaults_per_kind() {
        let url = "https://embed.example/watch";
        assert_eq!(Media::image(url).unwrap().extension().unwrap(), "png");
        assert_eq!(Media::video(url).unwrap().extension().unwrap(), "mp4");
        assert_eq!(Media::audio(url).unwrap().extension().unwrap(), "mp3");
    }

    #[test]
    fn test_file_name_without_extension() {
        let media = Media::video("https://cdn.example/v/clip.final.mp4?sig=1").unwrap();
        assert_eq!(media.file_name_without_extension().unwrap(), "clip.final");
    }

    #[test]
    fn test_deserialize_validates_url() {
        let ok: Media = serde_json::from_str(r#"{"kind":"audio","url":"https://a.example/t.mp3"}"#)
            .unwrap();
        assert_eq!(ok.kind(), MediaKind::Audio);

        let blank = serde_json::from_str::<Media>(r#"{"kind":"image","url":""}"#);
        assert!(blank.is_err());
    }

    #[test]
    fn test_with_url_keeps_kind_and_ratio() {
        let media = Media::video("https://embed.example/v1")
            .unwrap()
            .with_aspect_ratio(Some(1.5));
        let next = media.with_url("https://cdn.example/v1.mp4").unwrap();

        assert_eq!(next.kind(), MediaKind::Video);
        assert_eq!(next.aspect_ratio(), Some(1.5));
        assert_eq!(next.url(), "https://cdn.example/v1.mp4");
    }
}
