//! Concurrent download of every media attached to a list of posts.

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};

use crate::download::media::MediaDownloader;
use crate::fs::media_file_name;
use crate::media::{Media, MediaKind, Post};

/// Result of downloading one media of one post.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    Downloaded {
        post_id: String,
        kind: MediaKind,
        path: PathBuf,
    },
    Failed {
        post_id: String,
        kind: MediaKind,
        url: String,
        error: String,
    },
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Downloaded { .. })
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            DownloadOutcome::Downloaded { kind, .. } | DownloadOutcome::Failed { kind, .. } => *kind,
        }
    }

    pub fn post_id(&self) -> &str {
        match self {
            DownloadOutcome::Downloaded { post_id, .. } | DownloadOutcome::Failed { post_id, .. } => {
                post_id
            }
        }
    }
}

/// Download all media of `posts` into `dest_dir`, `concurrency` at a time.
///
/// A post with a single media is saved as `<id>.<ext>`, otherwise each media
/// becomes `<id>_<n>.<ext>` counting from 1. Returns once every item has
/// finished, one outcome per media, in completion order.
pub async fn download_all(
    downloader: &MediaDownloader,
    posts: &[Post],
    dest_dir: &Path,
    concurrency: usize,
) -> Vec<DownloadOutcome> {
    let items: Vec<(&Post, String, &Media)> = posts
        .iter()
        .flat_map(|post| {
            let total = post.media.len();
            post.media
                .iter()
                .enumerate()
                .map(move |(index, media)| (post, media_file_name(&post.id, index, total), media))
        })
        .collect();

    tracing::info!(
        "Downloading {} media from {} posts into {}",
        items.len(),
        posts.len(),
        dest_dir.display()
    );

    stream::iter(items)
        .map(|(post, filename, media)| async move {
            match downloader.download(media, dest_dir, &filename).await {
                Ok(path) => DownloadOutcome::Downloaded {
                    post_id: post.id.clone(),
                    kind: media.kind(),
                    path,
                },
                Err(e) => {
                    tracing::warn!("Cannot download {}: {}", media.url(), e);
                    DownloadOutcome::Failed {
                        post_id: post.id.clone(),
                        kind: media.kind(),
                        url: media.url().to_string(),
                        error: e.to_string(),
                    }
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}
