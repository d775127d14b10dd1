//! Direct link resolution for media references.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::media::url::{file_extension, file_name_without_extension, url_host};
use crate::media::Media;
use crate::provider::{Skraper, VideoHostResolver};

/// Number of extra generic indirection hops followed before giving up.
pub const DEFAULT_MAX_RESOLVE_DEPTH: u32 = 2;

/// A link that can be fetched as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    /// Direct URL, never empty.
    pub direct_url: String,

    /// File extension without the leading dot, never empty.
    pub extension: String,

    /// Name suggested by a dedicated video host resolver.
    pub suggested_name: Option<String>,
}

/// Turns media references into direct links.
///
/// Checked in order for every hop:
/// 1. the URL already names a file with an extension;
/// 2. the host has a dedicated [`VideoHostResolver`];
/// 3. the provider's [`Skraper::resolve`] follows one hop and the result is
///    checked again, up to `max_depth` more times. When the budget is spent
///    the last URL is used with its extension or the kind default.
#[derive(Clone)]
pub struct MediaResolver {
    skraper: Arc<dyn Skraper>,
    video_hosts: Vec<Arc<dyn VideoHostResolver>>,
    max_depth: u32,
}

impl MediaResolver {
    pub fn new(skraper: Arc<dyn Skraper>) -> Self {
        Self {
            skraper,
            video_hosts: Vec::new(),
            max_depth: DEFAULT_MAX_RESOLVE_DEPTH,
        }
    }

    pub fn with_video_host(mut self, resolver: Arc<dyn VideoHostResolver>) -> Self {
        self.video_hosts.push(resolver);
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn skraper(&self) -> &Arc<dyn Skraper> {
        &self.skraper
    }

    /// Resolve with the configured depth budget.
    pub async fn resolve(&self, media: &Media) -> Result<ResolvedMedia> {
        self.resolve_with_depth(media, self.max_depth).await
    }

    pub async fn resolve_with_depth(&self, media: &Media, max_depth: u32) -> Result<ResolvedMedia> {
        let mut current = media.clone();
        let mut depth = max_depth;

        loop {
            let url = current.url();

            if let Some(extension) = file_extension(url).map_err(|e| unresolvable(url, e))? {
                tracing::debug!("{} is direct ({})", url, extension);
                return direct(url, extension, None);
            }

            if let Some(host) = self.video_host_for(url) {
                let resolved = host
                    .resolve(&current)
                    .await
                    .map_err(|e| unresolvable(url, e))?;
                let name = file_name_without_extension(resolved.url())
                    .map_err(|e| unresolvable(resolved.url(), e))?;

                tracing::debug!("{} resolved by video host to {}", url, resolved.url());
                return direct(resolved.url(), host.container().to_string(), Some(name));
            }

            let next = self.skraper.resolve(&current).await?;
            tracing::debug!("{} -> {} (depth {})", url, next.url(), depth);

            if depth == 0 {
                let extension = next.extension().map_err(|e| unresolvable(next.url(), e))?;
                tracing::debug!("Depth exhausted, using {} as is", next.url());
                return direct(next.url(), extension, None);
            }

            depth -= 1;
            current = next;
        }
    }

    fn video_host_for(&self, url: &str) -> Option<&Arc<dyn VideoHostResolver>> {
        let host = url_host(url)?;
        self.video_hosts.iter().find(|resolver| resolver.handles(&host))
    }
}

fn direct(url: &str, extension: String, suggested_name: Option<String>) -> Result<ResolvedMedia> {
    if url.is_empty() || extension.is_empty() {
        return Err(Error::UnresolvableMedia {
            url: url.to_string(),
            reason: "empty direct link".to_string(),
        });
    }

    Ok(ResolvedMedia {
        direct_url: url.to_string(),
        extension,
        suggested_name: suggested_name.filter(|name| !name.is_empty()),
    })
}

fn unresolvable(url: &str, cause: Error) -> Error {
    Error::UnresolvableMedia {
        url: url.to_string(),
        reason: cause.to_string(),
    }
}
