//! Media file downloading.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::OverwritePolicy;
use crate::download::m3u8::{download_m3u8, is_manifest, OUTPUT_EXTENSION};
use crate::download::resolver::MediaResolver;
use crate::error::{Error, Result};
use crate::fs::{make_unique_filename, sanitize_filename};
use crate::media::{ImageSize, Media};
use crate::net::HttpClient;
use crate::process::{ProcessRunner, DEFAULT_PROCESS_TIMEOUT};

/// Filename used for page logos.
const LOGO_FILENAME: &str = "logo";

/// Persistence options.
#[derive(Debug, Clone, Copy)]
pub struct DownloadOptions {
    /// Timeout of a manifest remux.
    pub manifest_timeout: Duration,

    /// What to do when the destination file already exists.
    pub overwrite: OverwritePolicy,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            manifest_timeout: DEFAULT_PROCESS_TIMEOUT,
            overwrite: OverwritePolicy::default(),
        }
    }
}

/// Resolves media and writes them to disk.
#[derive(Clone)]
pub struct MediaDownloader {
    client: Arc<dyn HttpClient>,
    resolver: MediaResolver,
    runner: Arc<dyn ProcessRunner>,
    options: DownloadOptions,
}

impl MediaDownloader {
    pub fn new(
        client: Arc<dyn HttpClient>,
        resolver: MediaResolver,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            client,
            resolver,
            runner,
            options: DownloadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DownloadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolver(&self) -> &MediaResolver {
        &self.resolver
    }

    /// Download `media` into `dest_dir` as `filename.<extension>`.
    ///
    /// Streaming manifests are remuxed to `filename.mp4`. Any failure is
    /// returned as [`Error::Download`] carrying the media URL.
    pub async fn download(&self, media: &Media, dest_dir: &Path, filename: &str) -> Result<PathBuf> {
        self.try_download(media, dest_dir, Some(filename))
            .await
            .map_err(|e| Error::download(media.url(), e))
    }

    /// Download `media` under the name suggested by its video host, or else
    /// the last segment of its URL.
    pub async fn download_with_default_name(&self, media: &Media, dest_dir: &Path) -> Result<PathBuf> {
        self.try_download(media, dest_dir, None)
            .await
            .map_err(|e| Error::download(media.url(), e))
    }

    /// Download the logo of the page at `uri`, if it has one.
    pub async fn download_page_logo(
        &self,
        uri: &str,
        size: ImageSize,
        dest_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let logo_url = self.resolver.skraper().get_page_logo_url(uri, size).await?;

        match logo_url {
            Some(url) => {
                let media = Media::image(url)?;
                Ok(Some(self.download(&media, dest_dir, LOGO_FILENAME).await?))
            }
            None => Ok(None),
        }
    }

    async fn try_download(
        &self,
        media: &Media,
        dest_dir: &Path,
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        let resolved = self.resolver.resolve(media).await?;
        let filename = match (filename, &resolved.suggested_name) {
            (Some(name), _) => sanitize_filename(name)?,
            (None, Some(suggested)) => sanitize_filename(suggested)?,
            (None, None) => sanitize_filename(&media.file_name_without_extension()?)?,
        };

        // Ensure target directory exists
        tokio::fs::create_dir_all(dest_dir).await?;

        let dest = dest_dir.join(format!("{}.{}", filename, resolved.extension));

        if is_manifest(&resolved.extension) {
            let dest = dest.with_extension(OUTPUT_EXTENSION);
            let Some(dest) = self.claim(dest) else {
                return Ok(dest_dir.join(format!("{}.{}", filename, OUTPUT_EXTENSION)));
            };

            let overwrite = self.options.overwrite == OverwritePolicy::Overwrite;
            let path = download_m3u8(
                self.runner.as_ref(),
                &resolved.direct_url,
                &dest,
                overwrite,
                self.options.manifest_timeout,
            )
            .await?;

            tracing::info!("Downloaded: {}", path.display());
            return Ok(path);
        }

        let Some(dest) = self.claim(dest.clone()) else {
            return Ok(dest);
        };

        self.client.download(&resolved.direct_url, &dest).await?;

        tracing::info!("Downloaded: {}", dest.display());
        Ok(dest)
    }

    /// Apply the overwrite policy; `None` means keep the existing file.
    fn claim(&self, dest: PathBuf) -> Option<PathBuf> {
        if !dest.exists() {
            return Some(dest);
        }

        match self.options.overwrite {
            OverwritePolicy::Overwrite => Some(dest),
            OverwritePolicy::Skip => {
                tracing::debug!("Skipping existing file: {}", dest.display());
                None
            }
            OverwritePolicy::Rename => Some(make_unique_filename(&dest)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::download::resolver::tests::{FakeTube, HopSkraper};
    use crate::provider::FeedSkraper;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Writes the URL itself as the file body; URLs containing `fail` error out.
    #[derive(Default)]
    pub(crate) struct EchoClient {
        pub downloads: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpClient for EchoClient {
        async fn fetch(&self, url: &str) -> Result<String> {
            Ok(url.to_string())
        }

        async fn download(&self, url: &str, dest: &Path) -> Result<()> {
            if url.contains("fail") {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                )));
            }
            self.downloads.lock().unwrap().push(url.to_string());
            tokio::fs::write(dest, url.as_bytes()).await?;
            Ok(())
        }

        async fn final_url(&self, url: &str) -> Result<String> {
            Ok(url.to_string())
        }
    }

    /// Records arguments instead of spawning anything.
    #[derive(Default)]
    pub(crate) struct RecordingRunner {
        pub calls: Mutex<Vec<(Vec<String>, Duration)>>,
        pub exit_code: i32,
    }

    #[async_trait]
    impl ProcessRunner for RecordingRunner {
        async fn run(&self, args: &[String], timeout: Duration) -> Result<i32> {
            self.calls.lock().unwrap().push((args.to_vec(), timeout));
            Ok(self.exit_code)
        }
    }

    pub(crate) fn downloader(
        client: Arc<EchoClient>,
        runner: Arc<RecordingRunner>,
        ext: &'static str,
    ) -> MediaDownloader {
        let resolver = MediaResolver::new(Arc::new(HopSkraper::new(1, ext)));
        MediaDownloader::new(client, resolver, runner)
    }

    #[tokio::test]
    async fn test_direct_image_download() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(EchoClient::default());
        let d = downloader(client.clone(), Arc::default(), "jpg");
        let media = Media::image("https://cdn.example/x/y.jpg").unwrap();

        let path = d.download(&media, dir.path(), "p1").await.unwrap();

        assert_eq!(path, dir.path().join("p1.jpg"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "https://cdn.example/x/y.jpg"
        );
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("vk").join("user");
        let d = downloader(Arc::default(), Arc::default(), "jpg");
        let media = Media::audio("https://cdn.example/a/t.mp3").unwrap();

        let path = d.download(&media, &nested, "p1").await.unwrap();
        assert_eq!(path, nested.join("p1.mp3"));
        assert!(path.is_file());
    }

    #[tokio::test]
    async fn test_manifest_is_remuxed_to_mp4() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(EchoClient::default());
        let runner = Arc::new(RecordingRunner {
            exit_code: 1,
            ..Default::default()
        });
        let d = downloader(client.clone(), runner.clone(), "m3u8");
        let media = Media::video("https://embed.example/live").unwrap();

        let path = d.download(&media, dir.path(), "stream").await.unwrap();

        assert_eq!(path, dir.path().join("stream.mp4"));
        assert!(client.downloads.lock().unwrap().is_empty());

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (args, timeout) = &calls[0];
        assert_eq!(*timeout, DEFAULT_PROCESS_TIMEOUT);
        assert!(args.contains(&"https://embed.example/live/final.m3u8".to_string()));
        assert_eq!(args.last().unwrap(), &path.to_string_lossy().into_owned());
    }

    #[tokio::test]
    async fn test_failure_is_wrapped_with_url() {
        let dir = TempDir::new().unwrap();
        let d = downloader(Arc::default(), Arc::default(), "jpg");
        let media = Media::image("https://cdn.example/fail.jpg").unwrap();

        let err = d.download(&media, dir.path(), "p1").await.unwrap_err();
        match err {
            Error::Download { url, .. } => assert_eq!(url, "https://cdn.example/fail.jpg"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_traversal_filename_rejected() {
        let dir = TempDir::new().unwrap();
        let d = downloader(Arc::default(), Arc::default(), "jpg");
        let media = Media::image("https://cdn.example/a.jpg").unwrap();

        assert!(d.download(&media, dir.path(), "../p1").await.is_err());
    }

    #[tokio::test]
    async fn test_overwrite_policies() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("p1.jpg");
        std::fs::write(&existing, "old").unwrap();
        let media = Media::image("https://cdn.example/new.jpg").unwrap();

        let skip = downloader(Arc::default(), Arc::default(), "jpg").with_options(DownloadOptions {
            overwrite: OverwritePolicy::Skip,
            ..Default::default()
        });
        let path = skip.download(&media, dir.path(), "p1").await.unwrap();
        assert_eq!(path, existing);
        assert_eq!(std::fs::read_to_string(&existing).unwrap(), "old");

        let rename =
            downloader(Arc::default(), Arc::default(), "jpg").with_options(DownloadOptions {
                overwrite: OverwritePolicy::Rename,
                ..Default::default()
            });
        let path = rename.download(&media, dir.path(), "p1").await.unwrap();
        assert_eq!(path, dir.path().join("p1_1.jpg"));
        assert_eq!(std::fs::read_to_string(&existing).unwrap(), "old");

        let overwrite = downloader(Arc::default(), Arc::default(), "jpg");
        let path = overwrite.download(&media, dir.path(), "p1").await.unwrap();
        assert_eq!(path, existing);
        assert_eq!(
            std::fs::read_to_string(&existing).unwrap(),
            "https://cdn.example/new.jpg"
        );
    }

    #[tokio::test]
    async fn test_page_logo() {
        let dir = TempDir::new().unwrap();
        let feed = dir.path().join("feed.json");
        std::fs::write(&feed, r#"{"logo":"https://cdn.example/avatar.jpg","posts":[]}"#).unwrap();

        let client = Arc::new(EchoClient::default());
        let skraper = Arc::new(FeedSkraper::new("feed", client.clone()));
        let d = MediaDownloader::new(
            client,
            MediaResolver::new(skraper),
            Arc::new(RecordingRunner::default()),
        );

        let path = d
            .download_page_logo(feed.to_str().unwrap(), ImageSize::Small, dir.path())
            .await
            .unwrap();
        assert_eq!(path, Some(dir.path().join("logo.jpg")));
    }

    #[tokio::test]
    async fn test_default_name_from_url() {
        let dir = TempDir::new().unwrap();
        let d = downloader(Arc::default(), Arc::default(), "jpg");
        let media = Media::image("https://cdn.example/x/sunset.webp").unwrap();

        let path = d.download_with_default_name(&media, dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join("sunset.webp"));
    }

    #[tokio::test]
    async fn test_default_name_from_video_host() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(EchoClient::default());
        let resolver = MediaResolver::new(Arc::new(HopSkraper::new(1, "jpg")))
            .with_video_host(Arc::new(FakeTube));
        let d = MediaDownloader::new(client.clone(), resolver, Arc::new(RecordingRunner::default()));
        let media = Media::video("https://tube.example/watch?v=abc").unwrap();

        let path = d.download_with_default_name(&media, dir.path()).await.unwrap();

        assert_eq!(path, dir.path().join("clip.mp4"));
        assert_eq!(
            *client.downloads.lock().unwrap(),
            ["https://stream.example/abc/clip.webm"]
        );
    }
}
