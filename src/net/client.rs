//! HTTP client used for page fetches and media downloads.

use std::path::Path;

use async_trait::async_trait;
use futures::{pin_mut, Stream, StreamExt};
use indicatif::ProgressBar;
use reqwest::{Client, Response};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::output::create_download_bar;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Network boundary of the crate.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch a document as text.
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Stream the body at `url` into `dest`, creating or truncating it.
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;

    /// URL reached after following redirects.
    async fn final_url(&self, url: &str) -> Result<String>;
}

/// reqwest-backed [`HttpClient`].
pub struct ReqwestClient {
    client: Client,
    show_progress: bool,
}

impl ReqwestClient {
    /// Create a new client sending the given user agent.
    pub fn new(user_agent: &str, show_progress: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            show_progress,
        })
    }

    /// Make a GET request and reject non-success statuses.
    async fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        Ok(response.text().await?)
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let response = self.get(url).await?;

        let content_length = response.content_length();
        let progress = match content_length {
            Some(len) if self.show_progress && len > PROGRESS_THRESHOLD => {
                Some(create_download_bar(len))
            }
            _ => None,
        };

        let result = save_stream(response.bytes_stream(), dest, progress.as_ref()).await;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let written = result?;
        tracing::debug!("Wrote {} bytes to {}", written, dest.display());
        Ok(())
    }

    async fn final_url(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        Ok(response.url().to_string())
    }
}

/// Stream chunks into `dest`; a partially written file is removed on failure.
async fn save_stream<S, B, E>(stream: S, dest: &Path, progress: Option<&ProgressBar>) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    Error: From<E>,
{
    match write_stream(stream, dest, progress).await {
        Ok(written) => Ok(written),
        Err(e) => {
            if let Err(remove) = tokio::fs::remove_file(dest).await {
                tracing::debug!("Cannot remove partial {}: {}", dest.display(), remove);
            }
            Err(e)
        }
    }
}

async fn write_stream<S, B, E>(stream: S, dest: &Path, progress: Option<&ProgressBar>) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    Error: From<E>,
{
    pin_mut!(stream);

    let mut file = File::create(dest).await?;
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let bytes = chunk.as_ref();
        file.write_all(bytes).await?;
        downloaded += bytes.len() as u64;

        if let Some(pb) = progress {
            pb.set_position(downloaded);
        }
    }

    file.flush().await?;
    Ok(downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_stream_written_to_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("a.jpg");
        let chunks: Vec<io::Result<Vec<u8>>> = vec![Ok(b"abc".to_vec()), Ok(b"def".to_vec())];

        let written = save_stream(futures::stream::iter(chunks), &dest, None)
            .await
            .unwrap();

        assert_eq!(written, 6);
        assert_eq!(std::fs::read(&dest).unwrap(), b"abcdef");
    }

    #[tokio::test]
    async fn test_interrupted_stream_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("a.jpg");
        let chunks: Vec<io::Result<Vec<u8>>> = vec![
            Ok(b"abc".to_vec()),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")),
            Ok(b"def".to_vec()),
        ];

        let result = save_stream(futures::stream::iter(chunks), &dest, None).await;

        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!dest.exists());
    }
}
