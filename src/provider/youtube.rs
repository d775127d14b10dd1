//! YouTube links resolved through yt-dlp.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::media::Media;
use crate::provider::VideoHostResolver;

/// Host names served by YouTube.
pub const HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtu.be",
];

/// yt-dlp format selector for a single progressive mp4 stream.
const FORMAT: &str = "best[ext=mp4]/best";

/// Resolves YouTube watch links to a direct stream URL using `yt-dlp --get-url`.
#[derive(Debug, Clone)]
pub struct YoutubeResolver {
    program: PathBuf,
    timeout: Duration,
}

impl Default for YoutubeResolver {
    fn default() -> Self {
        Self::new("yt-dlp", Duration::from_secs(120))
    }
}

impl YoutubeResolver {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl VideoHostResolver for YoutubeResolver {
    fn hosts(&self) -> &[&str] {
        HOSTS
    }

    async fn resolve(&self, media: &Media) -> Result<Media> {
        tracing::debug!("Resolving {} with {}", media.url(), self.program.display());

        let command = Command::new(&self.program)
            .args(["--no-playlist", "--quiet", "-f", FORMAT, "--get-url", media.url()])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, command)
            .await
            .map_err(|_| Error::ProcessTimeout(self.timeout))?
            .map_err(|e| {
                Error::VideoHost(format!("Failed to run {}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            return Err(Error::VideoHost(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let direct = first_url(&stdout).ok_or_else(|| {
            Error::VideoHost(format!("No stream URL returned for {}", media.url()))
        })?;

        media.with_url(direct)
    }
}

/// First non-empty line of the tool's output.
fn first_url(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).find(|line| !line.is_empty())
}
