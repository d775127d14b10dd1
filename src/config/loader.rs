//! Configuration structures and loading logic.

use crate::config::modes::OverwritePolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub ffmpeg: FfmpegConfig,

    #[serde(default)]
    pub youtube: YoutubeConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

/// Media download options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Root directory for output.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Number of media downloaded at the same time.
    #[serde(default = "default_parallel_downloads")]
    pub parallel_downloads: usize,

    /// Extra indirection hops followed when resolving media.
    #[serde(default = "default_max_resolve_depth")]
    pub max_resolve_depth: u32,

    /// Behaviour when a destination file exists.
    #[serde(default)]
    pub overwrite: OverwritePolicy,

    /// Exit code after a completed media run.
    #[serde(default)]
    pub success_exit_code: u8,

    /// Whether to show progress bars for large files.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: None,
            parallel_downloads: default_parallel_downloads(),
            max_resolve_depth: default_max_resolve_depth(),
            overwrite: OverwritePolicy::default(),
            success_exit_code: 0,
            show_progress: true,
        }
    }
}

/// Transcoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FfmpegConfig {
    #[serde(default = "default_ffmpeg_program")]
    pub program: PathBuf,

    /// Timeout of a manifest remux.
    #[serde(default = "default_ffmpeg_timeout")]
    pub timeout_secs: u64,

    /// Interval between liveness checks.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Timeout of the availability check.
    #[serde(default = "default_check_timeout")]
    pub check_timeout_secs: u64,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            program: default_ffmpeg_program(),
            timeout_secs: default_ffmpeg_timeout(),
            poll_interval_ms: default_poll_interval(),
            check_timeout_secs: default_check_timeout(),
        }
    }
}

impl FfmpegConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }
}

/// yt-dlp settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    #[serde(default = "default_ytdlp_program")]
    pub program: PathBuf,

    #[serde(default = "default_ytdlp_timeout")]
    pub timeout_secs: u64,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            program: default_ytdlp_program(),
            timeout_secs: default_ytdlp_timeout(),
        }
    }
}

impl YoutubeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0".to_string()
}

fn default_true() -> bool {
    true
}

fn default_parallel_downloads() -> usize {
    4
}

fn default_max_resolve_depth() -> u32 {
    crate::download::DEFAULT_MAX_RESOLVE_DEPTH
}

fn default_ffmpeg_program() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffmpeg_timeout() -> u64 {
    60 * 60
}

fn default_poll_interval() -> u64 {
    50
}

fn default_check_timeout() -> u64 {
    1
}

fn default_ytdlp_program() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_ytdlp_timeout() -> u64 {
    120
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective output directory.
    ///
    /// Falls back to the user's download directory, then the working directory.
    pub fn download_directory(&self) -> PathBuf {
        self.download.directory.clone().unwrap_or_else(|| {
            directories::UserDirs::new()
                .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
                .or_else(|| std::env::current_dir().ok())
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.download.parallel_downloads, 4);
        assert_eq!(config.download.max_resolve_depth, 2);
        assert_eq!(config.download.overwrite, OverwritePolicy::Overwrite);
        assert_eq!(config.download.success_exit_code, 0);
        assert_eq!(config.ffmpeg.timeout(), Duration::from_secs(3600));
        assert_eq!(config.ffmpeg.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.ffmpeg.check_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [download]
            parallel_downloads = 8
            overwrite = "rename"

            [ffmpeg]
            program = "/opt/ffmpeg/bin/ffmpeg"
            "#,
        )
        .unwrap();

        assert_eq!(config.download.parallel_downloads, 8);
        assert_eq!(config.download.overwrite, OverwritePolicy::Rename);
        assert_eq!(config.ffmpeg.program, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.ffmpeg.timeout_secs, 3600);
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skraper.toml");
        std::fs::write(
            &path,
            "[download]\ndirectory = \"/media\"\nsuccess_exit_code = 1\n",
        )
        .unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.download.directory, Some(PathBuf::from("/media")));
        assert_eq!(loaded.download.success_exit_code, 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_explicit_directory_wins() {
        let mut config = Config::default();
        config.download.directory = Some(PathBuf::from("/srv/media"));
        assert_eq!(config.download_directory(), PathBuf::from("/srv/media"));
    }
}
