//! Error types for the skraper application.

use std::time::Duration;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Media errors
    #[error("Invalid media: {0}")]
    Media(String),

    #[error("Cannot resolve direct link for {url}: {reason}")]
    UnresolvableMedia { url: String, reason: String },

    #[error("Video host error: {0}")]
    VideoHost(String),

    // Download errors
    #[error("Download of {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: Box<Error>,
    },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // External tool errors
    #[error("Process did not finish within {0:?}")]
    ProcessTimeout(Duration),

    #[error("FFmpeg error: {0}")]
    FFmpeg(String),

    #[error("FFmpeg not found. Please install ffmpeg and ensure it's in your PATH.")]
    FFmpegNotFound,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Wrap an error raised while persisting the media at `url`.
    pub fn download(url: impl Into<String>, source: Error) -> Self {
        Error::Download {
            url: url.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FETCH_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_keeps_cause() {
        let err = Error::download(
            "https://cdn.example/a.jpg",
            Error::HttpStatus {
                url: "https://cdn.example/a.jpg".into(),
                status: 404,
            },
        );

        let message = err.to_string();
        assert!(message.contains("https://cdn.example/a.jpg"));
        assert!(message.contains("HTTP 404"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_timeout_message() {
        let err = Error::ProcessTimeout(Duration::from_millis(200));
        assert_eq!(err.to_string(), "Process did not finish within 200ms");
    }
}
