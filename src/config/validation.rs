//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;

/// Upper bound for download parallelism.
const MAX_PARALLEL_DOWNLOADS: usize = 64;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_parallelism(config.download.parallel_downloads)?;
    validate_positive("ffmpeg.timeout_secs", config.ffmpeg.timeout_secs)?;
    validate_positive("ffmpeg.poll_interval_ms", config.ffmpeg.poll_interval_ms)?;
    validate_positive("ffmpeg.check_timeout_secs", config.ffmpeg.check_timeout_secs)?;
    validate_positive("youtube.timeout_secs", config.youtube.timeout_secs)?;

    if config.ffmpeg.program.as_os_str().is_empty() {
        return Err(Error::MissingConfig("ffmpeg.program".to_string()));
    }

    if config.http.user_agent.trim().is_empty() {
        return Err(Error::MissingConfig("http.user_agent".to_string()));
    }

    Ok(())
}

/// Validate the number of concurrent downloads.
pub fn validate_parallelism(parallel: usize) -> Result<()> {
    if parallel == 0 || parallel > MAX_PARALLEL_DOWNLOADS {
        return Err(Error::ConfigValidation {
            field: "download.parallel_downloads".to_string(),
            message: format!(
                "Must be between 1 and {} (got {})",
                MAX_PARALLEL_DOWNLOADS, parallel
            ),
        });
    }

    Ok(())
}

fn validate_positive(field: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Must be greater than zero".to_string(),
        });
    }

    Ok(())
}

/// Validate a provider name used as a directory component.
pub fn validate_provider_name(name: &str) -> Result<()> {
    let pattern = Regex::new(r"^[a-z0-9_-]{1,32}$")
        .map_err(|e| Error::Config(format!("Invalid provider pattern: {}", e)))?;

    if !pattern.is_match(name) {
        return Err(Error::ConfigValidation {
            field: "provider".to_string(),
            message: format!(
                "Provider '{}' must be 1-32 lowercase letters, digits, hyphens or underscores",
                name
            ),
        });
    }

    Ok(())
}
