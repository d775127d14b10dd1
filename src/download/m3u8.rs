//! M3U8/HLS manifests remuxed to MP4 with ffmpeg.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::process::ProcessRunner;

/// Extension identifying a streaming manifest.
pub const MANIFEST_EXTENSION: &str = "m3u8";

/// Extension of the remuxed output.
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Whether a resolved extension names a streaming manifest.
pub fn is_manifest(extension: &str) -> bool {
    extension.eq_ignore_ascii_case(MANIFEST_EXTENSION)
}

/// ffmpeg arguments copying the streams of `manifest_url` into `output`.
pub fn remux_args(manifest_url: &str, output: &Path, overwrite: bool) -> Vec<String> {
    let mut args = Vec::with_capacity(9);
    if overwrite {
        args.push("-y".to_string());
    }
    args.extend(
        [
            "-i",
            manifest_url,
            "-c",
            "copy",
            "-bsf:a",
            "aac_adtstoasc",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    args.push(output.to_string_lossy().into_owned());
    args
}

/// Remux the manifest into `output` (already ending in `.mp4`).
///
/// The returned path is `output` whatever ffmpeg exits with; a non-zero exit
/// is only logged.
pub async fn download_m3u8(
    runner: &dyn ProcessRunner,
    manifest_url: &str,
    output: &Path,
    overwrite: bool,
    timeout: Duration,
) -> Result<PathBuf> {
    if output.to_str().is_none() {
        return Err(Error::FFmpeg("Invalid path encoding for output".into()));
    }

    let args = remux_args(manifest_url, output, overwrite);
    let code = runner.run(&args, timeout).await?;

    if code != 0 {
        tracing::warn!(
            "ffmpeg exited with status {} while writing {}",
            code,
            output.display()
        );
    }

    Ok(output.to_path_buf())
}
