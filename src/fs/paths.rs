//! Path and directory management.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::fs::naming::sanitize_path_component;

/// Timestamp appended to metadata export files.
const EXPORT_TIMESTAMP_FORMAT: &str = "%d%m%Y_%H%M%S";

/// Root directory for output: the parent when `output` is an existing file.
pub fn output_root(output: &Path) -> PathBuf {
    if output.is_file() {
        output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        output.to_path_buf()
    }
}

/// Directory receiving the media of `requested_path` on `provider`.
///
/// `<root>/<provider>/<requested path segments...>`
pub fn media_directory(root: &Path, provider: &str, requested_path: &str) -> Result<PathBuf> {
    let mut dir = root.join(sanitize_path_component(provider)?);

    for segment in requested_path.split('/').filter(|s| !s.is_empty()) {
        dir = dir.join(sanitize_path_component(segment)?);
    }

    Ok(dir)
}

/// Metadata export file: `<root>/<provider>/<requested path>_<timestamp>.<ext>`.
pub fn export_file(
    root: &Path,
    provider: &str,
    requested_path: &str,
    extension: &str,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    let dir = media_directory(root, provider, requested_path)?;
    let stamp = now.format(EXPORT_TIMESTAMP_FORMAT);

    if requested_path.trim_matches('/').is_empty() {
        return Ok(dir.join(format!("{}.{}", stamp, extension)));
    }

    let last = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(dir.with_file_name(format!("{}_{}.{}", last, stamp, extension)))
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 6)
            .unwrap()
    }

    #[test]
    fn test_media_directory() {
        let dir = media_directory(Path::new("/downloads"), "vk", "/team/wall/").unwrap();
        assert_eq!(dir, PathBuf::from("/downloads/vk/team/wall"));

        assert!(media_directory(Path::new("/downloads"), "vk", "../etc").is_err());
    }

    #[test]
    fn test_export_file() {
        let path = export_file(Path::new("/out"), "vk", "team", "json", noon()).unwrap();
        assert_eq!(path, PathBuf::from("/out/vk/team_09032024_140506.json"));

        let path = export_file(Path::new("/out"), "vk", "/", "log", noon()).unwrap();
        assert_eq!(path, PathBuf::from("/out/vk/09032024_140506.log"));
    }

    #[test]
    fn test_output_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("posts.json");
        std::fs::write(&file, "[]").unwrap();

        assert_eq!(output_root(&file), dir.path());
        assert_eq!(output_root(dir.path()), dir.path());
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
