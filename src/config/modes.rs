//! Output format and overwrite policy definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happens when a download's destination file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Replace the file (default).
    #[default]
    Overwrite,
    /// Keep the file and report it as the download result.
    Skip,
    /// Write next to it with a `_N` suffix.
    Rename,
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverwritePolicy::Overwrite => write!(f, "overwrite"),
            OverwritePolicy::Skip => write!(f, "skip"),
            OverwritePolicy::Rename => write!(f, "rename"),
        }
    }
}

impl FromStr for OverwritePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(OverwritePolicy::Overwrite),
            "skip" => Ok(OverwritePolicy::Skip),
            "rename" => Ok(OverwritePolicy::Rename),
            _ => Err(format!("Unknown overwrite policy: {}", s)),
        }
    }
}

/// Format of a metadata export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per post, also printed to the console.
    #[default]
    Log,
    /// Pretty printed JSON array.
    Json,
    /// `<posts>` document with one `<post>` element per post.
    Xml,
    Yaml,
    /// Header row and one row per post.
    Csv,
}

impl OutputFormat {
    /// Extension of export files.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Log => "log",
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" => Ok(OutputFormat::Log),
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
