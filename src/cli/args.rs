//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, OutputFormat, OverwritePolicy};

/// Social network posts scraper CLI.
#[derive(Parser, Debug)]
#[command(
    name = "skraper",
    version,
    about = "Export post metadata or download post media",
    long_about = "Reads posts produced by a page parser (a local JSON file or a feed URL) and \
                  either exports their metadata or downloads every attached image, video and audio.\n\n\
                  Streaming manifests (m3u8) are remuxed to mp4 with ffmpeg."
)]
pub struct Args {
    /// JSON feed to read posts from (file path, URL, or `-` for stdin).
    #[arg(short, long)]
    pub input: String,

    /// Provider name, used as output directory.
    #[arg(short, long, default_value = "web")]
    pub provider: String,

    /// Requested page path, used as output sub-directory.
    #[arg(long, default_value = "")]
    pub path: String,

    /// Maximum number of posts to process.
    #[arg(short = 'n', long, default_value_t = 50)]
    pub limit: usize,

    /// Output file or directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Metadata export format.
    #[arg(short = 't', long = "output-type", value_enum, default_value = "log")]
    pub output_type: OutputFormatArg,

    /// Download media instead of exporting metadata.
    #[arg(short = 'm', long)]
    pub media_only: bool,

    /// Also download the page logo (with --media-only).
    #[arg(long)]
    pub logo: bool,

    /// Number of media downloaded in parallel.
    #[arg(long)]
    pub parallel: Option<usize>,

    /// Behaviour when a downloaded file already exists.
    #[arg(long, value_enum)]
    pub overwrite: Option<OverwritePolicyArg>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "skraper.toml")]
    pub config: PathBuf,

    /// Hide download progress bars.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI output format argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    /// One line per post.
    Log,
    /// Pretty printed JSON.
    Json,
    Xml,
    Yaml,
    /// Comma separated values with a header row.
    Csv,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Log => OutputFormat::Log,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Xml => OutputFormat::Xml,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Csv => OutputFormat::Csv,
        }
    }
}

/// CLI overwrite policy argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OverwritePolicyArg {
    /// Replace existing files.
    Overwrite,
    /// Keep existing files.
    Skip,
    /// Add a numeric suffix.
    Rename,
}

impl From<OverwritePolicyArg> for OverwritePolicy {
    fn from(arg: OverwritePolicyArg) -> Self {
        match arg {
            OverwritePolicyArg::Overwrite => OverwritePolicy::Overwrite,
            OverwritePolicyArg::Skip => OverwritePolicy::Skip,
            OverwritePolicyArg::Rename => OverwritePolicy::Rename,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.download.directory = Some(output.clone());
        }

        if let Some(parallel) = self.parallel {
            config.download.parallel_downloads = parallel;
        }

        if let Some(overwrite) = self.overwrite {
            config.download.overwrite = overwrite.into();
        }

        if self.quiet {
            config.download.show_progress = false;
        }
    }
}
