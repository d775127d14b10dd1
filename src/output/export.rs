//! Post metadata export.

use std::path::Path;

use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::{Error, Result};
use crate::fs::ensure_dir;
use crate::media::{Media, Post};

/// Root element of XML exports.
const XML_ROOT: &str = "posts";

/// Column headers of CSV exports.
const CSV_HEADERS: [&str; 7] = [
    "ID",
    "Text",
    "Published at",
    "Rating",
    "Comments count",
    "Views count",
    "Media",
];

/// Separator between media URLs in a CSV cell.
const CSV_MEDIA_SEPARATOR: &str = "   ";

#[derive(Serialize)]
struct XmlPosts<'a> {
    post: &'a [Post],
}

/// Render posts in the requested format.
pub fn render_posts(posts: &[Post], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Log => Ok(posts
            .iter()
            .map(Post::to_string)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(posts)?),
        OutputFormat::Xml => quick_xml::se::to_string_with_root(XML_ROOT, &XmlPosts { post: posts })
            .map_err(|e| Error::Export(format!("Failed to write XML: {}", e))),
        OutputFormat::Yaml => serde_yaml::to_string(posts)
            .map_err(|e| Error::Export(format!("Failed to write YAML: {}", e))),
        OutputFormat::Csv => render_csv(posts),
    }
}

fn render_csv(posts: &[Post]) -> Result<String> {
    let csv_error = |e: csv::Error| Error::Export(format!("Failed to write CSV: {}", e));

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS).map_err(csv_error)?;

    for post in posts {
        let media: Vec<&str> = post.media.iter().map(Media::url).collect();
        writer
            .write_record([
                post.id.clone(),
                post.text.clone().unwrap_or_default(),
                optional(post.published_at),
                optional(post.rating),
                optional(post.comments_count),
                optional(post.views_count),
                media.join(CSV_MEDIA_SEPARATOR),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(format!("Failed to write CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(format!("CSV is not UTF-8: {}", e)))
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write rendered posts to `path`, creating parent directories.
pub fn write_export(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
