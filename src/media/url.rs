//! URL path helpers shared by resolution and naming.

use url::{ParseError, Url};

use crate::error::Result;

/// Base used to pull a path out of a relative URL.
const RELATIVE_BASE: &str = "http://relative.invalid/";

/// Path component of an absolute or relative URL.
pub fn url_path(raw: &str) -> Result<String> {
    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)?.join(raw)?,
        Err(e) => return Err(e.into()),
    };

    Ok(parsed.path().to_string())
}

/// Host of an absolute URL, if any.
pub fn url_host(raw: &str) -> Option<String> {
    Url::parse(raw)
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase))
}

/// Last segment of the URL path.
fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Extension after the final `.` of the last path segment, when non-empty.
pub fn file_extension(raw: &str) -> Result<Option<String>> {
    let path = url_path(raw)?;
    let segment = last_segment(&path);

    Ok(segment
        .rfind('.')
        .map(|dot| &segment[dot + 1..])
        .filter(|ext| !ext.is_empty())
        .map(str::to_string))
}

/// Last path segment with everything from its final `.` removed.
pub fn file_name_without_extension(raw: &str) -> Result<String> {
    let path = url_path(raw)?;
    let segment = last_segment(&path);

    let stem = match segment.rfind('.') {
        Some(dot) => &segment[..dot],
        None => segment,
    };

    Ok(stem.to_string())
}
