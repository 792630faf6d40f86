//! Extension to content type lookup for static files.

pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

const MIME_TYPES: &[(&str, &str)] = &[
    ("css", "text/css"),
    ("gif", "image/gif"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("ico", "image/x-icon"),
    ("js", "application/javascript"),
    ("pdf", "application/pdf"),
    ("mp4", "video/mp4"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("xml", "text/xml"),
];

/// Returns the content type for `filename` based on its final extension,
/// or `text/plain` when the extension is missing or unknown.
pub fn content_type_for(filename: &str) -> &'static str {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return DEFAULT_CONTENT_TYPE;
    };
    MIME_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, ty)| *ty)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
