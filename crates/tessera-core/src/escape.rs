//! Escaping and input-format helpers shared by every tile type.
//!
//! Renderers use maud, which escapes interpolated text automatically. These
//! helpers cover what maud cannot know about: which URL schemes are safe to
//! place in `href`/`src` attributes, and the format checks used by
//! validation.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

/// Placeholder substituted for any URL that fails the scheme allow-list.
pub const UNSAFE_URL_PLACEHOLDER: &str = "#";

/// Maximum length of single-line text fields.
pub const SHORT_TEXT_MAX: usize = 200;

/// Maximum length of multi-line text fields.
pub const LONG_TEXT_MAX: usize = 5000;

/// Maximum length of URL fields.
pub const URL_MAX: usize = 2048;

/// Image extensions accepted for image fields.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "avif"];

/// File extensions accepted for downloadable files.
pub const FILE_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "odt", "rtf", "txt", "xls", "xlsx", "ods", "csv", "ppt", "pptx", "odp",
    "zip", "mp3", "mp4", "jpg", "jpeg", "png", "gif", "webp", "svg",
];

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color regex should compile"));

static HTTP_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[A-Za-z0-9](?:[A-Za-z0-9\-.]*[A-Za-z0-9])?(?::\d{1,5})?(?:[/?#]\S*)?$")
        .expect("http URL regex should compile")
});

static RELATIVE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/?[A-Za-z0-9._~\-%+]+(?:/[A-Za-z0-9._~\-%+]*)*(?:[?#]\S*)?$")
        .expect("relative path regex should compile")
});

static UPLOAD_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/?(?:[A-Za-z0-9_\-]+/)*[A-Za-z0-9_\-][A-Za-z0-9_\-.]*\.[A-Za-z0-9]{1,5}$")
        .expect("upload path regex should compile")
});

/// Return `url` if it is safe to use in an `href` or `src` attribute,
/// otherwise [`UNSAFE_URL_PLACEHOLDER`].
///
/// Allowed: `http://` and `https://` URLs, same-origin absolute paths
/// (`/path`, but not protocol-relative `//host`), fragment links and
/// scheme-less relative paths. Everything else (`javascript:`, `data:`,
/// `vbscript:`, ...) is replaced. The result still needs attribute
/// escaping, which maud performs.
pub fn safe_href(url: &str) -> &str {
    if is_safe_href(url) {
        url.trim()
    } else {
        UNSAFE_URL_PLACEHOLDER
    }
}

/// Whether [`safe_href`] would keep `url`.
pub fn is_safe_href(url: &str) -> bool {
    let url = url.trim();
    // Browsers treat `\` as `/`, so `\\host` is protocol-relative too.
    if url.is_empty() || url.contains('\\') || url.chars().any(char::is_control) {
        return false;
    }

    let lower = url.to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        return true;
    }
    if url.starts_with("//") {
        return false;
    }
    if url.starts_with('/') || url.starts_with('#') {
        return true;
    }

    // A scheme-less relative reference has no ':' before its first path,
    // query or fragment delimiter.
    let head_end = url.find(['/', '?', '#']).unwrap_or(url.len());
    !url[..head_end].contains(':')
}

/// Permissive URL check used by validation: an `http(s)` URL with a host,
/// or a relative / absolute path without traversal.
pub fn is_valid_url_or_path(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.len() > URL_MAX {
        return false;
    }
    if HTTP_URL_RE.is_match(value) {
        return true;
    }
    !value.starts_with("//") && !has_traversal(value) && RELATIVE_PATH_RE.is_match(value)
}

/// Whether `value` is an absolute `http(s)` URL with a host.
pub fn is_http_url(value: &str) -> bool {
    HTTP_URL_RE.is_match(value.trim())
}

/// Whether `path` looks like a stored upload (`uploads/photo.jpg`) whose
/// extension is in `allowed`.
pub fn is_valid_upload_path(path: &str, allowed: &[&str]) -> bool {
    let path = path.trim();
    if path.is_empty() || path.len() > URL_MAX || has_traversal(path) {
        return false;
    }
    if !UPLOAD_PATH_RE.is_match(path) {
        return false;
    }
    file_extension(path).is_some_and(|ext| allowed.contains(&ext.as_str()))
}

/// Whether `value` is an image reference: an upload path or an `http(s)`
/// URL, with an image extension.
pub fn is_valid_image_path(value: &str) -> bool {
    let value = value.trim();
    if is_http_url(value) {
        return file_extension(value).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
    }
    is_valid_upload_path(value, IMAGE_EXTENSIONS)
}

/// Whether `value` is a downloadable file reference.
pub fn is_valid_file_path(value: &str) -> bool {
    let value = value.trim();
    if is_http_url(value) {
        return true;
    }
    is_valid_upload_path(value, FILE_EXTENSIONS)
}

/// Lower-cased extension of the last path segment, ignoring any query or
/// fragment.
pub fn file_extension(path: &str) -> Option<String> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let name = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether `value` is a `#RRGGBB` colour.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

/// Whether `value` is a calendar date in `YYYY-MM-DD` form.
pub fn is_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Whether `value` is a time of day in `HH:MM` form.
pub fn is_time(value: &str) -> bool {
    value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

/// Whether `value` is a plausible email address.
pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(|c| c.is_whitespace() || c == '<' || c == '>')
}

/// Whether `value` is a plausible phone number (digits and separators).
pub fn is_phone(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    digits >= 3
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')' | '/' | '.'))
}

fn has_traversal(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..") || path.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_href_allows_http_and_https() {
        assert_eq!(safe_href("https://example.org/a?b=c"), "https://example.org/a?b=c");
        assert_eq!(safe_href("http://example.org"), "http://example.org");
        assert_eq!(safe_href("HTTPS://EXAMPLE.ORG"), "HTTPS://EXAMPLE.ORG");
    }

    #[test]
    fn safe_href_allows_same_origin_paths() {
        assert_eq!(safe_href("/uploads/flyer.pdf"), "/uploads/flyer.pdf");
        assert_eq!(safe_href("uploads/flyer.pdf"), "uploads/flyer.pdf");
        assert_eq!(safe_href("#contact"), "#contact");
        assert_eq!(safe_href("page.html?x=1:2"), "page.html?x=1:2");
    }

    #[test]
    fn safe_href_rejects_javascript() {
        assert_eq!(safe_href("javascript:alert(1)"), UNSAFE_URL_PLACEHOLDER);
        assert_eq!(safe_href("  JavaScript:alert(1)"), UNSAFE_URL_PLACEHOLDER);
        assert_eq!(safe_href("java\tscript:alert(1)"), UNSAFE_URL_PLACEHOLDER);
    }

    #[test]
    fn safe_href_rejects_other_schemes() {
        assert_eq!(safe_href("data:text/html,<script>"), UNSAFE_URL_PLACEHOLDER);
        assert_eq!(safe_href("vbscript:msgbox"), UNSAFE_URL_PLACEHOLDER);
        assert_eq!(safe_href("ftp://example.org"), UNSAFE_URL_PLACEHOLDER);
    }

    #[test]
    fn safe_href_rejects_protocol_relative_and_empty() {
        assert_eq!(safe_href("//evil.example"), UNSAFE_URL_PLACEHOLDER);
        assert_eq!(safe_href("/\\evil.example"), UNSAFE_URL_PLACEHOLDER);
        assert_eq!(safe_href("\\\\evil.example"), UNSAFE_URL_PLACEHOLDER);
        assert_eq!(safe_href("\\/evil.example"), UNSAFE_URL_PLACEHOLDER);
        assert_eq!(safe_href("https:\\\\evil.example"), UNSAFE_URL_PLACEHOLDER);
        assert_eq!(safe_href(""), UNSAFE_URL_PLACEHOLDER);
        assert_eq!(safe_href("   "), UNSAFE_URL_PLACEHOLDER);
    }

    #[test]
    fn url_or_path_validation() {
        assert!(is_valid_url_or_path("https://example.org"));
        assert!(is_valid_url_or_path("https://example.org:8443/path?q=1#top"));
        assert!(is_valid_url_or_path("/events/2025"));
        assert!(is_valid_url_or_path("contact.html"));
        assert!(!is_valid_url_or_path("javascript:alert(1)"));
        assert!(!is_valid_url_or_path("https://"));
        assert!(!is_valid_url_or_path("../etc/passwd"));
        assert!(!is_valid_url_or_path("//evil.example"));
        assert!(!is_valid_url_or_path("has spaces.html"));
        assert!(!is_valid_url_or_path(""));
    }

    #[test]
    fn image_path_validation() {
        assert!(is_valid_image_path("uploads/images/photo.jpg"));
        assert!(is_valid_image_path("/uploads/logo.PNG"));
        assert!(is_valid_image_path("https://cdn.example.org/pic.webp"));
        assert!(!is_valid_image_path("not-a-path"));
        assert!(!is_valid_image_path("uploads/../secret.jpg"));
        assert!(!is_valid_image_path("uploads/report.pdf"));
        assert!(!is_valid_image_path("javascript:alert(1).png"));
    }

    #[test]
    fn file_path_validation() {
        assert!(is_valid_file_path("uploads/files/annual-report.pdf"));
        assert!(is_valid_file_path("https://example.org/download"));
        assert!(!is_valid_file_path("uploads/run.exe"));
        assert!(!is_valid_file_path("report"));
    }

    #[test]
    fn file_extension_extraction() {
        assert_eq!(file_extension("uploads/a.PDF").as_deref(), Some("pdf"));
        assert_eq!(file_extension("https://x.org/a.tar.gz?dl=1").as_deref(), Some("gz"));
        assert_eq!(file_extension("uploads/.hidden"), None);
        assert_eq!(file_extension("uploads/noext"), None);
    }

    #[test]
    fn hex_color_validation() {
        assert!(is_hex_color("#1a2B3c"));
        assert!(!is_hex_color("#abc"));
        assert!(!is_hex_color("1a2b3c"));
        assert!(!is_hex_color("#1a2b3g"));
    }

    #[test]
    fn date_and_time_validation() {
        assert!(is_date("2025-12-31"));
        assert!(!is_date("2025-02-30"));
        assert!(!is_date("31.12.2025"));
        assert!(is_time("09:30"));
        assert!(is_time("23:59"));
        assert!(!is_time("24:00"));
        assert!(!is_time("9:30"));
    }

    #[test]
    fn email_and_phone_validation() {
        assert!(is_email("office@example.org"));
        assert!(!is_email("office@localhost"));
        assert!(!is_email("no-at-sign"));
        assert!(is_phone("+49 (0) 30 123-456"));
        assert!(!is_phone("call me"));
    }
}
