//! Slug resolution for solution source files.
//!
//! Two strategies, tried in order:
//!
//! 1. A `Source : <url>` marker in the file's leading comment block.
//! 2. The name of the file's parent directory, converted from camel case.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use url::Url;

/// How many leading lines are searched for the source marker.
const HEADER_SCAN_LINES: usize = 50;

/// Line prefixes accepted as part of a leading comment block.
const COMMENT_PREFIXES: &[&str] = &["//", "#", "/*", "*", "--", ";", "<!--", "\"\"\"", "'''"];

/// Path segment that precedes the slug in a problem URL.
const PROBLEMS_SEGMENT: &str = "problems";

static SOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsource\s*:\s*(\S+)").expect("source regex"));

/// `LRUCache` → `LRU-Cache`
static ACRONYM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("acronym regex"));

/// `twoSum` → `two-Sum`, `3Sum` → `3-Sum`
static CAMEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("camel regex"));

/// `UTF8` → `UTF-8`
static LETTER_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z])([0-9])").expect("letter-digit regex"));

static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("separator regex"));

/// Resolve the slug for a source file, or `None` if neither strategy works.
pub fn resolve_slug(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => {
            if let Some(slug) = slug_from_source(&String::from_utf8_lossy(&bytes)) {
                debug!(path = %path.display(), %slug, "slug from source marker");
                return Some(slug);
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "could not read source file"),
    }

    let folder = path.parent()?.file_name()?.to_str()?;
    let slug = slug_from_folder(folder);
    if slug.is_empty() {
        return None;
    }
    debug!(path = %path.display(), %slug, "slug from folder name");
    Some(slug)
}

/// Find a `Source : <url>` marker in the leading comment block.
pub fn slug_from_source(content: &str) -> Option<String> {
    for line in content.lines().take(HEADER_SCAN_LINES) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !COMMENT_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            break;
        }
        if let Some(caps) = SOURCE_RE.captures(trimmed) {
            if let Some(slug) = slug_from_url(&caps[1]) {
                return Some(slug);
            }
        }
    }
    None
}

/// The path segment following `problems/` in a problem URL.
pub fn slug_from_url(raw: &str) -> Option<String> {
    let segment = match Url::parse(raw) {
        Ok(url) => {
            let mut segments = url.path_segments()?;
            segments.find(|s| *s == PROBLEMS_SEGMENT)?;
            segments.next()?.to_string()
        }
        // Scheme-less references such as `leetcode.com/problems/two-sum/`.
        Err(_) => {
            let marker = format!("{PROBLEMS_SEGMENT}/");
            let rest = &raw[raw.find(&marker)? + marker.len()..];
            rest.split(['/', '?', '#']).next()?.to_string()
        }
    };

    let segment = segment.trim();
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

/// Convert a camel-case folder name into a hyphenated lowercase slug.
///
/// Returns an empty string when the name has no alphanumeric characters.
pub fn slug_from_folder(name: &str) -> String {
    let s = ACRONYM_RE.replace_all(name, "$1-$2");
    let s = CAMEL_RE.replace_all(&s, "$1-$2");
    let s = LETTER_DIGIT_RE.replace_all(&s, "$1-$2");
    let s = NON_ALNUM_RE.replace_all(&s, "-");
    s.trim_matches('-').to_ascii_lowercase()
}
