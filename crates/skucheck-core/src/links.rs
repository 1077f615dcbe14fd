//! Storage link helpers for presenters.
//!
//! Builders use ids verbatim. Extractors accept share links pasted into
//! record columns and fall back to the input when no pattern matches.

use std::sync::LazyLock;

use regex::Regex;

/// Default thumbnail width in pixels.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 400;

const STORAGE_HOST: &str = "https://drive.google.com";

static FILE_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"/d/([a-zA-Z0-9_-]+)",
        r"id=([a-zA-Z0-9_-]+)",
        r"/file/d/([a-zA-Z0-9_-]+)",
        r"([a-zA-Z0-9_-]{25,})",
    ])
});

static FOLDER_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"/folders/([a-zA-Z0-9_-]+)",
        r"id=([a-zA-Z0-9_-]+)",
        r"([a-zA-Z0-9_-]{25,})",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
}

/// Thumbnail URL for a file at the requested width.
#[must_use]
pub fn thumbnail_url(file_id: &str, size: u32) -> Option<String> {
    (!file_id.is_empty()).then(|| format!("{STORAGE_HOST}/thumbnail?id={file_id}&sz=w{size}"))
}

/// Browser view URL for a file.
#[must_use]
pub fn file_view_url(file_id: &str) -> Option<String> {
    (!file_id.is_empty()).then(|| format!("{STORAGE_HOST}/file/d/{file_id}/view"))
}

/// Browser URL for a folder.
#[must_use]
pub fn folder_url(folder_id: &str) -> Option<String> {
    (!folder_id.is_empty()).then(|| format!("{STORAGE_HOST}/drive/folders/{folder_id}"))
}

/// Pull a file id out of a share link, or accept a bare id.
#[must_use]
pub fn extract_file_id(url_or_id: &str) -> Option<String> {
    extract_id(url_or_id, &FILE_ID_PATTERNS)
}

/// Pull a folder id out of a folder link, or accept a bare id.
#[must_use]
pub fn extract_folder_id(url_or_id: &str) -> Option<String> {
    extract_id(url_or_id, &FOLDER_ID_PATTERNS)
}

fn extract_id(url_or_id: &str, patterns: &[Regex]) -> Option<String> {
    if url_or_id.is_empty() {
        return None;
    }
    if looks_like_bare_id(url_or_id) {
        return Some(url_or_id.to_string());
    }
    let extracted = patterns.iter().find_map(|pattern| {
        pattern
            .captures(url_or_id)
            .and_then(|captures| captures.get(1))
            .map(|capture| capture.as_str().to_string())
    });
    // Unrecognised input is passed through unchanged.
    Some(extracted.unwrap_or_else(|| url_or_id.to_string()))
}

fn looks_like_bare_id(value: &str) -> bool {
    !value.contains('/') && value.len() > 10 && value.len() < 100
}
