//! Free-text bulk import.
//!
//! Each line looks like `CODE - NICKNAME STATUS - SOCIAL - PLATFORM`, with the
//! platform segment optional. Structure is inferred from the `" - "` separator;
//! lines that do not have at least three segments are skipped without error.

use lazy_static::lazy_static;
use regex::Regex;

use super::repo_types::NewEntry;

pub const FIELD_SEPARATOR: &str = " - ";

/// Source format of a bulk-imported line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Klas,
    ThreeDCim,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Klas => "klas",
            Category::ThreeDCim => "3dcim",
        }
    }
}

/// Exactly two hyphens anywhere in the raw line means `klas`; anything else is `3dcim`.
pub fn classify_category(line: &str) -> Category {
    if line.matches('-').count() == 2 {
        Category::Klas
    } else {
        Category::ThreeDCim
    }
}

/// What the optional fourth segment says about the social handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformLabel {
    Instagram,
    Discord,
    Unknown,
    Absent,
}

impl PlatformLabel {
    pub fn classify(platform: Option<&str>) -> Self {
        match platform {
            None => PlatformLabel::Absent,
            Some(p) if p.contains("Instagram") => PlatformLabel::Instagram,
            Some(p) if p.contains("dc") => PlatformLabel::Discord,
            Some(_) => PlatformLabel::Unknown,
        }
    }

    /// Splits `social` into `(instagram, discord)`, stripping the first
    /// occurrence of the platform marker from the handle.
    pub fn resolve_handles(&self, social: &str) -> (Option<String>, Option<String>) {
        match self {
            PlatformLabel::Instagram => (Some(strip_marker(social, "Instagram")), None),
            PlatformLabel::Discord => (None, Some(strip_marker(social, "dc"))),
            PlatformLabel::Unknown | PlatformLabel::Absent => (None, None),
        }
    }
}

fn strip_marker(social: &str, marker: &str) -> String {
    social.replacen(marker, "", 1).trim().to_string()
}

/// `"Nick some status"` -> `("Nick", "some status")`; no whitespace -> `(field, "")`.
pub fn split_nickname_status(field: &str) -> (String, String) {
    lazy_static! {
        static ref NICKNAME_STATUS_RE: Regex = Regex::new(r"^(.+?)\s+(.+)$").unwrap();
    }
    match NICKNAME_STATUS_RE.captures(field) {
        Some(caps) => (caps[1].trim().to_string(), caps[2].trim().to_string()),
        None => (field.to_string(), String::new()),
    }
}

/// Parses one line, or `None` when it has fewer than three segments.
pub fn parse_line(line: &str) -> Option<NewEntry> {
    let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if parts.len() < 3 {
        return None;
    }

    let category = classify_category(line);
    let code = parts[0].trim().to_string();
    let (nickname, status) = split_nickname_status(parts[1].trim());
    let social = parts[2].trim();
    // An empty segment means no platform; a blank one is still a (blank) platform.
    let platform = parts
        .get(3)
        .filter(|p| !p.is_empty())
        .map(|p| p.trim().to_string());

    let (instagram, discord) =
        PlatformLabel::classify(platform.as_deref()).resolve_handles(social);

    Some(NewEntry {
        code,
        nickname,
        status,
        instagram,
        discord,
        platform,
        category: Some(category.as_str().to_string()),
    })
}

/// Parses every non-blank line of `input`, preserving order and skipping malformed lines.
pub fn parse_bulk(input: &str) -> Vec<NewEntry> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_line)
        .collect()
}
