//! Entry metadata and body loading.
//!
//! Each entry folder carries two source files:
//!
//! - **`info.json`**: `title`, `date` (`YYYY-MM-DD`) and `summary`. Every field
//!   is optional; `description` is accepted in place of `summary`. Other keys
//!   are ignored so authors can keep notes in the file.
//! - **Body**: `article.md` (restricted markdown) or, failing that,
//!   `description.txt` (plain text). The body is the only required file.
//!
//! ## Resolution
//!
//! Each field is resolved independently, the first usable source wins:
//!
//! - **Title**: `info.json` title → slug words, capitalized
//! - **Summary**: `info.json` summary → `description` → start of the body text
//! - **Date**: `info.json` date → none (the entry becomes dateless)
//!
//! An `info.json` that is not a JSON object is treated as absent and reported
//! as a warning. A field of the wrong type (`"date": 20241215`) is dropped on
//! its own; the other fields still apply. A missing or unreadable body
//! excludes the entry; that is the only error.

use crate::markdown;
use crate::naming::title_from_slug;
use crate::scan::EntryDir;
use crate::types::{BodyFormat, EntryDate, Issue, IssueKind};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

pub const METADATA_FILE: &str = "info.json";

/// Body sources in priority order.
pub const BODY_FILES: &[(&str, BodyFormat)] = &[
    ("article.md", BodyFormat::Markdown),
    ("description.txt", BodyFormat::PlainText),
];

#[derive(Error, Debug)]
pub enum EntryError {
    #[error("no article.md or description.txt found")]
    ContentMissing,
    #[error("cannot read {file}: {source}")]
    Unreadable {
        file: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Raw `info.json` contents. Fields stay untyped so one bad value does not
/// discard the rest.
#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    title: Option<Value>,
    date: Option<Value>,
    summary: Option<Value>,
    description: Option<Value>,
}

/// Resolved metadata of one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub title: String,
    pub date: EntryDate,
    /// Explicit summary, if the author wrote one.
    pub summary: Option<String>,
}

/// The body source of one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub format: BodyFormat,
    pub file_name: &'static str,
    pub text: String,
}

/// Everything read from an entry folder except its media.
#[derive(Debug, Clone)]
pub struct LoadedEntry {
    pub title: String,
    pub date: EntryDate,
    pub summary: String,
    pub body_format: BodyFormat,
    pub body_html: String,
    /// Non-fatal problems found while loading.
    pub warnings: Vec<Issue>,
}

/// Load and render one entry.
///
/// The body is rendered here, once; pages reuse `body_html`.
pub fn load_entry(dir: &EntryDir, summary_length: usize) -> Result<LoadedEntry, EntryError> {
    let body = read_body(&dir.path)?;
    let (metadata, warnings) = read_metadata(&dir.path, &dir.slug);

    let summary = metadata
        .summary
        .unwrap_or_else(|| derive_summary(&body, summary_length));

    Ok(LoadedEntry {
        title: metadata.title,
        date: metadata.date,
        summary,
        body_format: body.format,
        body_html: markdown::render_body(&body.text, body.format),
        warnings,
    })
}

/// Read the first body file that exists.
pub fn read_body(dir: &Path) -> Result<Body, EntryError> {
    for &(file_name, format) in BODY_FILES {
        let path = dir.join(file_name);
        if !path.is_file() {
            continue;
        }
        let text = fs::read_to_string(&path).map_err(|source| EntryError::Unreadable {
            file: file_name,
            source,
        })?;
        return Ok(Body {
            format,
            file_name,
            text,
        });
    }
    Err(EntryError::ContentMissing)
}

/// Read `info.json`, falling back to derived values for anything missing.
///
/// Never fails: problems come back as warnings next to the best metadata
/// that could be resolved.
pub fn read_metadata(dir: &Path, slug: &str) -> (Metadata, Vec<Issue>) {
    let mut warnings = Vec::new();
    let path = dir.join(METADATA_FILE);

    let raw = if path.is_file() {
        match fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|s| serde_json::from_str::<RawMetadata>(&s).map_err(|e| e.to_string()))
        {
            Ok(raw) => raw,
            Err(reason) => {
                warnings.push(Issue::new(
                    slug,
                    IssueKind::MetadataMalformed,
                    format!("{METADATA_FILE}: {reason}"),
                ));
                RawMetadata::default()
            }
        }
    } else {
        log::debug!("{slug}: no {METADATA_FILE}, deriving metadata");
        RawMetadata::default()
    };

    let mut field = |key: &str, value: Option<Value>| match value {
        Some(Value::String(s)) => non_empty(s),
        None | Some(Value::Null) => None,
        Some(other) => {
            warnings.push(Issue::new(
                slug,
                IssueKind::MetadataMalformed,
                format!("{METADATA_FILE}: {key} must be a string, found {other}"),
            ));
            None
        }
    };
    let title = field("title", raw.title).unwrap_or_else(|| title_from_slug(slug));
    let summary = field("summary", raw.summary);
    let description = field("description", raw.description);
    let date_given = raw.date.as_ref().is_some_and(|v| !v.is_null());
    let date = parse_date(field("date", raw.date).as_deref());
    let summary = summary.or(description);

    match &date {
        EntryDate::Parsed(_) => {}
        EntryDate::Unparseable(raw) => warnings.push(Issue::new(
            slug,
            IssueKind::DateUnparseable,
            format!("\"{raw}\" is not YYYY-MM-DD"),
        )),
        // A date of the wrong type was already reported as malformed
        EntryDate::Missing if date_given => {}
        EntryDate::Missing => warnings.push(Issue::new(
            slug,
            IssueKind::DateUnparseable,
            "no date given",
        )),
    }

    (
        Metadata {
            title,
            date,
            summary,
        },
        warnings,
    )
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse an ISO calendar date (`2024-12-15`).
pub fn parse_date(raw: Option<&str>) -> EntryDate {
    match raw {
        None => EntryDate::Missing,
        Some(text) => match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            Ok(date) => EntryDate::Parsed(date),
            Err(_) => EntryDate::Unparseable(text.to_string()),
        },
    }
}

/// Summary taken from the start of the body when `info.json` has none.
pub fn derive_summary(body: &Body, max_chars: usize) -> String {
    truncate_on_word(&markdown::to_plain_text(&body.text, body.format), max_chars)
}

/// Cut `text` to at most `max_chars` characters, backing up to the last word
/// boundary and appending `…` when anything was removed.
pub fn truncate_on_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    let next_is_space = text
        .chars()
        .nth(max_chars)
        .is_some_and(char::is_whitespace);

    let kept = if next_is_space {
        cut.as_str()
    } else {
        match cut.rfind(char::is_whitespace) {
            Some(pos) if pos > 0 => &cut[..pos],
            _ => cut.as_str(),
        }
    };
    format!("{}…", kept.trim_end_matches([' ', ',', ';', ':', '-']))
}
