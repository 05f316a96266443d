//! Shared types passed between the pipeline stages.
//!
//! An [`Entry`] is built once per content folder by [`crate::metadata`] and
//! [`crate::media`], then read by the page and listing renderers. Nothing here
//! is persisted; every build starts from the filesystem again.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::path::PathBuf;

/// Format of the body source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// Restricted markdown (`article.md`).
    Markdown,
    /// Pre-formatted plain text (`description.txt`).
    PlainText,
}

/// Calendar date of an entry as authored in `info.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryDate {
    Parsed(NaiveDate),
    /// Present but not `YYYY-MM-DD`. Kept so it can still be shown verbatim.
    Unparseable(String),
    Missing,
}

impl EntryDate {
    pub fn parsed(&self) -> Option<NaiveDate> {
        match self {
            EntryDate::Parsed(date) => Some(*date),
            _ => None,
        }
    }

    /// Year bucket for the listing filter. `None` for dateless entries.
    pub fn year(&self) -> Option<i32> {
        self.parsed().map(|d| d.year())
    }

    /// Month bucket (1-12) for the listing filter. `None` for dateless entries.
    pub fn month(&self) -> Option<u32> {
        self.parsed().map(|d| d.month())
    }

    /// Human form: `December 15, 2024`, the raw text when unparseable,
    /// `None` when missing.
    pub fn display(&self) -> Option<String> {
        match self {
            EntryDate::Parsed(date) => Some(date.format("%B %d, %Y").to_string()),
            EntryDate::Unparseable(raw) => Some(raw.clone()),
            EntryDate::Missing => None,
        }
    }

    pub fn is_dateless(&self) -> bool {
        self.parsed().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// A gallery file inside an entry folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// File name, which is also the href relative to the entry page.
    pub file_name: String,
    pub kind: MediaKind,
}

/// One content unit: a folder under the content root.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Folder name. Unique across the content root.
    pub slug: String,
    /// Source folder on disk.
    pub source_dir: PathBuf,
    pub title: String,
    pub date: EntryDate,
    pub summary: String,
    /// Rendered body fragment, produced once and reused.
    pub body_html: String,
    pub media: Vec<MediaFile>,
    /// Card background image (`thumbnail.*`), never part of the gallery.
    pub thumbnail: Option<String>,
}

/// What went wrong with an entry, or with a file inside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// No readable body file. The entry is excluded.
    EntryContentMissing,
    /// `info.json` could not be parsed. Derived defaults were used.
    MetadataMalformed,
    /// The date is not `YYYY-MM-DD`. The entry is listed last, unfiltered.
    DateUnparseable,
    /// A media file could not be read or copied. It is left out of the gallery.
    MediaUnreadable,
    /// A folder under the content root could not be read. It is skipped.
    SubdirUnreadable,
}

impl IssueKind {
    /// Errors exclude an entry and fail the build; warnings do neither.
    pub fn is_error(self) -> bool {
        matches!(self, IssueKind::EntryContentMissing)
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueKind::EntryContentMissing => "content missing",
            IssueKind::MetadataMalformed => "metadata malformed",
            IssueKind::DateUnparseable => "date unparseable",
            IssueKind::MediaUnreadable => "media unreadable",
            IssueKind::SubdirUnreadable => "folder unreadable",
        }
    }
}

/// A problem recorded against one entry. Never fatal for the whole build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub slug: String,
    pub kind: IssueKind,
    pub detail: String,
}

impl Issue {
    pub fn new(slug: impl Into<String>, kind: IssueKind, detail: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.slug, self.kind.label(), self.detail)
    }
}

/// State of a single build invocation.
#[derive(Debug)]
pub struct BuildContext {
    pub output_root: PathBuf,
    /// Successfully parsed entries, in discovery order.
    pub entries: Vec<Entry>,
    pub issues: Vec<Issue>,
}

impl BuildContext {
    pub fn new(output_root: PathBuf) -> Self {
        Self {
            output_root,
            entries: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Issues reach the operator through the report; the log only traces them.
    pub fn record(&mut self, issue: Issue) {
        log::debug!("recorded {issue}");
        self.issues.push(issue);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.kind.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| !i.kind.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}
