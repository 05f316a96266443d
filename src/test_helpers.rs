//! Shared test utilities for the newsfold test suite.
//!
//! Fixture builders write small content trees into a temp directory; lookup
//! helpers find entries in a [`BuildContext`] and panic with the available
//! slugs on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_site();
//! write_entry(&content_root(&tmp), "camp", Some(r#"{"date": "2024-05-02"}"#), Some("Body"));
//!
//! let ctx = build(tmp.path(), tmp.path(), &SiteConfig::default(), Mode::Check).unwrap().context;
//! let entry = find_entry(&ctx, "camp");
//! assert_eq!(entry.title, "Camp");
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::types::{BuildContext, Entry, Issue, IssueKind};

// =========================================================================
// Fixture setup
// =========================================================================

/// A temp site root with a home page and an empty `news/` content root.
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("index.html"), "<h1>About us</h1>").unwrap();
    fs::create_dir_all(content_root(&tmp)).unwrap();
    tmp
}

/// Default content root of a site made by [`setup_site`].
pub fn content_root(tmp: &TempDir) -> PathBuf {
    tmp.path().join(SiteConfig::default().content_dir)
}

/// Create an entry folder with optional `info.json` and `article.md`.
pub fn write_entry(root: &Path, slug: &str, info: Option<&str>, article: Option<&str>) -> PathBuf {
    let dir = root.join(slug);
    fs::create_dir_all(&dir).unwrap();
    if let Some(info) = info {
        fs::write(dir.join("info.json"), info).unwrap();
    }
    if let Some(article) = article {
        fs::write(dir.join("article.md"), article).unwrap();
    }
    dir
}

/// Create a dated entry with a markdown body.
pub fn write_dated_entry(root: &Path, slug: &str, title: &str, date: &str) -> PathBuf {
    let info = format!(r#"{{"title": "{title}", "date": "{date}"}}"#);
    write_entry(root, slug, Some(&info), Some(&format!("About {title}.")))
}

/// Write placeholder media files into an entry folder.
pub fn write_media(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), name.as_bytes()).unwrap();
    }
}

// =========================================================================
// Context lookups: panic with a clear message on miss
// =========================================================================

/// Find an entry by slug. Panics if not found.
pub fn find_entry<'a>(ctx: &'a BuildContext, slug: &str) -> &'a Entry {
    ctx.entries
        .iter()
        .find(|e| e.slug == slug)
        .unwrap_or_else(|| {
            let slugs = entry_slugs(ctx);
            panic!("entry '{slug}' not found. Available: {slugs:?}")
        })
}

/// Find the first issue of `kind`. Panics if none was recorded.
pub fn find_issue(ctx: &BuildContext, kind: IssueKind) -> &Issue {
    ctx.issues
        .iter()
        .find(|i| i.kind == kind)
        .unwrap_or_else(|| panic!("no {kind:?} issue. Recorded: {:?}", ctx.issues))
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All entry slugs in context order.
pub fn entry_slugs(ctx: &BuildContext) -> Vec<&str> {
    ctx.entries.iter().map(|e| e.slug.as_str()).collect()
}

/// Read a generated page. Panics if it doesn't exist.
pub fn read_page(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel))
        .unwrap_or_else(|e| panic!("cannot read {rel}: {e}"))
}
