//! Content store discovery.
//!
//! Stage 1 of the build pipeline. The content root is an implicit database: one
//! folder per entry, the folder name is the entry's slug.
//!
//! ```text
//! news/                          # Content root
//! ├── youth-leadership-camp/     # Entry "youth-leadership-camp"
//! │   ├── info.json
//! │   ├── article.md
//! │   └── 01-arrival.jpg
//! ├── beach-cleanup/             # Entry "beach-cleanup"
//! ├── .drafts/                   # Hidden: skipped
//! └── notes.txt                  # Not a folder: skipped
//! ```
//!
//! Only immediate subdirectories count. Discovery order is lexical by folder
//! name so repeated builds see entries in the same order; the listing re-sorts
//! by date anyway.

use crate::naming::is_hidden;
use crate::types::{Issue, IssueKind};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Content root not found: {0}")]
    ContentRootMissing(PathBuf),
    #[error("IO error reading content root: {0}")]
    Io(#[from] walkdir::Error),
}

/// A discovered entry folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDir {
    pub slug: String,
    pub path: PathBuf,
}

/// Result of scanning the content root.
#[derive(Debug, Default)]
pub struct Discovery {
    pub dirs: Vec<EntryDir>,
    /// Folders that exist but could not be used.
    pub skipped: Vec<Issue>,
}

/// Discover entry folders under `content_root`.
///
/// Fails only if the root itself is missing or unreadable. Individual folders
/// that can't be listed, or whose names aren't valid UTF-8, are reported in
/// [`Discovery::skipped`].
pub fn scan(content_root: &Path) -> Result<Discovery, ScanError> {
    if !content_root.is_dir() {
        return Err(ScanError::ContentRootMissing(content_root.to_path_buf()));
    }

    let mut discovery = Discovery::default();

    let walker = WalkDir::new(content_root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for item in walker {
        let item = match item {
            Ok(item) => item,
            Err(err) if err.depth() > 0 => {
                let name = err
                    .path()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if !is_hidden(&name) {
                    discovery.skipped.push(Issue::new(
                        name,
                        IssueKind::SubdirUnreadable,
                        err.to_string(),
                    ));
                }
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let raw_name = item.file_name().to_string_lossy();
        if is_hidden(&raw_name) || !item.file_type().is_dir() {
            log::debug!("skipping {}", item.path().display());
            continue;
        }

        let Some(slug) = item.file_name().to_str() else {
            discovery.skipped.push(Issue::new(
                raw_name.into_owned(),
                IssueKind::SubdirUnreadable,
                "folder name is not valid UTF-8",
            ));
            continue;
        };

        if let Err(err) = fs::read_dir(item.path()) {
            discovery.skipped.push(Issue::new(
                slug,
                IssueKind::SubdirUnreadable,
                err.to_string(),
            ));
            continue;
        }

        discovery.dirs.push(EntryDir {
            slug: slug.to_string(),
            path: item.path().to_path_buf(),
        });
    }

    Ok(discovery)
}
