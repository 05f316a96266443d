//! Media discovery and the entry gallery.
//!
//! Every file in an entry folder is classified by extension (case-insensitive):
//!
//! | Kind | Extensions |
//! |------|------------|
//! | Image | jpg, jpeg, png, gif, webp, svg |
//! | Video | mp4, webm, mov |
//!
//! Everything else is ignored, as are hidden files, the entry's own source
//! files, a previously generated `index.html`, and the card thumbnail
//! (`thumbnail.*`). Gallery order is file-name order.

use crate::metadata::{BODY_FILES, METADATA_FILE};
use crate::naming::{is_hidden, title_from_slug};
use crate::paths::encode_segment;
use crate::types::{Issue, IssueKind, MediaFile, MediaKind};
use maud::{Markup, html};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

/// Card thumbnail candidates, first match wins.
pub const THUMBNAIL_FILES: &[&str] = &["thumbnail.png", "thumbnail.jpg", "thumbnail.jpeg"];

const THUMBNAIL_STEM: &str = "thumbnail";
const PAGE_FILE: &str = "index.html";

/// Media found in one entry folder.
#[derive(Debug, Default)]
pub struct Resolved {
    pub media: Vec<MediaFile>,
    pub thumbnail: Option<String>,
    /// Files that looked like media but couldn't be used.
    pub warnings: Vec<Issue>,
}

/// Classify a file name by extension.
pub fn classify(file_name: &str) -> Option<MediaKind> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// True for files that belong to the entry itself rather than its gallery.
fn is_reserved(file_name: &str) -> bool {
    if file_name == METADATA_FILE || file_name == PAGE_FILE {
        return true;
    }
    if BODY_FILES.iter().any(|(name, _)| *name == file_name) {
        return true;
    }
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.eq_ignore_ascii_case(THUMBNAIL_STEM))
}

/// Find the gallery media and thumbnail of the entry in `dir`.
///
/// Never fails: unreadable files are skipped and reported.
pub fn resolve(dir: &Path, slug: &str) -> Resolved {
    let mut resolved = Resolved {
        thumbnail: THUMBNAIL_FILES
            .iter()
            .find(|name| dir.join(name).is_file())
            .map(|name| name.to_string()),
        ..Resolved::default()
    };

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for item in walker {
        let item = match item {
            Ok(item) => item,
            Err(err) => {
                resolved.warnings.push(Issue::new(
                    slug,
                    IssueKind::MediaUnreadable,
                    err.to_string(),
                ));
                continue;
            }
        };
        if !item.file_type().is_file() {
            continue;
        }

        let raw_name = item.file_name().to_string_lossy();
        if is_hidden(&raw_name) || is_reserved(&raw_name) {
            continue;
        }
        let Some(kind) = classify(&raw_name) else {
            log::debug!("{slug}: ignoring {raw_name}");
            continue;
        };
        let Some(file_name) = item.file_name().to_str() else {
            resolved.warnings.push(Issue::new(
                slug,
                IssueKind::MediaUnreadable,
                format!("{raw_name}: file name is not valid UTF-8"),
            ));
            continue;
        };
        if let Err(err) = fs::File::open(item.path()) {
            resolved.warnings.push(Issue::new(
                slug,
                IssueKind::MediaUnreadable,
                format!("{file_name}: {err}"),
            ));
            continue;
        }

        resolved.media.push(MediaFile {
            file_name: file_name.to_string(),
            kind,
        });
    }

    resolved
}

/// Alt text from a file stem: `01-team_photo.jpg` → `01 Team Photo`.
pub fn alt_text(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    title_from_slug(stem)
}

/// Gallery section for an entry page. Empty when there is no media.
pub fn render_gallery(media: &[MediaFile]) -> Markup {
    html! {
        @if !media.is_empty() {
            section.gallery-section {
                h2 { "Photos & Videos" }
                div.gallery-grid {
                    @for item in media {
                        @let href = encode_segment(&item.file_name);
                        @match item.kind {
                            MediaKind::Image => {
                                button.gallery-item type="button" data-kind="image" data-src=(href) {
                                    img src=(href) alt=(alt_text(&item.file_name)) loading="lazy";
                                }
                            }
                            MediaKind::Video => {
                                button.gallery-item type="button" data-kind="video" data-src=(href) {
                                    video src=(href) preload="metadata" muted {}
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
