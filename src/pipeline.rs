//! Build orchestration.
//!
//! ```text
//! scan  news/            →  entry folders           (fatal if the root is missing)
//! load  each folder      →  Entry | Issue            (per entry, never fatal)
//! copy  media            →  <output>/news/<slug>/    (only when output ≠ site root)
//! render pages           →  in-memory HTML
//! write pages            →  atomic, unchanged files skipped
//! ```
//!
//! Everything that can abort the build (config, scan) happens before the
//! first write. Per-entry problems are collected in the [`BuildContext`] and
//! the build carries on; the caller turns errors into a failing exit status.
//!
//! Output contains no timestamps or other run-dependent data, so rebuilding
//! unchanged content writes nothing.

use crate::config::{ConfigError, SiteConfig};
use crate::listing::{ordered, render_listing};
use crate::media;
use crate::metadata::load_entry;
use crate::page::render_entry_page;
use crate::paths::Layout;
use crate::persist::{PersistError, WriteStatus, copy_if_changed, write_if_changed};
use crate::scan::{ScanError, scan};
use crate::types::{BuildContext, Entry, Issue, IssueKind};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Scan(#[from] ScanError),
    #[error("Write failed: {0}")]
    Persist(#[from] PersistError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// How far the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Scan, parse, render and write.
    Build,
    /// Scan and parse only. Nothing is written.
    Check,
}

/// One page the build wrote, or would have written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    pub title: String,
    /// Output-root relative path with `/` separators.
    pub path: String,
    /// Gallery size for entry pages, `None` for the listing.
    pub media: Option<usize>,
    pub status: WriteStatus,
}

/// Everything the operator report needs.
#[derive(Debug)]
pub struct BuildReport {
    pub mode: Mode,
    pub context: BuildContext,
    /// Entry pages in listing order, then the listing page.
    pub pages: Vec<PageOutcome>,
    /// Entry folders discovered, including ones later excluded.
    pub entries_found: usize,
}

impl BuildReport {
    pub fn pages_written(&self) -> usize {
        self.count(WriteStatus::Written)
    }

    pub fn pages_unchanged(&self) -> usize {
        self.count(WriteStatus::Unchanged)
    }

    fn count(&self, status: WriteStatus) -> usize {
        self.pages.iter().filter(|p| p.status == status).count()
    }

    /// False when any entry was excluded.
    pub fn succeeded(&self) -> bool {
        !self.context.has_errors()
    }
}

/// Run the pipeline for the site at `site_root`, writing under `output_root`.
pub fn build(
    site_root: &Path,
    output_root: &Path,
    config: &SiteConfig,
    mode: Mode,
) -> Result<BuildReport, BuildError> {
    config.validate()?;
    let layout = Layout::new(config);
    let content_root = site_root.join(&config.content_dir);
    let discovery = scan(&content_root)?;
    let entries_found = discovery.dirs.len();
    log::debug!(
        "found {} entry folders in {}",
        entries_found,
        content_root.display()
    );

    let mut ctx = BuildContext::new(output_root.to_path_buf());
    for issue in discovery.skipped {
        ctx.record(issue);
    }

    for dir in &discovery.dirs {
        let loaded = match load_entry(dir, config.summary_length) {
            Ok(loaded) => loaded,
            Err(err) => {
                ctx.record(Issue::new(
                    &dir.slug,
                    IssueKind::EntryContentMissing,
                    err.to_string(),
                ));
                continue;
            }
        };
        log::debug!("{}: {:?} body", dir.slug, loaded.body_format);
        for warning in loaded.warnings {
            ctx.record(warning);
        }

        let resolved = media::resolve(&dir.path, &dir.slug);
        for warning in resolved.warnings {
            ctx.record(warning);
        }

        ctx.entries.push(Entry {
            slug: dir.slug.clone(),
            source_dir: dir.path.clone(),
            title: loaded.title,
            date: loaded.date,
            summary: loaded.summary,
            body_html: loaded.body_html,
            media: resolved.media,
            thumbnail: resolved.thumbnail,
        });
    }

    if mode == Mode::Check {
        return Ok(BuildReport {
            mode,
            context: ctx,
            pages: Vec::new(),
            entries_found,
        });
    }

    if !same_location(site_root, output_root) {
        copy_entry_files(&mut ctx, &layout);
        copy_site_assets(site_root, output_root, config);
    }

    // Render everything before the first page write
    let mut rendered: Vec<(PageOutcome, PathBuf, String)> = ordered(&ctx.entries)
        .into_iter()
        .map(|entry| {
            let outcome = PageOutcome {
                title: entry.title.clone(),
                path: layout.entry_display_path(&entry.slug),
                media: Some(entry.media.len()),
                status: WriteStatus::Unchanged,
            };
            let html = render_entry_page(entry, config, &layout).into_string();
            (outcome, layout.entry_path(&entry.slug), html)
        })
        .collect();
    rendered.push((
        PageOutcome {
            title: config.listing.heading.clone(),
            path: config.listing_page.clone(),
            media: None,
            status: WriteStatus::Unchanged,
        },
        layout.listing_path(),
        render_listing(&ctx.entries, config, &layout).into_string(),
    ));

    let mut pages = Vec::with_capacity(rendered.len());
    for (mut outcome, rel_path, html) in rendered {
        outcome.status = write_if_changed(&output_root.join(rel_path), html.as_bytes())?;
        log::debug!("{}: {:?}", outcome.path, outcome.status);
        pages.push(outcome);
    }

    Ok(BuildReport {
        mode,
        context: ctx,
        pages,
        entries_found,
    })
}

/// True when both paths name the same directory. A missing output root is
/// never the site root.
fn same_location(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy media and thumbnails next to entry pages in a separate output root.
///
/// Files that fail to copy are dropped from the gallery so no page links to
/// a missing file.
fn copy_entry_files(ctx: &mut BuildContext, layout: &Layout) {
    let output_root = ctx.output_root.clone();
    let mut issues = Vec::new();

    for entry in &mut ctx.entries {
        let slug = entry.slug.clone();
        let dest = output_root.join(layout.entry_dir(&slug));
        let source = entry.source_dir.clone();
        let mut copy = |file: &str| match copy_if_changed(&source.join(file), &dest.join(file)) {
            Ok(_) => true,
            Err(err) => {
                issues.push(Issue::new(
                    &slug,
                    IssueKind::MediaUnreadable,
                    err.to_string(),
                ));
                false
            }
        };

        entry.media.retain(|m| copy(&m.file_name));
        if let Some(thumbnail) = entry.thumbnail.take() {
            entry.thumbnail = copy(&thumbnail).then_some(thumbnail);
        }
    }

    for issue in issues {
        ctx.record(issue);
    }
}

/// Copy the hand-authored home page, stylesheet and logo into a separate
/// output root so relative links from generated pages resolve there too.
fn copy_site_assets(site_root: &Path, output_root: &Path, config: &SiteConfig) {
    for rel in [&config.home_page, &config.stylesheet, &config.logo] {
        let src = site_root.join(rel);
        if !src.is_file() {
            log::warn!("{} not found, pages will link to a missing file", src.display());
            continue;
        }
        if let Err(err) = copy_if_changed(&src, &output_root.join(rel)) {
            log::warn!("{err}");
        }
    }
}
