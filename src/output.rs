//! Operator report.
//!
//! # Information-First Display
//!
//! Each line leads with what the operator recognizes (an entry's positional
//! index and title) and follows with where it went. Problems are grouped at
//! the end so a clean build reads as a plain inventory.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Entries
//! 001 December Fair → news/december-fair/index.html (4 media)
//! 002 Beach Cleanup → news/beach-cleanup/index.html (unchanged)
//!
//! Listing
//!     News & Programmes → news.html
//!
//! Skipped
//!     broken-camp: content missing (no article.md or description.txt found)
//!
//! Warnings
//!     beach-cleanup: date unparseable (no date given)
//!
//! 3 entries found: 2 pages written, 1 unchanged, 1 error, 1 warning
//! ```
//!
//! ## Check
//!
//! Same sections, but entries show their slug instead of an output path and
//! the summary line counts only entries and issues.
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` and do no I/O, so tests can
//! assert on exact lines. `print_*` wrappers write to stdout.

use crate::listing::ordered;
use crate::pipeline::{BuildReport, Mode};
use crate::persist::WriteStatus;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 entry`, `2 entries`.
fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Parenthesized detail after an entry line, if there is any.
fn entry_detail(media: Option<usize>, status: WriteStatus) -> String {
    let mut parts = Vec::new();
    if let Some(n) = media.filter(|&n| n > 0) {
        parts.push(format!("{n} media"));
    }
    if status == WriteStatus::Unchanged {
        parts.push("unchanged".to_string());
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

// ============================================================================
// Build report
// ============================================================================

/// Format the full report for a build or check run.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Entries".to_string()];

    match report.mode {
        Mode::Build => {
            let (entries, listing): (Vec<_>, Vec<_>) =
                report.pages.iter().partition(|p| p.media.is_some());
            for (i, page) in entries.iter().enumerate() {
                lines.push(format!(
                    "{} {} \u{2192} {}{}",
                    format_index(i + 1),
                    page.title,
                    page.path,
                    entry_detail(page.media, page.status)
                ));
            }
            for page in listing {
                lines.push(String::new());
                lines.push("Listing".to_string());
                lines.push(format!(
                    "{}{} \u{2192} {}{}",
                    indent(1),
                    page.title,
                    page.path,
                    entry_detail(None, page.status)
                ));
            }
        }
        Mode::Check => {
            for (i, entry) in ordered(&report.context.entries).iter().enumerate() {
                lines.push(format!(
                    "{} {} ({})",
                    format_index(i + 1),
                    entry.title,
                    entry.slug
                ));
            }
        }
    }

    lines.extend(format_errors(report));

    let warnings: Vec<_> = report.context.warnings().collect();
    if !warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for issue in warnings {
            lines.push(format!("{}{}", indent(1), issue));
        }
    }

    lines.push(String::new());
    lines.push(format_summary(report));
    lines
}

/// The `Skipped` section: entries excluded by an error. Empty when none were.
pub fn format_errors(report: &BuildReport) -> Vec<String> {
    let errors: Vec<_> = report.context.errors().collect();
    if errors.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "Skipped".to_string()];
    for issue in errors {
        lines.push(format!("{}{}", indent(1), issue));
    }
    lines
}

/// One-line totals.
pub fn format_summary(report: &BuildReport) -> String {
    let errors = report.context.errors().count();
    let warnings = report.context.warnings().count();
    let found = plural(report.entries_found, "entry", "entries");
    match report.mode {
        Mode::Build => format!(
            "{found} found: {} written, {} unchanged, {}, {}",
            plural(report.pages_written(), "page", "pages"),
            report.pages_unchanged(),
            plural(errors, "error", "errors"),
            plural(warnings, "warning", "warnings"),
        ),
        Mode::Check => format!(
            "{found} checked: {}, {}",
            plural(errors, "error", "errors"),
            plural(warnings, "warning", "warnings"),
        ),
    }
}

/// Print the report to stdout. `quiet` keeps only the skipped entries.
pub fn print_build_report(report: &BuildReport, quiet: bool) {
    let lines = if quiet {
        format_errors(report).into_iter().skip(1).collect()
    } else {
        format_build_report(report)
    };
    for line in lines {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PageOutcome;
    use crate::types::{BuildContext, Entry, EntryDate, Issue, IssueKind};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn page(title: &str, path: &str, media: Option<usize>, status: WriteStatus) -> PageOutcome {
        PageOutcome {
            title: title.to_string(),
            path: path.to_string(),
            media,
            status,
        }
    }

    fn report(mode: Mode, pages: Vec<PageOutcome>, issues: Vec<Issue>) -> BuildReport {
        let mut context = BuildContext::new(PathBuf::from("."));
        context.issues = issues;
        BuildReport {
            mode,
            context,
            entries_found: pages.iter().filter(|p| p.media.is_some()).count(),
            pages,
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn index_padding() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(0, "page", "pages"), "0 pages");
        assert_eq!(plural(1, "entry", "entries"), "1 entry");
        assert_eq!(plural(2, "entry", "entries"), "2 entries");
    }

    #[test]
    fn detail_variants() {
        assert_eq!(entry_detail(Some(0), WriteStatus::Written), "");
        assert_eq!(entry_detail(Some(3), WriteStatus::Written), " (3 media)");
        assert_eq!(
            entry_detail(Some(3), WriteStatus::Unchanged),
            " (3 media, unchanged)"
        );
        assert_eq!(entry_detail(None, WriteStatus::Unchanged), " (unchanged)");
    }

    // =========================================================================
    // format_build_report()
    // =========================================================================

    #[test]
    fn clean_build_report() {
        let r = report(
            Mode::Build,
            vec![
                page("December Fair", "news/december/index.html", Some(2), WriteStatus::Written),
                page("March Walk", "news/march/index.html", Some(0), WriteStatus::Unchanged),
                page("News & Programmes", "news.html", None, WriteStatus::Written),
            ],
            vec![],
        );
        assert_eq!(
            format_build_report(&r),
            vec![
                "Entries",
                "001 December Fair \u{2192} news/december/index.html (2 media)",
                "002 March Walk \u{2192} news/march/index.html (unchanged)",
                "",
                "Listing",
                "    News & Programmes \u{2192} news.html",
                "",
                "2 entries found: 2 pages written, 1 unchanged, 0 errors, 0 warnings",
            ]
        );
    }

    #[test]
    fn report_lists_skipped_and_warnings() {
        let mut r = report(
            Mode::Build,
            vec![page("News & Programmes", "news.html", None, WriteStatus::Written)],
            vec![
                Issue::new("broken", IssueKind::EntryContentMissing, "no body"),
                Issue::new("camp", IssueKind::DateUnparseable, "no date given"),
            ],
        );
        r.entries_found = 2;
        let lines = format_build_report(&r);
        assert!(lines.contains(&"Skipped".to_string()));
        assert!(lines.contains(&"    broken: content missing (no body)".to_string()));
        assert!(lines.contains(&"Warnings".to_string()));
        assert!(lines.contains(&"    camp: date unparseable (no date given)".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "2 entries found: 1 page written, 0 unchanged, 1 error, 1 warning"
        );
    }

    #[test]
    fn check_report_lists_slugs() {
        let mut r = report(Mode::Check, vec![], vec![]);
        r.entries_found = 1;
        r.context.entries.push(Entry {
            slug: "camp".to_string(),
            source_dir: PathBuf::from("news/camp"),
            title: "Summer Camp".to_string(),
            date: EntryDate::Parsed(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
            summary: String::new(),
            body_html: String::new(),
            media: Vec::new(),
            thumbnail: None,
        });
        assert_eq!(
            format_build_report(&r),
            vec![
                "Entries",
                "001 Summer Camp (camp)",
                "",
                "1 entry checked: 0 errors, 0 warnings",
            ]
        );
    }

    #[test]
    fn error_section_empty_when_clean() {
        let r = report(Mode::Build, vec![], vec![]);
        assert!(format_errors(&r).is_empty());
    }
}
