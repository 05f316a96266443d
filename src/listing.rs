//! The listing page: one card per entry plus the year/month filter.
//!
//! ## Ordering
//!
//! Cards are sorted by date, newest first. Dateless entries (missing or
//! unparseable date) go last. The sort is stable, so ties keep discovery
//! order, which is lexical by slug.
//!
//! ## Filtering
//!
//! Filtering happens in the browser. Each dated card carries `data-year` and
//! `data-month` attributes; dateless cards carry `data-dateless` instead and
//! only show under "All Years" / "All Months". The year filter offers the
//! distinct years present, newest first; the month filter always offers all
//! twelve months.

use crate::config::SiteConfig;
use crate::page::{Frame, NavTab, base_document};
use crate::paths::{Layout, Location, Target};
use crate::types::Entry;
use maud::{Markup, html};
use std::cmp::Reverse;

const LISTING_JS: &str = include_str!("../static/listing.js");

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Entries in listing order: newest first, dateless last.
pub fn ordered(entries: &[Entry]) -> Vec<&Entry> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    // `None` sorts before `Some`, so reversing puts dateless entries last
    sorted.sort_by_key(|e| Reverse(e.date.parsed()));
    sorted
}

/// Distinct years present, newest first.
pub fn distinct_years(entries: &[Entry]) -> Vec<i32> {
    let mut years: Vec<i32> = entries.iter().filter_map(|e| e.date.year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Renders the full listing page.
pub fn render_listing(entries: &[Entry], config: &SiteConfig, layout: &Layout) -> Markup {
    let content = if entries.is_empty() {
        render_empty_state()
    } else {
        html! {
            (render_filters(&distinct_years(entries)))
            div.news-grid id="newsGrid" {
                @for entry in ordered(entries) {
                    (render_card(entry, layout))
                }
            }
            div.no-results id="noResults" {
                h3 { "No programmes found" }
                p { "No programmes match the selected period. Try adjusting your filters." }
            }
        }
    };

    let frame = Frame {
        title: &config.listing.heading,
        description: &config.site.description,
        location: Location::Root,
        active: NavTab::Listing,
        heading: &config.listing.heading,
        intro: Some(config.listing.intro.as_str()).filter(|s| !s.is_empty()),
        script: (!entries.is_empty()).then_some(LISTING_JS),
    };
    base_document(config, layout, &frame, content)
}

fn render_filters(years: &[i32]) -> Markup {
    html! {
        div.filter-section {
            div.filter-row {
                label.filter-label for="yearFilter" { "Filter by:" }
                select.filter-select id="yearFilter" {
                    option value="all" { "All Years" }
                    @for year in years {
                        option value=(year) { (year) }
                    }
                }
                select.filter-select id="monthFilter" aria-label="Month" {
                    option value="all" { "All Months" }
                    @for (i, month) in MONTH_NAMES.iter().enumerate() {
                        option value=(i + 1) { (month) }
                    }
                }
            }
        }
    }
}

fn render_card(entry: &Entry, layout: &Layout) -> Markup {
    let thumbnail = entry
        .thumbnail
        .as_deref()
        .map(|file| layout.link(Location::Root, Target::EntryFile(&entry.slug, file)));
    let class = if thumbnail.is_some() {
        "news-card has-thumbnail"
    } else {
        "news-card"
    };

    html! {
        a class=(class)
            href=(layout.link(Location::Root, Target::Entry(&entry.slug)))
            data-year=[entry.date.year()]
            data-month=[entry.date.month()]
            data-dateless[entry.date.is_dateless()]
        {
            @if let Some(src) = &thumbnail {
                img.card-bg-thumb src=(src) alt="" loading="lazy";
                div.card-overlay {}
            }
            div.news-card-header {
                h3 { (entry.title) }
                @if let Some(date) = entry.date.display() {
                    div.news-card-date {
                        span { (date) }
                    }
                }
            }
            @if !entry.summary.is_empty() {
                div.news-card-body {
                    p { (entry.summary) }
                }
            }
            div.news-card-footer {
                span.footer-btn { "View Programme →" }
            }
        }
    }
}

fn render_empty_state() -> Markup {
    html! {
        div.empty-state {
            h3 { "No Programmes Yet" }
            p { "Check back soon for updates on our latest programmes and activities!" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryDate;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn entry(slug: &str, date: Option<(i32, u32, u32)>) -> Entry {
        Entry {
            slug: slug.to_string(),
            source_dir: PathBuf::from("news").join(slug),
            title: crate::naming::title_from_slug(slug),
            date: match date {
                Some((y, m, d)) => EntryDate::Parsed(NaiveDate::from_ymd_opt(y, m, d).unwrap()),
                None => EntryDate::Missing,
            },
            summary: format!("About {slug}"),
            body_html: String::new(),
            media: Vec::new(),
            thumbnail: None,
        }
    }

    fn slugs<'a>(entries: &[&'a Entry]) -> Vec<&'a str> {
        entries.iter().map(|e| e.slug.as_str()).collect()
    }

    fn render(entries: &[Entry]) -> String {
        let config = SiteConfig::default();
        render_listing(entries, &config, &Layout::new(&config)).into_string()
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    #[test]
    fn newest_first_dateless_last() {
        let entries = vec![
            entry("undated", None),
            entry("march", Some((2024, 3, 1))),
            entry("december", Some((2024, 12, 15))),
        ];
        assert_eq!(
            slugs(&ordered(&entries)),
            vec!["december", "march", "undated"]
        );
    }

    #[test]
    fn ties_keep_discovery_order() {
        let entries = vec![
            entry("a-camp", Some((2024, 5, 1))),
            entry("b-walk", Some((2024, 5, 1))),
            entry("c-none", None),
            entry("d-none", None),
        ];
        assert_eq!(
            slugs(&ordered(&entries)),
            vec!["a-camp", "b-walk", "c-none", "d-none"]
        );
    }

    #[test]
    fn unparseable_dates_sort_with_dateless() {
        let mut odd = entry("odd", None);
        odd.date = EntryDate::Unparseable("soon".to_string());
        let entries = vec![odd, entry("dated", Some((2020, 1, 1)))];
        assert_eq!(slugs(&ordered(&entries)), vec!["dated", "odd"]);
    }

    #[test]
    fn years_distinct_descending() {
        let entries = vec![
            entry("a", Some((2022, 1, 1))),
            entry("b", Some((2024, 6, 1))),
            entry("c", None),
            entry("d", Some((2022, 9, 1))),
        ];
        assert_eq!(distinct_years(&entries), vec![2024, 2022]);
    }

    // =========================================================================
    // render_listing()
    // =========================================================================

    #[test]
    fn empty_listing_shows_empty_state() {
        let html = render(&[]);
        assert!(html.contains("No Programmes Yet"));
        assert!(!html.contains("yearFilter"));
        assert!(!html.contains("newsGrid"));
    }

    #[test]
    fn filters_offer_years_and_all_months() {
        let html = render(&[entry("a", Some((2023, 4, 2)))]);
        assert!(html.contains(r#"<option value="all">All Years</option><option value="2023">2023</option>"#));
        assert!(html.contains(r#"<option value="1">January</option>"#));
        assert!(html.contains(r#"<option value="12">December</option>"#));
        assert_eq!(html.matches("<option").count(), 2 + 12 + 1);
    }

    #[test]
    fn cards_carry_date_attributes() {
        let html = render(&[entry("camp", Some((2024, 3, 1)))]);
        assert!(html.contains(
            r#"<a class="news-card" href="news/camp/index.html" data-year="2024" data-month="3">"#
        ));
        assert!(html.contains("March 01, 2024"));
        assert!(html.contains("<p>About camp</p>"));
    }

    #[test]
    fn dateless_card_is_marked() {
        let html = render(&[entry("camp", None)]);
        assert!(html.contains(r#"<a class="news-card" href="news/camp/index.html" data-dateless>"#));
        assert!(!html.contains("data-year="));
    }

    #[test]
    fn thumbnail_card() {
        let mut e = entry("camp", Some((2024, 3, 1)));
        e.thumbnail = Some("thumbnail.jpg".to_string());
        let html = render(&[e]);
        assert!(html.contains(r#"class="news-card has-thumbnail""#));
        assert!(html.contains(r#"<img class="card-bg-thumb" src="news/camp/thumbnail.jpg""#));
    }

    #[test]
    fn listing_page_chrome() {
        let html = render(&[entry("camp", None)]);
        assert!(html.contains("<title>News &amp; Programmes | Community Programmes</title>"));
        assert!(html.contains(r#"<a href="news.html" class="active">News</a>"#));
        assert!(html.contains(r#"id="noResults""#));
        assert!(html.contains("monthFilter"));
    }

    #[test]
    fn cards_in_listing_order() {
        let html = render(&[
            entry("undated", None),
            entry("march", Some((2024, 3, 1))),
            entry("december", Some((2024, 12, 15))),
        ]);
        let pos = |slug: &str| html.find(&format!("news/{slug}/index.html")).unwrap();
        assert!(pos("december") < pos("march"));
        assert!(pos("march") < pos("undated"));
    }
}
