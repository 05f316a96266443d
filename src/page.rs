//! Page assembly.
//!
//! Every generated page goes through [`base_document`], so the head, nav bar,
//! page header and footer are identical everywhere except for the active nav
//! tab and the relative prefix. Page kinds only supply the `<main>` content
//! and an optional script.
//!
//! ## Scripts
//!
//! Static JavaScript is embedded at compile time:
//! - `static/nav.js`: mobile menu toggle (every page)
//! - `static/viewer.js`: gallery overlay (entry pages with media)
//! - `static/listing.js`: year/month filter (listing page)

use crate::config::SiteConfig;
use crate::media::render_gallery;
use crate::paths::{Layout, Location, Target};
use crate::types::Entry;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const NAV_JS: &str = include_str!("../static/nav.js");
const VIEWER_JS: &str = include_str!("../static/viewer.js");

/// Which nav link is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTab {
    Home,
    Listing,
}

/// Per-page inputs to the shared layout.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Page part of `<title>`; the site name is appended.
    pub title: &'a str,
    pub description: &'a str,
    pub location: Location,
    pub active: NavTab,
    pub heading: &'a str,
    pub intro: Option<&'a str>,
    pub script: Option<&'static str>,
}

/// The one page template: head, nav, header, `content`, footer.
pub fn base_document(config: &SiteConfig, layout: &Layout, frame: &Frame, content: Markup) -> Markup {
    let at = |target| layout.link(frame.location, target);
    let home = at(Target::Home);
    let logo = at(Target::Asset(&config.logo));

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(frame.description);
                title { (frame.title) " | " (config.site.name) }
                link rel="icon" href=(logo);
                link rel="stylesheet" href=(at(Target::Asset(&config.stylesheet)));
            }
            body {
                nav.navbar {
                    div.nav-container {
                        a.logo href=(home) {
                            img.logo-icon src=(logo) alt={ (config.site.name) " logo" };
                            div.logo-text {
                                (config.site.name)
                                @if !config.site.tagline.is_empty() {
                                    span { (config.site.tagline) }
                                }
                            }
                        }
                        button.mobile-menu-btn type="button" aria-label="Toggle menu" { "☰" }
                        ul.nav-links id="navLinks" {
                            li {
                                a href=(home) class=[(frame.active == NavTab::Home).then_some("active")] {
                                    (config.nav.home_label)
                                }
                            }
                            li {
                                a href=(at(Target::Listing)) class=[(frame.active == NavTab::Listing).then_some("active")] {
                                    (config.nav.listing_label)
                                }
                            }
                        }
                    }
                }
                header.page-header {
                    div.page-header-content {
                        h1 { (frame.heading) }
                        @if let Some(intro) = frame.intro {
                            p { (intro) }
                        }
                    }
                }
                main.main-content {
                    (content)
                }
                @if !config.site.footer.is_empty() {
                    footer.footer {
                        div.footer-content {
                            p.footer-text { (config.site.footer) }
                        }
                    }
                }
                script { (PreEscaped(NAV_JS)) }
                @if let Some(script) = frame.script {
                    script { (PreEscaped(script)) }
                }
            }
        }
    }
}

/// Renders one entry page: back link, date, body, gallery.
pub fn render_entry_page(entry: &Entry, config: &SiteConfig, layout: &Layout) -> Markup {
    let has_media = !entry.media.is_empty();
    let description = if entry.summary.is_empty() {
        config.site.description.as_str()
    } else {
        entry.summary.as_str()
    };

    let content = html! {
        a.back-link href=(layout.link(Location::Entry, Target::Listing)) {
            "← Back to " (config.nav.listing_label)
        }
        article.programme-content {
            @if let Some(date) = entry.date.display() {
                div.programme-meta {
                    time datetime=[entry.date.parsed().map(|d| d.to_string())] { (date) }
                }
            }
            div.article-content {
                (PreEscaped(&entry.body_html))
            }
            (render_gallery(&entry.media))
        }
        @if has_media {
            div.viewer-overlay id="viewerOverlay" {
                button.viewer-close type="button" aria-label="Close" { "×" }
                div.viewer-content id="viewerContent" {}
            }
        }
    };

    let frame = Frame {
        title: &entry.title,
        description,
        location: Location::Entry,
        active: NavTab::Listing,
        heading: &entry.title,
        intro: None,
        script: has_media.then_some(VIEWER_JS),
    };
    base_document(config, layout, &frame, content)
}
