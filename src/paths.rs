//! Relative link resolution.
//!
//! Generated pages live at two depths:
//!
//! ```text
//! news.html                      # root level: depth 0
//! news/youth-leadership-camp/    # entry level: depth = content_dir segments + 1
//!     index.html
//! ```
//!
//! Every link is relative, so the site works from any base path (a
//! subfolder on a shared host, or straight off the disk). A page at depth
//! `n` reaches the output root with `n` repetitions of `../`.

use crate::config::SiteConfig;
use std::path::PathBuf;

/// File name of every entry page.
pub const ENTRY_PAGE: &str = "index.html";

/// Where a page sits in the output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Root,
    Entry,
}

/// What a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Home,
    Listing,
    /// An entry page, by slug.
    Entry(&'a str),
    /// A file under the entry's own folder (media, thumbnail), from the listing.
    EntryFile(&'a str, &'a str),
    /// A site-root relative asset (stylesheet, logo).
    Asset(&'a str),
}

/// Output layout derived from the site config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    home_page: String,
    listing_page: String,
    content_segments: Vec<String>,
}

impl Layout {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            home_page: config.home_page.clone(),
            listing_page: config.listing_page.clone(),
            content_segments: config.content_segments(),
        }
    }

    /// Directory depth of a page at `location`.
    pub fn depth(&self, location: Location) -> usize {
        match location {
            Location::Root => 0,
            Location::Entry => self.content_segments.len() + 1,
        }
    }

    /// Prefix that leads from a page at `location` back to the output root.
    pub fn prefix(&self, location: Location) -> String {
        "../".repeat(self.depth(location))
    }

    /// Link from a page at `from` to `target`.
    pub fn link(&self, from: Location, target: Target<'_>) -> String {
        format!("{}{}", self.prefix(from), self.root_relative(target))
    }

    /// Path of `target` from the output root, URL-encoded.
    fn root_relative(&self, target: Target<'_>) -> String {
        match target {
            Target::Home => encode_path(&self.home_page),
            Target::Listing => encode_path(&self.listing_page),
            Target::Entry(slug) => format!("{}{ENTRY_PAGE}", self.entry_dir_url(slug)),
            Target::EntryFile(slug, file) => {
                format!("{}{}", self.entry_dir_url(slug), encode_segment(file))
            }
            Target::Asset(path) => encode_path(path),
        }
    }

    fn entry_dir_url(&self, slug: &str) -> String {
        let mut url = String::new();
        for segment in &self.content_segments {
            url.push_str(&encode_segment(segment));
            url.push('/');
        }
        url.push_str(&encode_segment(slug));
        url.push('/');
        url
    }

    /// Filesystem path of the listing page, relative to the output root.
    pub fn listing_path(&self) -> PathBuf {
        PathBuf::from(&self.listing_page)
    }

    /// Filesystem folder of an entry page, relative to the output root.
    pub fn entry_dir(&self, slug: &str) -> PathBuf {
        let mut path: PathBuf = self.content_segments.iter().collect();
        path.push(slug);
        path
    }

    /// Filesystem path of an entry page, relative to the output root.
    pub fn entry_path(&self, slug: &str) -> PathBuf {
        self.entry_dir(slug).join(ENTRY_PAGE)
    }

    /// Entry page path with `/` separators, for reports.
    pub fn entry_display_path(&self, slug: &str) -> String {
        let mut parts = self.content_segments.clone();
        parts.push(slug.to_string());
        parts.push(ENTRY_PAGE.to_string());
        parts.join("/")
    }
}

/// Percent-encode one URL path segment.
///
/// Everything but unreserved characters is escaped, including `:`, so a bare
/// file name such as `photo:1.jpg` can never read as a URL scheme.
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout::new(&SiteConfig::default())
    }

    // =========================================================================
    // Depth and prefix
    // =========================================================================

    #[test]
    fn default_depths() {
        let layout = layout();
        assert_eq!(layout.prefix(Location::Root), "");
        assert_eq!(layout.prefix(Location::Entry), "../../");
    }

    #[test]
    fn nested_content_dir_deepens_entries() {
        let config = SiteConfig {
            content_dir: "site/news".to_string(),
            ..SiteConfig::default()
        };
        let layout = Layout::new(&config);
        assert_eq!(layout.depth(Location::Entry), 3);
        assert_eq!(layout.link(Location::Entry, Target::Home), "../../../index.html");
    }

    // =========================================================================
    // link()
    // =========================================================================

    #[test]
    fn root_pages_link_by_bare_name() {
        let layout = layout();
        assert_eq!(layout.link(Location::Root, Target::Home), "index.html");
        assert_eq!(layout.link(Location::Root, Target::Listing), "news.html");
        assert_eq!(
            layout.link(Location::Root, Target::Asset("css/style.css")),
            "css/style.css"
        );
    }

    #[test]
    fn root_pages_link_into_entries() {
        let layout = layout();
        assert_eq!(
            layout.link(Location::Root, Target::Entry("beach-cleanup")),
            "news/beach-cleanup/index.html"
        );
        assert_eq!(
            layout.link(Location::Root, Target::EntryFile("camp", "thumbnail.jpg")),
            "news/camp/thumbnail.jpg"
        );
    }

    #[test]
    fn entry_pages_walk_up() {
        let layout = layout();
        assert_eq!(layout.link(Location::Entry, Target::Home), "../../index.html");
        assert_eq!(layout.link(Location::Entry, Target::Listing), "../../news.html");
        assert_eq!(
            layout.link(Location::Entry, Target::Asset("images/logo.png")),
            "../../images/logo.png"
        );
        assert_eq!(
            layout.link(Location::Entry, Target::Entry("other")),
            "../../news/other/index.html"
        );
    }

    #[test]
    fn slugs_are_encoded() {
        assert_eq!(
            layout().link(Location::Root, Target::Entry("camp #1")),
            "news/camp%20%231/index.html"
        );
    }

    // =========================================================================
    // Filesystem paths
    // =========================================================================

    #[test]
    fn entry_paths() {
        let layout = layout();
        assert_eq!(
            layout.entry_path("camp"),
            PathBuf::from("news").join("camp").join("index.html")
        );
        assert_eq!(layout.entry_display_path("camp"), "news/camp/index.html");
        assert_eq!(layout.listing_path(), PathBuf::from("news.html"));
    }

    #[test]
    fn encode_segment_leaves_plain_names() {
        assert_eq!(encode_segment("01-arrival.jpg"), "01-arrival.jpg");
        assert_eq!(encode_segment("50% off?"), "50%25%20off%3F");
    }

    #[test]
    fn encode_segment_escapes_scheme_and_separators() {
        assert_eq!(encode_segment("photo:1.jpg"), "photo%3A1.jpg");
        assert_eq!(encode_segment("a/b\\c"), "a%2Fb%5Cc");
        assert_eq!(encode_segment("café"), "caf%C3%A9");
    }

    #[test]
    fn entry_file_with_colon_stays_relative() {
        let href = layout().link(Location::Root, Target::EntryFile("camp", "photo:1.jpg"));
        assert_eq!(href, "news/camp/photo%3A1.jpg");
    }
}
