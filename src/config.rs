//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives at the
//! site root next to the hand-authored home page. Stock defaults are the base
//! layer; the user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_dir = "news"          # Content root, relative to the site root
//! listing_page = "news.html"    # Generated listing page, at the output root
//! home_page = "index.html"      # Hand-authored home page (never written)
//! stylesheet = "css/style.css"  # Theme stylesheet (never written)
//! logo = "images/logo.png"      # Brand image, also used as favicon
//! summary_length = 150          # Characters kept for derived summaries
//!
//! [site]
//! name = "Community Programmes"
//! tagline = ""
//! description = "Latest news and programmes."
//! footer = ""
//!
//! [nav]
//! home_label = "About"
//! listing_label = "News"
//!
//! [listing]
//! heading = "News & Programmes"
//! intro = "Stay updated with our latest activities and completed programmes"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Content root holding one folder per entry, relative to the site root.
    pub content_dir: String,
    /// Listing page filename, written at the output root.
    pub listing_page: String,
    /// Hand-authored home page the nav links to.
    pub home_page: String,
    /// Theme stylesheet linked from every generated page.
    pub stylesheet: String,
    /// Brand image shown in the nav bar and used as favicon.
    pub logo: String,
    /// Maximum characters of a summary derived from the body.
    pub summary_length: usize,
    pub site: SiteInfo,
    pub nav: NavLabels,
    pub listing: ListingText,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: "news".to_string(),
            listing_page: "news.html".to_string(),
            home_page: "index.html".to_string(),
            stylesheet: "css/style.css".to_string(),
            logo: "images/logo.png".to_string(),
            summary_length: 150,
            site: SiteInfo::default(),
            nav: NavLabels::default(),
            listing: ListingText::default(),
        }
    }
}

/// Site identity shown in the nav bar, head and footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub name: String,
    /// Small line under the brand name. Omitted when empty.
    pub tagline: String,
    /// Meta description of the listing page.
    pub description: String,
    /// Footer text. The footer is omitted when empty.
    pub footer: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Community Programmes".to_string(),
            tagline: String::new(),
            description: "Latest news and programmes.".to_string(),
            footer: String::new(),
        }
    }
}

/// Labels of the two nav tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavLabels {
    pub home_label: String,
    pub listing_label: String,
}

impl Default for NavLabels {
    fn default() -> Self {
        Self {
            home_label: "About".to_string(),
            listing_label: "News".to_string(),
        }
    }
}

/// Header text of the listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingText {
    pub heading: String,
    pub intro: String,
}

impl Default for ListingText {
    fn default() -> Self {
        Self {
            heading: "News & Programmes".to_string(),
            intro: "Stay updated with our latest activities and completed programmes".to_string(),
        }
    }
}

impl SiteConfig {
    /// Validate that paths stay inside the site and values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_plain_relative(&self.content_dir) {
            return Err(ConfigError::Validation(
                "content_dir must be a relative path inside the site root".into(),
            ));
        }
        if self.listing_page.contains('/')
            || self.listing_page.contains('\\')
            || !self.listing_page.ends_with(".html")
            || self.listing_page.len() <= ".html".len()
        {
            return Err(ConfigError::Validation(
                "listing_page must be a bare .html filename".into(),
            ));
        }
        for (key, value) in [
            ("home_page", &self.home_page),
            ("stylesheet", &self.stylesheet),
            ("logo", &self.logo),
        ] {
            if !is_plain_relative(value) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a relative path inside the site root"
                )));
            }
        }
        let home = path_segments(&self.home_page);
        if home == path_segments(&self.listing_page) {
            return Err(ConfigError::Validation(
                "listing_page must not be the hand-authored home_page".into(),
            ));
        }
        let content = self.content_segments();
        if home.len() == content.len() + 2
            && home.starts_with(&content)
            && home.last().is_some_and(|name| name == crate::paths::ENTRY_PAGE)
        {
            return Err(ConfigError::Validation(format!(
                "home_page must not be a generated entry page under {}",
                self.content_dir
            )));
        }
        if self.summary_length == 0 {
            return Err(ConfigError::Validation(
                "summary_length must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Path segments of the content root, used for entry page depth and URLs.
    pub fn content_segments(&self) -> Vec<String> {
        path_segments(&self.content_dir)
    }
}

/// Normal components of a relative path, with `.` dropped.
fn path_segments(path: &str) -> Vec<String> {
    Path::new(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Non-empty, relative, and free of `..` or root components.
fn is_plain_relative(path: &str) -> bool {
    !path.trim().is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the site root, falling back to defaults.
pub fn load_config(site_root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(site_root)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# newsfold configuration
# ======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys cause an error.

# Content root: one folder per programme, relative to the site root.
content_dir = "news"

# Generated listing page, written at the output root.
listing_page = "news.html"

# Hand-authored home page. newsfold links to it but never writes it.
home_page = "index.html"

# Theme stylesheet linked from every generated page (never written).
stylesheet = "css/style.css"

# Brand image shown in the nav bar, also used as favicon.
logo = "images/logo.png"

# When info.json has no summary, this many characters of the body are used.
summary_length = 150

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
name = "Community Programmes"
# Small line under the brand name; empty hides it.
tagline = ""
description = "Latest news and programmes."
# Footer text; empty hides the footer.
footer = ""

# ---------------------------------------------------------------------------
# Navigation labels
# ---------------------------------------------------------------------------
[nav]
home_label = "About"
listing_label = "News"

# ---------------------------------------------------------------------------
# Listing page header
# ---------------------------------------------------------------------------
[listing]
heading = "News & Programmes"
intro = "Stay updated with our latest activities and completed programmes"
"##
}
