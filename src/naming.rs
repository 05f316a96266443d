//! Display names derived from folder and file names.
//!
//! Entry folders and media files are named by authors with separators instead
//! of spaces (`youth-leadership-camp`, `opening_ceremony.jpg`). When no explicit
//! title exists, the name is split into words on separators and each word is
//! capitalized:
//!
//! - `youth-leadership-camp` → "Youth Leadership Camp"
//! - `beach_clean-up 2024` → "Beach Clean Up 2024"
//! - `01-arrival` → "01 Arrival"

/// Characters that separate words in slugs and file stems.
const SEPARATORS: &[char] = &['-', '_', ' '];

/// Split a slug into words and capitalize each one.
///
/// Runs of separators collapse, so `a--b` yields "A B". Only the first
/// character of each word changes; the rest keep their original case, which
/// leaves acronyms like `YMCA` intact. Dots stay inside words (`v2.0`). A
/// name made only of separators is returned as it is.
pub fn title_from_slug(slug: &str) -> String {
    let title = slug
        .split(SEPARATORS)
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");
    if title.is_empty() {
        slug.to_string()
    } else {
        title
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether a file or directory name is hidden (dot-prefixed).
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
