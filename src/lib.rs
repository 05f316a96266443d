//! # newsfold
//!
//! A static site builder for programme news. Your filesystem is the data
//! source: every folder under the content root is one entry, its `info.json`
//! and `article.md` become an entry page, and all entries together become a
//! listing page with a year/month filter.
//!
//! # Architecture: One Pass, In Memory
//!
//! ```text
//! 1. Scan     news/          →  entry folders       (lexical order)
//! 2. Load     each folder    →  Entry | Issue       (metadata, body, media)
//! 3. Render   entries        →  HTML strings        (maud, pure)
//! 4. Write    HTML strings   →  output tree         (atomic, skip unchanged)
//! ```
//!
//! Nothing is cached between runs. The content tree is small, and rebuilding
//! from scratch every time keeps the output a pure function of the input:
//! two builds over the same content produce byte-identical pages.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Discovers entry folders under the content root |
//! | [`metadata`] | Reads `info.json` and the body file, derives missing fields |
//! | [`markdown`] | Renders the restricted markdown subset to HTML |
//! | [`media`] | Classifies gallery files, finds thumbnails, renders the gallery |
//! | [`paths`] | Relative links between pages at different depths |
//! | [`page`] | The shared page layout and entry pages |
//! | [`listing`] | Listing order, filter options, cards |
//! | [`persist`] | Atomic writes that leave unchanged files alone |
//! | [`pipeline`] | Runs the stages and collects per-entry issues |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Shared types: `Entry`, `Issue`, `BuildContext` |
//! | [`naming`] | Slug to title conversion, hidden-file rule |
//! | [`output`] | Operator report formatting |
//!
//! # Design Decisions
//!
//! ## Errors Are Per Entry
//!
//! Only a missing content root or a bad config stops the build, and both are
//! detected before anything is written. An entry without a body is left out
//! and reported; a malformed `info.json`, a bad date or an unreadable media
//! file only produce warnings. The process exits non-zero when any entry was
//! left out, after every other page has been written.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Every
//! interpolated value is escaped unless wrapped in `PreEscaped`, which is
//! reserved for the rendered body and the embedded scripts.
//!
//! ## Restricted Markdown
//!
//! Entry bodies support `##` headings, lists, blockquotes, rules, bold and
//! italic. Anything else is shown as literal text rather than guessed at. The
//! block structure is a small line-oriented state machine; inline spans come
//! from `pulldown-cmark`.
//!
//! ## Relative Links Everywhere
//!
//! Pages never use absolute URLs, so the generated site works from any base
//! path, including straight off the disk.

pub mod config;
pub mod listing;
pub mod markdown;
pub mod media;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod page;
pub mod paths;
pub mod persist;
pub mod pipeline;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
