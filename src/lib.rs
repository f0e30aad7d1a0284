//! # klartext
//!
//! Plain-text article extraction for magazine markup.
//!
//! The crate bundles a set of small extraction pipelines (Perspective Daily
//! web articles, "Die Zeit" EPUB articles, MaxPlanckForschung magazine
//! texts) around one shared core: a tag-aware content filter that turns
//! malformed, hand-authored HTML fragments into clean plain text while
//! discarding whole subtrees (footnotes, quotes, scripts, figures).
//!
//! The filter is a single-pass state machine over markup tokens. It
//! recovers from the structural errors real input carries (unclosed
//! `<img>`/`<input>`, stray end tags inside ignored spans) without losing
//! or duplicating text, and reports every recovery through an injected
//! diagnostics sink instead of failing.
//!
//! ## Quick Start
//!
//! ```rust
//! use klartext::{filter_fragment, perspective_daily};
//!
//! let fragment = r#"<p>Guten Tag</p><span class="info">Fußnote</span><p>Welt</p>"#;
//! let text = filter_fragment(fragment, perspective_daily::filter_rules());
//! assert_eq!(text, "Guten Tag\n\nWelt");
//! ```
//!
//! Rule tables are configuration data: each pipeline ships the table for
//! its markup dialect, and other dialects plug in without code change.
//!
//! ```rust
//! use klartext::{FilterRules, TagMatcher, filter_fragment};
//!
//! let rules = FilterRules::new(
//!     vec![TagMatcher::new("aside", &[])?],
//!     &["br"],
//!     &["img"],
//!     &["p", "h2"],
//! )?;
//! let text = filter_fragment("<h2>Titel</h2><aside>weg</aside><p>Text</p>", &rules);
//! assert_eq!(text, "Titel\n\nText");
//! # Ok::<(), klartext::Error>(())
//! ```

mod error;

/// Character encoding helpers (caller-supplied encodings only).
pub mod encoding;

/// Tag-aware content filter: ignore rules, suppression stack, recovery.
pub mod filter;

/// MaxPlanckForschung magazine pipeline.
pub mod mpf;

/// Perspective Daily article pipeline.
pub mod perspective_daily;

/// Collaborator contract for fetching raw markup.
pub mod sources;

/// Permissive markup tokenizer feeding the filter.
pub mod tokenizer;

/// "Die Zeit" EPUB article extraction.
pub mod zeit;

// Public API - re-exports
pub use error::{Error, Result};
pub use filter::{
    FilterRules, Malformation, MalformationHook, MalformationKind, TagFilter, TagMatcher,
};
pub use tokenizer::{Token, Tokenizer};

/// Run one markup fragment through a fresh [`TagFilter`] and return the
/// extracted plain text.
///
/// Malformed input never fails; callers who need the diagnostics drive a
/// [`TagFilter`] directly.
#[must_use]
pub fn filter_fragment(fragment: &str, rules: &FilterRules) -> String {
    let mut filter = TagFilter::new(rules);
    filter.feed(fragment);
    filter.into_text()
}
