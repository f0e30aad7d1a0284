//! Tag-aware content filter.
//!
//! A single-pass state machine that consumes markup tokens and accumulates
//! plain text, suppressing the whole subtree of any tag matched by the
//! configured ignore rules. Real-world input is not well-formed (`<img>`
//! and `<input>` rarely close, and stray end tags turn up inside ignored
//! spans), so the filter carries a recovery protocol instead of a
//! conformance error path: nothing fed to it ever aborts extraction.
//!
//! The machine has two macro-states, encoded by the suppression stack:
//!
//! - **Emitting** (stack empty): character data is normalized and appended;
//!   a start tag matching the ignore rules pushes an open frame and
//!   switches to Suppressing; paragraph-set tags mark a paragraph boundary.
//! - **Suppressing** (stack non-empty): character data is discarded; tags
//!   nest and unwind on the stack. An end tag nothing was waiting for is
//!   parked as a recovery frame to be cancelled by a matching start tag
//!   later; malformed markup sometimes closes an element that logically
//!   lives *outside* the suppressed region.
//!
//! One filter instance handles one document; rules are shared immutably
//! across instances.

mod diagnostics;
mod rules;

pub use diagnostics::{Malformation, MalformationHook, MalformationKind};
pub use rules::{FilterRules, TagMatcher};

use diagnostics::Diagnostics;

use crate::tokenizer::{Token, Tokenizer};

/// Suppression stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Frame {
    /// A suppressed region opened by this tag, still awaiting its close.
    Open(String),
    /// An end tag seen with no matching open tag; cancelled by the next
    /// same-named start tag.
    Recovery(String),
}

/// Streaming tag filter accumulating plain text.
///
/// Feed it markup (or individual [`Token`]s from a custom tokenizer) and
/// read the accumulated text at any point:
///
/// ```
/// use klartext::{FilterRules, TagFilter, TagMatcher};
///
/// let rules = FilterRules::new(
///     vec![TagMatcher::new("cite", &[])?],
///     &["br"],
///     &["img"],
///     &["p"],
/// )?;
/// let mut filter = TagFilter::new(&rules);
/// filter.feed("<p>Eins</p><cite>weg</cite><p>Zwei</p>");
/// assert_eq!(filter.text(), "Eins\n\nZwei");
/// # Ok::<(), klartext::Error>(())
/// ```
pub struct TagFilter<'a> {
    rules: &'a FilterRules,
    stack: Vec<Frame>,
    text: String,
    /// A paragraph boundary was seen; render it as `\n\n` before the next
    /// emitted text so boundaries act as separators, never as padding.
    break_pending: bool,
    diagnostics: Diagnostics,
}

impl<'a> TagFilter<'a> {
    /// Create a filter over the given rules.
    #[must_use]
    pub fn new(rules: &'a FilterRules) -> Self {
        Self::build(rules, None)
    }

    /// Create a filter that reports each malformation to `hook` in addition
    /// to counting it.
    #[must_use]
    pub fn with_diagnostics(rules: &'a FilterRules, hook: MalformationHook) -> Self {
        Self::build(rules, Some(hook))
    }

    fn build(rules: &'a FilterRules, hook: Option<MalformationHook>) -> Self {
        Self {
            rules,
            stack: Vec::new(),
            text: String::new(),
            break_pending: false,
            diagnostics: Diagnostics::new(hook),
        }
    }

    /// Tokenize `fragment` and process every token. May be called several
    /// times; tags left open keep suppressing across calls, so a fragment
    /// must not split a tag in two.
    pub fn feed(&mut self, fragment: &str) {
        for token in Tokenizer::new(fragment) {
            self.process(&token);
        }
    }

    /// Process one token from an external tokenizer.
    pub fn process(&mut self, token: &Token) {
        match token {
            Token::Text(data) => self.handle_text(data),
            Token::Start {
                name,
                attrs,
                self_closing,
            } => self.handle_start(name, attrs, *self_closing),
            Token::End { name } => self.handle_end(name),
        }
    }

    /// The text accumulated so far. Idempotent; may be read mid-stream.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the filter and return the accumulated text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Number of malformations recovered from so far.
    #[must_use]
    pub fn malformations(&self) -> usize {
        self.diagnostics.count()
    }

    /// True while inside a suppressed region. After the last fragment this
    /// signals an ignored tag that never closed.
    #[must_use]
    pub fn is_suppressing(&self) -> bool {
        !self.stack.is_empty()
    }

    fn handle_text(&mut self, data: &str) {
        if !self.stack.is_empty() {
            return;
        }
        let data = data.trim();
        if data.is_empty() {
            return;
        }
        if self.break_pending {
            self.text.push_str("\n\n");
            self.break_pending = false;
        } else if self.text.ends_with(|c: char| !c.is_whitespace()) {
            // Tags often separate words without any whitespace of their own.
            self.text.push(' ');
        }
        self.text.push_str(data);
    }

    fn handle_start(&mut self, name: &str, attrs: &[(String, String)], self_closing: bool) {
        // Void and self-closed tags have empty subtrees; they must never
        // land on the stack, or nothing would ever pop them.
        let empty_subtree = self_closing || self.rules.is_void(name);

        if self.stack.is_empty() {
            if self.rules.is_ignored(name, attrs) {
                if !empty_subtree {
                    self.stack.push(Frame::Open(name.to_string()));
                }
            } else if self.rules.is_paragraph(name) && !self.text.is_empty() {
                self.break_pending = true;
            }
            return;
        }

        if empty_subtree {
            return;
        }
        let cancels = matches!(self.stack.last(), Some(Frame::Recovery(owed)) if owed == name);
        if cancels {
            self.stack.pop();
            return;
        }
        self.stack.push(Frame::Open(name.to_string()));
    }

    /// End-tag recovery, in empirical priority order: exact match, void
    /// slippage, parked recovery frames, usually-self-closing frames, and
    /// as a last resort parking the end tag itself. Each retry pops one
    /// frame, so the loop is bounded by stack depth.
    fn handle_end(&mut self, name: &str) {
        while let Some(top) = self.stack.pop() {
            match top {
                Frame::Open(ref tag) if tag == name => return,
                _ if self.rules.is_void(name) => {
                    // A close for a void tag: tolerated, stack untouched.
                    self.stack.push(top);
                    return;
                }
                Frame::Recovery(tag) => {
                    // The stray close this frame was parked for belongs to
                    // junk we will never reconcile; drop it and retry.
                    self.diagnostics
                        .record(MalformationKind::AbandonedRecovery, &tag);
                }
                Frame::Open(ref tag) if self.rules.is_sometimes_unclosed(tag) => {
                    // Speculative pop: the element probably never closed.
                }
                Frame::Open(_) => {
                    self.stack.push(top);
                    self.diagnostics
                        .record(MalformationKind::UnmatchedEndTag, name);
                    self.stack.push(Frame::Recovery(name.to_string()));
                    return;
                }
            }
        }
        // Retries drained the stack: the end tag stands in emitting state.
        if self.rules.is_paragraph(name) && !self.text.is_empty() {
            self.break_pending = true;
        }
    }
}
