//! Filter configuration: ignore rules and tag sets.
//!
//! The tables here are data, not logic: the dialect presets shipped with the
//! pipeline modules were derived empirically from observed documents, and a
//! caller targeting another markup dialect supplies its own tables without
//! touching the filter.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// Predicate over a concrete start tag.
///
/// Matches iff the tag name is equal and the observed attribute set is a
/// superset of the required (name, value) pairs; extra attributes on the
/// real tag do not disqualify a match.
///
/// ```
/// use klartext::TagMatcher;
///
/// let info = TagMatcher::new("span", &[("class", "info")])?;
/// assert!(info.matches(
///     "span",
///     &[("class".into(), "info".into()), ("id".into(), "x".into())]
/// ));
/// assert!(!info.matches("span", &[("class".into(), "plain".into())]));
/// # Ok::<(), klartext::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TagMatcher {
    tag: String,
    required: Vec<(String, String)>,
}

impl TagMatcher {
    /// Build a matcher for `tag` with the given required attribute pairs.
    ///
    /// Tag and attribute names are trimmed and lowercased; empty names are a
    /// configuration error.
    pub fn new(tag: &str, required: &[(&str, &str)]) -> Result<Self> {
        let tag = normalize_tag(tag)?;
        let mut pairs = Vec::with_capacity(required.len());
        for (name, value) in required {
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                return Err(Error::InvalidRule(format!(
                    "empty attribute name on <{tag}> rule"
                )));
            }
            pairs.push((name, (*value).to_string()));
        }
        Ok(Self {
            tag,
            required: pairs,
        })
    }

    /// The (lowercased) tag name this matcher applies to.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Superset predicate against an observed tag.
    #[must_use]
    pub fn matches(&self, tag: &str, attrs: &[(String, String)]) -> bool {
        self.tag == tag
            && self
                .required
                .iter()
                .all(|(rn, rv)| attrs.iter().any(|(an, av)| an == rn && av == rv))
    }
}

/// Immutable rule tables driving one [`TagFilter`](crate::TagFilter).
///
/// - `ignore`: start tags whose entire subtree is suppressed.
/// - `void`: tags that never produce a close in the observed dialect; they
///   are never pushed onto the suppression stack.
/// - `sometimes_unclosed`: usually self-closing tags that occasionally do
///   close; their frames may be popped speculatively during recovery.
/// - `paragraph`: tags whose boundary renders as a blank line in the output.
#[derive(Debug, Clone)]
pub struct FilterRules {
    ignore: Vec<TagMatcher>,
    void: HashSet<String>,
    sometimes_unclosed: HashSet<String>,
    paragraph: HashSet<String>,
}

impl FilterRules {
    /// Validate and assemble a rule set. Fails on any empty tag name,
    /// before any fragment is processed.
    pub fn new(
        ignore: Vec<TagMatcher>,
        void: &[&str],
        sometimes_unclosed: &[&str],
        paragraph: &[&str],
    ) -> Result<Self> {
        Ok(Self {
            ignore,
            void: tag_set(void)?,
            sometimes_unclosed: tag_set(sometimes_unclosed)?,
            paragraph: tag_set(paragraph)?,
        })
    }

    /// Whether a start tag opens a suppressed region.
    #[must_use]
    pub fn is_ignored(&self, tag: &str, attrs: &[(String, String)]) -> bool {
        self.ignore.iter().any(|rule| rule.matches(tag, attrs))
    }

    /// Whether `tag` never closes in this dialect.
    #[must_use]
    pub fn is_void(&self, tag: &str) -> bool {
        self.void.contains(tag)
    }

    /// Whether `tag` is usually self-closing but occasionally closes.
    #[must_use]
    pub fn is_sometimes_unclosed(&self, tag: &str) -> bool {
        self.sometimes_unclosed.contains(tag)
    }

    /// Whether `tag` marks a paragraph boundary.
    #[must_use]
    pub fn is_paragraph(&self, tag: &str) -> bool {
        self.paragraph.contains(tag)
    }
}

fn normalize_tag(tag: &str) -> Result<String> {
    let tag = tag.trim().to_ascii_lowercase();
    if tag.is_empty() {
        return Err(Error::InvalidRule("empty tag name".to_string()));
    }
    Ok(tag)
}

fn tag_set(tags: &[&str]) -> Result<HashSet<String>> {
    tags.iter().map(|tag| normalize_tag(tag)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(attrs: &[(&str, &str)]) -> Vec<(String, String)> {
        attrs
            .iter()
            .map(|(n, v)| ((*n).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn matcher_requires_attribute_superset() {
        let rule = TagMatcher::new("span", &[("class", "info")]).unwrap();
        assert!(rule.matches("span", &owned(&[("class", "info")])));
        assert!(rule.matches("span", &owned(&[("id", "a"), ("class", "info")])));
        assert!(!rule.matches("span", &owned(&[("class", "other")])));
        assert!(!rule.matches("span", &[]));
        assert!(!rule.matches("div", &owned(&[("class", "info")])));
    }

    #[test]
    fn matcher_without_required_attributes_matches_any() {
        let rule = TagMatcher::new("cite", &[]).unwrap();
        assert!(rule.matches("cite", &[]));
        assert!(rule.matches("cite", &owned(&[("class", "whatever")])));
    }

    #[test]
    fn matcher_normalizes_tag_case() {
        let rule = TagMatcher::new(" SPAN ", &[("CLASS", "info")]).unwrap();
        assert_eq!(rule.tag(), "span");
        assert!(rule.matches("span", &owned(&[("class", "info")])));
    }

    #[test]
    fn empty_tag_name_is_a_configuration_error() {
        assert!(matches!(
            TagMatcher::new("  ", &[]),
            Err(Error::InvalidRule(_))
        ));
    }

    #[test]
    fn empty_attribute_name_is_a_configuration_error() {
        assert!(matches!(
            TagMatcher::new("span", &[("", "info")]),
            Err(Error::InvalidRule(_))
        ));
    }

    #[test]
    fn rules_reject_empty_set_entries() {
        let result = FilterRules::new(Vec::new(), &["br", ""], &[], &["p"]);
        assert!(matches!(result, Err(Error::InvalidRule(_))));
    }

    #[test]
    fn rules_classify_tags() {
        let rules = FilterRules::new(
            vec![TagMatcher::new("figure", &[]).unwrap()],
            &["BR"],
            &["img"],
            &["p"],
        )
        .unwrap();
        assert!(rules.is_ignored("figure", &[]));
        assert!(!rules.is_ignored("p", &[]));
        assert!(rules.is_void("br"));
        assert!(rules.is_sometimes_unclosed("img"));
        assert!(rules.is_paragraph("p"));
        assert!(!rules.is_paragraph("div"));
    }
}
