//! Perspective Daily article pipeline.
//!
//! Perspective Daily pages carry the article inside an Angular tab
//! container; the fragment between the content marker and the info box that
//! follows it is hand-authored and not well-formed, which is exactly what
//! the tag filter exists for. Footnote spans, citations, pull quotes and
//! figures repeat or annotate the running text and are suppressed wholesale.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};
use crate::filter::{FilterRules, TagFilter, TagMatcher};
use crate::sources::Fetcher;

/// Everything between the article container and the info box behind it.
#[allow(clippy::expect_used)]
static ARTICLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<div class="content" ng-show="tab=='article'">(.*)<div class="infos" ng-show="tab=='article'">"#,
    )
    .expect("ARTICLE_RE regex")
});

#[allow(clippy::expect_used)]
static RULES: LazyLock<FilterRules> =
    LazyLock::new(|| build_rules().expect("built-in Perspective Daily rules"));

/// The empirical Perspective Daily rule table. Derived from observed
/// articles; unfamiliar markup may still produce (non-fatal) malformation
/// warnings.
fn build_rules() -> Result<FilterRules> {
    FilterRules::new(
        vec![
            TagMatcher::new("span", &[("class", "info")])?,
            TagMatcher::new("cite", &[])?,
            TagMatcher::new("q", &[("class", "quote")])?,
            TagMatcher::new("figure", &[])?,
            TagMatcher::new("script", &[])?,
            TagMatcher::new("style", &[])?,
        ],
        &["br", "hr", "input", "meta", "link", "wbr"],
        &["img"],
        &["p"],
    )
}

/// Filter rules for Perspective Daily markup.
#[must_use]
pub fn filter_rules() -> &'static FilterRules {
    &RULES
}

/// Locate the article fragment within a full page.
pub fn find_article(html: &str) -> Result<&str> {
    ARTICLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(Error::NoContent)
}

/// Extract the plain text of an article page.
pub fn article_to_text(html: &str) -> Result<String> {
    let fragment = find_article(html)?;
    let mut filter = TagFilter::new(filter_rules());
    filter.feed(fragment);
    let malformations = filter.malformations();
    if malformations > 0 {
        log::debug!("recovered from {malformations} malformation(s) in article markup");
    }
    Ok(filter.into_text())
}

/// Fetch an article page and extract its plain text.
pub fn fetch_article(fetcher: &mut dyn Fetcher, url: &Url) -> Result<String> {
    let html = fetcher.fetch(url)?;
    article_to_text(&html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(article: &str) -> String {
        format!(
            "<html><body><div class=\"tabs\">x</div>\
             <div class=\"content\" ng-show=\"tab=='article'\">{article}\
             <div class=\"infos\" ng-show=\"tab=='article'\">impressum</div></body></html>"
        )
    }

    #[test]
    fn finds_the_article_region() {
        let html = page("<p>Inhalt</p>");
        assert_eq!(find_article(&html).unwrap(), "<p>Inhalt</p>");
    }

    #[test]
    fn missing_region_is_no_content() {
        assert!(matches!(
            find_article("<html><body>nichts</body></html>"),
            Err(Error::NoContent)
        ));
    }

    #[test]
    fn article_to_text_suppresses_annotations() {
        let html = page(
            "<p>Erster Satz.<span class=\"info\">Fußnote 1</span></p>\
             <q class=\"quote\">Pull quote</q><p>Zweiter Satz.</p>",
        );
        assert_eq!(
            article_to_text(&html).unwrap(),
            "Erster Satz.\n\nZweiter Satz."
        );
    }

    #[test]
    fn survives_unbalanced_markup_inside_annotations() {
        let html = page("<span class=\"info\">kaputt</p></span><p>Text bleibt.</p>");
        assert_eq!(article_to_text(&html).unwrap(), "Text bleibt.");
    }

    #[test]
    fn fetch_article_goes_through_the_fetcher() {
        struct OnePage(String);
        impl Fetcher for OnePage {
            fn fetch(&mut self, _url: &Url) -> Result<String> {
                Ok(self.0.clone())
            }
        }
        let mut fetcher = OnePage(page("<p>Aus dem Netz.</p>"));
        let url = Url::parse("https://perspective-daily.de/article/42").unwrap();
        assert_eq!(
            fetch_article(&mut fetcher, &url).unwrap(),
            "Aus dem Netz."
        );
    }
}
