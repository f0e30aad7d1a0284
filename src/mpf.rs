//! MaxPlanckForschung magazine pipeline.
//!
//! The magazine platform serves one listing page per print page, each
//! linking the text-content snippets shown on it. The same text often
//! appears on several pages, so texts are de-duplicated by their normalized
//! content. Listing markup is not well-formed enough for a DOM parse, so
//! the links are picked out line by line with a fixed marker pattern,
//! exactly as the platform renders them.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};
use crate::filter::{FilterRules, TagFilter, TagMatcher};
use crate::sources::Fetcher;

/// Link to one text content page in the listing markup.
#[allow(clippy::expect_used)]
static TEXT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<a class="fancybox" data-fancybox-type="iframe" data-fancybox-autosize="true" onclick=".*" href="(.*)"></a>"#,
    )
    .expect("TEXT_LINK_RE regex")
});

/// Everything nested in the body of a text page.
#[allow(clippy::expect_used)]
static TEXT_CONTENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<body>(.*)</body>").expect("TEXT_CONTENT_RE regex"));

/// First headline (h1 or h2) within the content.
#[allow(clippy::expect_used)]
static HEADLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<h[12]>(.*?)</h[12]>").expect("HEADLINE_RE regex"));

/// Markup tags, stripped for the de-duplication key.
#[allow(clippy::expect_used)]
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("TAG_RE regex"));

#[allow(clippy::expect_used)]
static RULES: LazyLock<FilterRules> = LazyLock::new(|| build_rules().expect("built-in MPF rules"));

/// MPF text pages are snippets without annotations; only embedded code is
/// suppressed. Headlines, paragraphs and line breaks all end a block.
fn build_rules() -> Result<FilterRules> {
    FilterRules::new(
        vec![TagMatcher::new("script", &[])?, TagMatcher::new("style", &[])?],
        &["hr", "input", "meta", "link", "wbr"],
        &["img"],
        &["p", "br", "h1", "h2"],
    )
}

/// Filter rules for MPF text-page markup.
#[must_use]
pub fn filter_rules() -> &'static FilterRules {
    &RULES
}

/// Pagination safety bound; issues stay well below this.
pub const MAX_PAGES: u32 = 500;

/// One text in an MPF magazine.
#[derive(Debug, Clone)]
pub struct Text {
    headline: Option<String>,
    content: String,
}

impl Text {
    /// Parse a text page. Fails with [`Error::NoContent`] when the page has
    /// no body to extract.
    pub fn from_html(html: &str) -> Result<Self> {
        let content = TEXT_CONTENT_RE
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(Error::NoContent)?;
        let headline = HEADLINE_RE
            .captures(&content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        Ok(Self { headline, content })
    }

    /// The text's headline, if it has one.
    #[must_use]
    pub fn headline(&self) -> Option<&str> {
        self.headline.as_deref()
    }

    /// A text is a proper article (rather than a caption or credit) when it
    /// has a real headline and body text beyond it.
    #[must_use]
    pub fn is_article(&self) -> bool {
        let Some(headline) = &self.headline else {
            return false;
        };
        let headline_len = headline.chars().count();
        let content_len = self.content.chars().count();
        headline_len > 2 && content_len.saturating_sub(headline_len) > 30
    }

    /// Render the text as plain text through the tag filter.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut filter = TagFilter::new(filter_rules());
        filter.feed(&self.content);
        filter.into_text()
    }

    /// Tag- and whitespace-free key identifying repeated texts across pages.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        let stripped = TAG_RE.replace_all(&self.content, "");
        stripped.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

/// All texts of one MPF magazine issue.
#[derive(Debug)]
pub struct Magazine {
    texts: Vec<Text>,
}

impl Magazine {
    /// Walk the listing pages of the issue at `base` and collect every
    /// proper article exactly once. Pagination stops at the first page the
    /// fetcher reports as unavailable.
    pub fn fetch(fetcher: &mut dyn Fetcher, base: &Url) -> Result<Self> {
        let mut texts = Vec::new();
        let mut seen = HashSet::new();
        log::info!("collecting texts of the magazine at {base}");
        for page_number in 1..=MAX_PAGES {
            let page_url = page_address(base, page_number)?;
            let listing = match fetcher.fetch(&page_url) {
                Ok(listing) => listing,
                Err(Error::Unavailable(reason)) => {
                    log::debug!("page {page_number} is past the last page: {reason}");
                    break;
                }
                Err(err) => return Err(err),
            };
            collect_page(fetcher, base, &listing, &mut texts, &mut seen)?;
            log::info!("page {page_number:3} done, currently {:3} text(s)", texts.len());
        }
        log::info!("found {} text(s) in the magazine", texts.len());
        Ok(Self { texts })
    }

    /// The collected texts, in discovery order.
    #[must_use]
    pub fn texts(&self) -> &[Text] {
        &self.texts
    }
}

fn collect_page(
    fetcher: &mut dyn Fetcher,
    base: &Url,
    listing: &str,
    texts: &mut Vec<Text>,
    seen: &mut HashSet<String>,
) -> Result<()> {
    for line in listing.lines() {
        let Some(caps) = TEXT_LINK_RE.captures(line.trim()) else {
            continue;
        };
        let Some(href) = caps.get(1) else {
            continue;
        };
        let text_url = base.join(href.as_str())?;
        let html = fetcher.fetch(&text_url)?;
        let text = match Text::from_html(&html) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("skipping text at {text_url}: {err}");
                continue;
            }
        };
        if !text.is_article() {
            log::debug!("skipping non-article text at {text_url}");
            continue;
        }
        if seen.insert(text.dedup_key()) {
            log::debug!("found new text {:?}", text.headline());
            texts.push(text);
        }
    }
    Ok(())
}

fn page_address(base: &Url, page_number: u32) -> Result<Url> {
    let base = base.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/pages/page/{page_number}"))?)
}
