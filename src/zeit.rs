//! "Die Zeit" EPUB article extraction.
//!
//! Each article in the EPUB is one XHTML file. The markup here is
//! machine-generated and well-formed, so extraction works on DOM selections
//! rather than the streaming filter. EPUB/ZIP unpacking stays outside the
//! crate: callers hand in the already-unpacked `(file name, xhtml)` entries.

use std::sync::LazyLock;

use dom_query::{Document, Selection};
use regex::Regex;
use tendril::StrTendril;

/// Title used when an article has neither title, supertitle nor subheadline.
pub const DEFAULT_TITLE: &str = "Ohne Titel";

/// Ressort name inside the `[Übersicht …]` navigation link.
#[allow(clippy::expect_used)]
static RESSORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Übersicht (.+)\]").expect("RESSORT_RE regex"));

/// Capitalized runs hiding an author name in the subtitle.
#[allow(clippy::expect_used)]
static CAPITALS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{2,}").expect("CAPITALS_RE regex"));

/// Article resource names within the unpacked EPUB.
#[allow(clippy::expect_used)]
static ARTICLE_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"article_(\d+)\.xhtml").expect("ARTICLE_FILE_RE regex"));

/// German number-to-words collaborator. The spelling rules themselves live
/// outside this crate.
pub trait NumberSpeller {
    /// Return `text` with numbers replaced by their spelled-out form.
    fn spell(&self, text: &str) -> String;
}

/// Content of a single article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Running number taken from the resource file name.
    pub id: u32,
    pub title: String,
    /// Trimmed and forced to end in a sentence mark; empty if absent.
    pub subtitle: String,
    /// Name-cased; empty if no author could be found.
    pub author: String,
    /// Section label, when the navigation carries one.
    pub ressort: Option<String>,
    /// Body paragraphs, empty ones dropped.
    pub paragraphs: Vec<String>,
    /// True if the article links to a spoken version on zeit.de.
    pub has_audio: bool,
}

impl Article {
    /// Render the article as plain text: header sections and paragraphs
    /// separated by blank lines.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut sections: Vec<&str> = Vec::new();
        if let Some(ressort) = &self.ressort {
            sections.push(ressort);
        }
        sections.push(&self.title);
        if !self.subtitle.is_empty() {
            sections.push(&self.subtitle);
        }
        if !self.author.is_empty() {
            sections.push(&self.author);
        }
        sections.extend(self.paragraphs.iter().map(String::as_str));
        sections.join("\n\n")
    }

    /// Substitute numbers in the body with their spelled-out form.
    pub fn spell_numbers(&mut self, speller: &dyn NumberSpeller) {
        for paragraph in &mut self.paragraphs {
            *paragraph = speller.spell(paragraph);
        }
    }
}

/// Article number from an EPUB resource name, `None` for non-article
/// resources (cover, navigation, stylesheets).
#[must_use]
pub fn article_id(file_name: &str) -> Option<u32> {
    ARTICLE_FILE_RE
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extract one article from its XHTML markup.
///
/// Never fails: every field has a fallback (default title, empty
/// subtitle/author, no ressort), matching the hand-authored variance of the
/// EPUBs. Fallback use is logged.
#[must_use]
pub fn extract_article(xhtml: &str, id: u32) -> Article {
    let doc = Document::from(xhtml);
    let title = find_title(&doc, id);
    let subtitle = find_subtitle(&doc, id);
    let author = find_author(&doc, &subtitle);
    let ressort = find_ressort(&doc);
    let has_audio = has_audio_link(&doc);
    // Last: prunes blockquotes from the document.
    let paragraphs = find_paragraphs(&doc);
    Article {
        id,
        title,
        subtitle,
        author,
        ressort,
        paragraphs,
        has_audio,
    }
}

/// Extract all articles from unpacked EPUB entries, skipping resources that
/// are not articles.
pub fn extract_articles<'a, I>(files: I) -> Vec<Article>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut articles = Vec::new();
    for (name, xhtml) in files {
        let Some(id) = article_id(name) else {
            log::debug!("skipping non-article resource {name}");
            continue;
        };
        articles.push(extract_article(xhtml, id));
    }
    articles
}

/// First non-empty selection text among the given selectors.
fn first_text(doc: &Document, selectors: &[&str]) -> Option<String> {
    for selector in selectors {
        if let Some(sel) = first(doc, selector) {
            // Reference-counted text handle; owned storage only when kept.
            let text: StrTendril = sel.text();
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

fn first<'a>(doc: &'a Document, selector: &str) -> Option<Selection<'a>> {
    let sel = doc.select(selector);
    sel.nodes().first().map(|node| Selection::from(*node))
}

fn find_title(doc: &Document, id: u32) -> String {
    first_text(
        doc,
        &[
            "div.article_titles h1.title",
            "div.article_titles h3.supertitle",
            "div.article_text div.subheadline-1",
            "head title",
        ],
    )
    .unwrap_or_else(|| {
        log::info!("article {id} has neither title, supertitle nor subheadline, using \"{DEFAULT_TITLE}\"");
        DEFAULT_TITLE.to_string()
    })
}

fn find_subtitle(doc: &Document, id: u32) -> String {
    let Some(mut subtitle) = first_text(doc, &["div.article_titles h3.subtitle"]) else {
        log::debug!("article {id} does not have a subtitle");
        return String::new();
    };
    if !subtitle.ends_with(['.', '?', '!']) {
        subtitle.push('.');
    }
    subtitle
}

fn find_author(doc: &Document, subtitle: &str) -> String {
    let author_text = first_text(
        doc,
        &[
            "div.article_titles span.author",
            "div.article_text div.group div.additional-content div.x-zeit-box p.paragraph.style-3",
        ],
    )
    .unwrap_or_else(|| {
        // Sometimes the author hides in the subtitle, in capitals.
        CAPITALS_RE
            .find_iter(subtitle)
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    });
    capitalize_name(&author_text.to_lowercase())
}

/// Name-case each word, keeping the particle `von` lowercase.
fn capitalize_name(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            if word == "von" {
                word.to_string()
            } else {
                capitalize_word(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(head) => head.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn find_ressort(doc: &Document) -> Option<String> {
    let mut ressort = None;
    for node in doc.select("div.article_navigation span.link").nodes() {
        let text = Selection::from(*node).text().to_string();
        if let Some(caps) = RESSORT_RE.captures(&text) {
            if let Some(m) = caps.get(1) {
                ressort = Some(m.as_str().to_string());
            }
        }
    }
    ressort
}

fn find_paragraphs(doc: &Document) -> Vec<String> {
    // Blockquotes repeat text that comes again later in the article.
    doc.select("div.article_text blockquote").remove();
    let mut paragraphs = Vec::new();
    for node in doc.select("div.article_text p").nodes() {
        let text = Selection::from(*node).text().trim().to_string();
        if !text.is_empty() {
            paragraphs.push(text);
        }
    }
    paragraphs
}

/// An article has audio iff it links a spoken version hosted on zeit.de.
fn has_audio_link(doc: &Document) -> bool {
    for node in doc.select("div.article_text a.x-zeit-link-box").nodes() {
        let link = Selection::from(*node);
        let Some(target) = link.attr("href") else {
            continue;
        };
        let description = link.select("span").text().to_string();
        if description.contains("audio") && target.contains("zeit.de/misc_static_files") {
            return true;
        }
    }
    false
}
