use std::collections::HashMap;

use url::Url;

use klartext::sources::Fetcher;
use klartext::{mpf, perspective_daily, zeit, Error, Result};

const PD_PAGE: &str = r#"<html><body>
<div class="nav">menu</div>
<div class="content" ng-show="tab=='article'"><h1>Artikel</h1>
<p>Die Lage ist besser<span class="info">Quelle: Amt</span> als gedacht.</p>
<q class="quote">Die Lage ist besser</q>
<p>Und hier steht mehr.</p>
<figure><img src="bild.jpg">Bildunterschrift</figure>
<div class="infos" ng-show="tab=='article'">geschrieben von jemandem</div>
</body></html>"#;

#[test]
fn perspective_daily_article_end_to_end() {
    let text = perspective_daily::article_to_text(PD_PAGE).unwrap();
    assert_eq!(
        text,
        "Artikel\n\nDie Lage ist besser als gedacht.\n\nUnd hier steht mehr."
    );
}

#[test]
fn perspective_daily_page_without_article_is_no_content() {
    let result = perspective_daily::article_to_text("<html><body>leer</body></html>");
    assert!(matches!(result, Err(Error::NoContent)));
}

#[test]
fn zeit_article_roundtrip_to_plain_text() {
    let xhtml = r#"<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>Im Zweifel</title></head>
<body>
<div class="article_navigation"><span class="link">[Übersicht Wissen]</span></div>
<div class="article_titles">
<h1 class="title">Im Zweifel</h1>
<h3 class="subtitle">Was die Forschung sagt</h3>
<span class="author">Erika Muster</span>
</div>
<div class="article_text">
<p class="paragraph">Absatz eins.</p>
<blockquote><p class="paragraph">Absatz eins.</p></blockquote>
<p class="paragraph">Absatz zwei.</p>
</div>
</body></html>"#;
    let articles = zeit::extract_articles(vec![
        ("mimetype", "application/epub+zip"),
        ("article_12.xhtml", xhtml),
    ]);
    assert_eq!(articles.len(), 1);
    let article = &articles[0];
    assert_eq!(article.id, 12);
    assert_eq!(article.ressort.as_deref(), Some("Wissen"));
    assert_eq!(
        article.plain_text(),
        "Wissen\n\nIm Zweifel\n\nWas die Forschung sagt.\n\nErika Muster\n\n\
         Absatz eins.\n\nAbsatz zwei."
    );
}

struct PageServer {
    pages: HashMap<String, String>,
    requests: usize,
}

impl Fetcher for PageServer {
    fn fetch(&mut self, url: &Url) -> Result<String> {
        self.requests += 1;
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Error::Unavailable(format!("HTTP 500 at {url}")))
    }
}

#[test]
fn mpf_magazine_end_to_end() {
    let base = Url::parse("https://mag.example/de/profiles/abc/editions").unwrap();
    let link = |href: &str| {
        format!(
            "<a class=\"fancybox\" data-fancybox-type=\"iframe\" \
             data-fancybox-autosize=\"true\" onclick=\"open()\" href=\"{href}\"></a>"
        )
    };
    let article = "<html><body><h1>Neues vom Institut</h1>\
        <p>Ein ausführlicher Text über aktuelle Forschung am Institut.</p></body></html>";

    let mut pages = HashMap::new();
    pages.insert(
        "https://mag.example/de/profiles/abc/editions/pages/page/1".to_string(),
        format!("header\n{}\nfooter\n", link("/de/texts/9")),
    );
    // Page 2 repeats the same text; page 3 does not exist.
    pages.insert(
        "https://mag.example/de/profiles/abc/editions/pages/page/2".to_string(),
        format!("{}\n", link("/de/texts/9")),
    );
    pages.insert(
        "https://mag.example/de/texts/9".to_string(),
        article.to_string(),
    );
    let mut fetcher = PageServer { pages, requests: 0 };

    let magazine = mpf::Magazine::fetch(&mut fetcher, &base).unwrap();
    assert_eq!(magazine.texts().len(), 1);
    let text = &magazine.texts()[0];
    assert_eq!(text.headline(), Some("Neues vom Institut"));
    assert_eq!(
        text.plain_text(),
        "Neues vom Institut\n\nEin ausführlicher Text über aktuelle Forschung am Institut."
    );
    // Pages 1 and 2, the failed page 3 probe, and one fetch per link.
    assert_eq!(fetcher.requests, 5);
}
