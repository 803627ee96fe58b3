//! Page summary extraction from markup
//!
//! The same rule applies to served and browser-rendered markup.

use std::sync::LazyLock;

use rivalwatch_core::{truncate_chars, ExtractedPage};
use scraper::{ElementRef, Html, Selector};

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static CONTENT_REGION: LazyLock<Selector> = LazyLock::new(|| selector("main, article"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Extract title, first `<h1>` and first substantial paragraph
pub fn extract_page(html: &str, source_url: &str) -> ExtractedPage {
    let doc = Html::parse_document(html);

    ExtractedPage {
        title: first_text(&doc, &TITLE),
        heading: first_text(&doc, &HEADING),
        excerpt: first_paragraph(&doc),
        source_url: source_url.to_string(),
    }
}

fn first_text(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// First `<p>` longer than the minimum, inside the first `<main>`/`<article>`
/// or the body when neither exists
fn first_paragraph(doc: &Html) -> Option<String> {
    let region = doc
        .select(&CONTENT_REGION)
        .next()
        .or_else(|| doc.select(&BODY).next())?;

    region
        .select(&PARAGRAPH)
        .map(element_text)
        .find(|text| text.chars().count() > ExtractedPage::EXCERPT_MIN_CHARS)
        .map(|text| truncate_chars(&text, ExtractedPage::EXCERPT_MAX_CHARS))
}

/// Element text with whitespace runs collapsed
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
