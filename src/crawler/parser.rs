//! HTML parser for extracting links, titles and readable text
//!
//! This module handles parsing HTML content to extract:
//! - Links to follow (from `<a href>` tags)
//! - Page title
//! - The visible text that is searched for keywords and written to disk

use crate::ParseError;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Elements whose text never reaches the reader
const INVISIBLE_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Elements rendered inside the surrounding line; their text joins its neighbours
const INLINE_ELEMENTS: [&str; 24] = [
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "font", "i", "kbd",
    "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u",
];

/// A fetched page, alive only while a worker examines it
#[derive(Debug, Clone)]
pub struct Page {
    /// The URL the page was fetched from
    pub url: String,

    /// Raw HTML body
    pub html: String,

    /// Text of the first `<title>` element, whitespace collapsed to single spaces
    pub title: String,

    /// Visible text, one block element per line
    pub text: String,
}

/// Parses a fetched body into a [`Page`]
///
/// # Errors
///
/// Returns `ParseError::MissingTitle` when the document has no non-empty `<title>`.
///
/// # Example
///
/// ```
/// use keyword_crawler::crawler::parse_page;
///
/// let html = r#"<html><head><title>Test</title></head><body><p>Hello</p></body></html>"#;
/// let page = parse_page("https://example.com/", html.to_string()).unwrap();
/// assert_eq!(page.title, "Test");
/// assert!(page.text.contains("Hello"));
/// ```
pub fn parse_page(url: &str, html: String) -> Result<Page, ParseError> {
    let (title, text) = {
        let document = Html::parse_document(&html);
        (extract_title(&document), visible_text(&document))
    };

    let title = title.ok_or_else(|| ParseError::MissingTitle {
        url: url.to_string(),
    })?;

    Ok(Page {
        url: url.to_string(),
        html,
        title,
        text,
    })
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

/// Collects the text outside script-like elements
///
/// Text inside inline elements runs on with its neighbours, so
/// `mal<b>ware</b>` reads as one word. Every other element starts a new line.
fn visible_text(document: &Html) -> String {
    let mut lines = vec![String::new()];
    collect_text(document.root_element(), &mut lines);

    let mut text = String::new();
    for line in lines {
        let line = collapse_whitespace(&line);
        if !line.is_empty() {
            text.push_str(&line);
            text.push('\n');
        }
    }

    text
}

fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        if let Some(fragment) = child.value().as_text() {
            if let Some(line) = lines.last_mut() {
                line.push_str(fragment);
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if INVISIBLE_ELEMENTS.contains(&name) {
                continue;
            }

            let inline = INLINE_ELEMENTS.contains(&name);
            if !inline {
                lines.push(String::new());
            }
            collect_text(child, lines);
            if !inline {
                lines.push(String::new());
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts every hyperlink target in the document
///
/// Each `href` is resolved against `base_url`, so relative, protocol-relative
/// and fragment-only links all come back absolute. Hrefs that are empty, fail
/// to resolve, or resolve to a non-HTTP(S) scheme are dropped.
///
/// # Example
///
/// ```
/// use keyword_crawler::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/page">Link</a><a href="mailto:x@example.com">Mail</a>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links.into_iter().collect::<Vec<_>>(), vec!["https://example.com/page"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut links = BTreeSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if let Some(absolute_url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        {
            links.insert(absolute_url);
        }
    }

    links
}

/// Resolves a link href to an absolute HTTP(S) URL
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;

    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
