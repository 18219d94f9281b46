//! Static HTML metadata extraction.
//!
//! Priority order:
//! - title: `og:title` → `<title>` → URL hostname
//! - description: `og:description` → `meta[name=description]`
//!
//! Each candidate is trimmed and skipped when empty. No scripts are run.

use scraper::{Html, Selector};
use url::Url;

use crate::types::metadata::PageMetadata;

/// Extract title and description from an HTML document.
///
/// `url` is only used for the hostname fallback.
pub fn extract_metadata(html: &str, url: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    let title = meta_content(&document, r#"meta[property="og:title"]"#)
        .or_else(|| title_text(&document))
        .or_else(|| hostname(url));

    let description = meta_content(&document, r#"meta[property="og:description"]"#)
        .or_else(|| meta_content(&document, r#"meta[name="description"]"#));

    PageMetadata::new(title, description)
}

/// Trimmed `content` of the first element matching `selector`.
fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

/// Trimmed text of the first `<title>` element.
fn title_text(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn hostname(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .filter(|h| !h.is_empty())
}
