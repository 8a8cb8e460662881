//! Magnet page parser for zamunda.net
//!
//! A `/magnetlink...` page renders the magnet URI as a plain anchor;
//! this parser finds the first one.

use scraper::{Html, Selector};

/// Finds the first magnet URI anchor in a page
///
/// # Arguments
/// * `html` - Raw HTML string of the magnet page
///
/// # Returns
/// The href of the first `magnet:?...` anchor, or `None` when the page
/// carries no such link.
pub fn find_magnet_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"a[href^="magnet:"]"#).ok()?;

    document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .find(|href| href.starts_with("magnet:?"))
        .map(str::to_string)
}
