//! Search results parser for zamunda.net
//!
//! Reads the results table out of a search page. The markup contract,
//! as served by the site: a `table#zbtable` whose first row is a
//! header; every other row holds the display name and the action links
//! in the second cell, the size in the fourth cell from the end and the
//! seeder count in the second cell from the end. Rows that do not match
//! this shape are skipped, never fatal.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{Result, ZamundaError};
use crate::types::{Listing, ListingLink};
use crate::url::classify_href;

/// Cells a row needs for the fixed offsets to make sense: the details
/// cell is index 1 and must sit before the size cell at `len - 4`.
const MIN_ROW_CELLS: usize = 6;

/// Image filename marking a release with a Bulgarian audio track
const BG_AUDIO_SUFFIX: &str = "bgaudio.png";

/// Parses a search results page into listings
///
/// # Arguments
/// * `html` - Raw HTML string of the results page
///
/// # Returns
/// One `Listing` per well-formed results row, in document order. Rows
/// with no recognized link still appear, with an empty link list.
///
/// # Errors
/// Returns `Parse` if the results table itself is missing; callers
/// treat that as an empty result set.
pub fn parse_search_results(html: &str) -> Result<Vec<Listing>> {
    let document = Html::parse_document(html);

    let table_selector = Selector::parse("table#zbtable")
        .map_err(|e| ZamundaError::Parse(format!("Invalid selector: {e:?}")))?;
    let row_selector = Selector::parse("tr")
        .map_err(|e| ZamundaError::Parse(format!("Invalid selector: {e:?}")))?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ZamundaError::Parse("results table not found".to_string()))?;

    let mut listings = Vec::new();

    // First row is the column header
    for row in table.select(&row_selector).skip(1) {
        match parse_row(&row) {
            Some(listing) => listings.push(listing),
            None => debug!("Skipping results row with unexpected structure"),
        }
    }

    Ok(listings)
}

/// Parses a single results row
///
/// Returns `None` when the row does not match the cell contract; the
/// caller skips it.
fn parse_row(row: &ElementRef) -> Option<Listing> {
    let cells: Vec<ElementRef> = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "td")
        .collect();

    if cells.len() < MIN_ROW_CELLS {
        return None;
    }

    let details = cells[1];

    // Display name lives in the bold text of the title anchor
    let name_selector = Selector::parse("a b").ok()?;
    let name = details
        .select(&name_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())?;
    if name.is_empty() {
        return None;
    }

    let links = collect_links(&details);
    let seeders = parse_seeders(&cells[cells.len() - 2]);
    let size = normalize_whitespace(&cell_text(&cells[cells.len() - 4]));
    let has_background_audio = detect_bg_audio(&details);

    Some(Listing {
        name,
        seeders,
        size,
        has_background_audio,
        links,
    })
}

/// Recognized anchors inside the details cell, in document order
///
/// The action links sit inside the first `div` of the cell; anchors
/// whose href matches neither pattern are dropped here, which is what
/// keeps unrecognized rows from ever emitting a result.
fn collect_links(details: &ElementRef) -> Vec<ListingLink> {
    let Ok(div_selector) = Selector::parse("div") else {
        return Vec::new();
    };
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let Some(div) = details.select(&div_selector).next() else {
        return Vec::new();
    };

    div.select(&anchor_selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            classify_href(href).map(|kind| ListingLink {
                kind,
                href: href.to_string(),
            })
        })
        .collect()
}

/// Seeder count from the cell text; anything non-numeric counts as 0
fn parse_seeders(cell: &ElementRef) -> u32 {
    let digits: String = cell_text(cell)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// True when any image in the details cell is the audio-flag icon
fn detect_bg_audio(details: &ElementRef) -> bool {
    let Ok(img_selector) = Selector::parse("img") else {
        return false;
    };
    details.select(&img_selector).any(|img| {
        img.value()
            .attr("src")
            .is_some_and(|src| src.ends_with(BG_AUDIO_SUFFIX))
    })
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
