//! HTML parsers for zamunda.net
//!
//! Contains modules for parsing the two page types the scraper reads:
//! search results tables and magnet pages.

pub mod magnet;
pub mod search;

pub use magnet::find_magnet_link;
pub use search::parse_search_results;
