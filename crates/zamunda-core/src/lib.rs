//! Zamunda Scraper Core Library
//!
//! Async API for searching the zamunda.net torrent tracker and
//! resolving listings into magnet links or decoded torrent metadata.
//!
//! # Overview
//!
//! This crate provides a complete scraping client for zamunda.net:
//! - Cookie-bearing HTTP client with a browser header profile and
//!   exponential-backoff retries for connection failures
//! - HTML parsers for the search results table and magnet pages
//! - Torrent file decoder (info hash, magnet URI, file listing)
//! - High-level API: log in, search, batch search, link resolution
//!
//! # Example
//!
//! ```no_run
//! use zamunda_core::{Result, SearchOptions, ZamundaScraper};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = ZamundaScraper::new()?;
//!
//!     let results = scraper
//!         .search("the matrix", "username", "password", &SearchOptions::default())
//!         .await?;
//!
//!     for torrent in &results {
//!         println!(
//!             "{} [{} seeders, {}]: {}",
//!             torrent.name, torrent.seeders, torrent.size, torrent.magnet_link
//!         );
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Sessions
//!
//! One [`ZamundaScraper`] owns one cookie session. [`ZamundaScraper::search`]
//! and [`ZamundaScraper::search_multi`] log in first and abort if
//! authentication fails; every request within an operation runs strictly
//! sequentially.

mod client;
mod error;
mod headers;
pub mod parser;
mod scraper;
mod torrent;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, ZamundaClient};

// Re-export error types
pub use error::{Result, ZamundaError};

// Re-export parser functions
pub use parser::{find_magnet_link, parse_search_results};

// Re-export the torrent decoder
pub use torrent::decode_torrent;

// Re-export main scraper API
pub use scraper::ZamundaScraper;

// Re-export data types
pub use types::{
    LinkKind, Listing, ListingLink, SearchOptions, SearchResult, TorrentFile, TorrentMetadata,
};
