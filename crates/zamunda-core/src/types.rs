//! Core data types for the zamunda.net scraper
//!
//! The JSON field names (`magnetlink`, `bg_audio`) follow the payload
//! shape the service has always produced, so existing consumers keep
//! working.

use serde::{Deserialize, Serialize};

/// One torrent listing extracted from a search results page
///
/// A results row can carry several recognized links; each one becomes
/// its own `SearchResult` sharing the row's name, seeders, size and
/// audio flag. The enrichment fields are only present when the link
/// was resolved through a torrent file or a magnet page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Display name of the torrent
    pub name: String,

    /// Magnet URI when resolution succeeded, otherwise the absolute
    /// site URL of the matched anchor
    #[serde(rename = "magnetlink")]
    pub magnet_link: String,

    /// Seeder count reported by the listing (0 when unparsable)
    pub seeders: u32,

    /// Whether the release carries a Bulgarian audio track
    #[serde(rename = "bg_audio")]
    pub has_background_audio: bool,

    /// Human-readable size as shown in the listing (e.g. "1.37 GB")
    pub size: String,

    /// btih info hash, lowercase hex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,

    /// File listing decoded from the torrent file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<TorrentFile>>,
}

/// One file inside a torrent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentFile {
    /// Path inside the torrent, root name included
    pub path: String,

    /// File size in bytes
    pub size_bytes: u64,
}

/// Outcome of fetching and decoding one torrent file
///
/// `Unavailable` stands in for every failure on that path — the search
/// loop then falls back to the plain download URL instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TorrentMetadata {
    /// The torrent file was fetched and decoded
    Resolved {
        magnet_link: String,
        info_hash: String,
        files: Vec<TorrentFile>,
    },
    /// Fetch or decode failed; no metadata to offer
    Unavailable,
}

impl TorrentMetadata {
    pub fn is_resolved(&self) -> bool {
        matches!(self, TorrentMetadata::Resolved { .. })
    }

    /// Magnet URI, when resolved
    pub fn magnet_link(&self) -> Option<&str> {
        match self {
            TorrentMetadata::Resolved { magnet_link, .. } => Some(magnet_link),
            TorrentMetadata::Unavailable => None,
        }
    }

    /// Lowercase hex info hash, when resolved
    pub fn info_hash(&self) -> Option<&str> {
        match self {
            TorrentMetadata::Resolved { info_hash, .. } => Some(info_hash),
            TorrentMetadata::Unavailable => None,
        }
    }

    /// Decoded file listing, when resolved
    pub fn files(&self) -> Option<&[TorrentFile]> {
        match self {
            TorrentMetadata::Resolved { files, .. } => Some(files),
            TorrentMetadata::Unavailable => None,
        }
    }
}

/// Which recognized pattern a listing anchor matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `/magnetlink...` — a page that renders the magnet URI
    Magnet,
    /// `/download.php...` — the torrent file itself
    TorrentFile,
}

/// One recognized anchor inside a results row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLink {
    pub kind: LinkKind,
    /// Site-relative href exactly as found in the markup
    pub href: String,
}

/// One parsed results row, before link resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub name: String,
    pub seeders: u32,
    pub size: String,
    pub has_background_audio: bool,
    /// Recognized anchors in document order; may be empty, in which
    /// case the row emits no results
    pub links: Vec<ListingLink>,
}

/// Knobs for one search call
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Resolve `/magnetlink...` anchors into magnet URIs. Costs one
    /// extra request per anchor; when false the absolute page URL is
    /// returned instead.
    pub resolve_magnets: bool,
}
