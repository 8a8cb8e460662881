//! Torrent file decoder for zamunda.net downloads
//!
//! Decodes the bencoded body of a `/download.php...` response into the
//! magnet link, info hash and file listing. Both single-file and
//! multi-file torrents are supported; file paths are joined under the
//! torrent's root name.

use librqbit_core::torrent_metainfo::{TorrentMetaV1Owned, torrent_from_bytes};

use crate::error::{Result, ZamundaError};
use crate::types::{TorrentFile, TorrentMetadata};

/// Decodes a fetched torrent file into resolved metadata
///
/// # Arguments
/// * `bytes` - Raw bytes of the `.torrent` response body
///
/// # Returns
/// `TorrentMetadata::Resolved` with the magnet URI, lowercase hex info
/// hash and the decoded file listing.
///
/// # Errors
/// Returns `TorrentDecode` when the body is not valid bencode; the
/// caller absorbs that into `TorrentMetadata::Unavailable`.
pub fn decode_torrent(bytes: &[u8]) -> Result<TorrentMetadata> {
    let torrent: TorrentMetaV1Owned =
        torrent_from_bytes(bytes).map_err(|e| ZamundaError::TorrentDecode(e.to_string()))?;

    let info_hash = torrent.info_hash.as_string();
    let magnet_link = format!("magnet:?xt=urn:btih:{info_hash}");
    let files = collect_files(&torrent)?;

    Ok(TorrentMetadata::Resolved {
        magnet_link,
        info_hash,
        files,
    })
}

/// File listing out of the torrent's info dictionary
///
/// Multi-file torrents get `root_name/component/...` paths; a
/// single-file torrent is just its root name.
fn collect_files(torrent: &TorrentMetaV1Owned) -> Result<Vec<TorrentFile>> {
    let info = &torrent.info;

    let root_name = info
        .name
        .as_ref()
        .map(|b| bytes_to_string(b.as_ref()))
        .unwrap_or_else(|| "unknown".to_string());

    if let Some(ref files) = info.files {
        let mut result = Vec::with_capacity(files.len());

        for file in files {
            let mut path_parts = vec![root_name.clone()];
            for part in &file.path {
                path_parts.push(bytes_to_string(part.as_ref()));
            }

            result.push(TorrentFile {
                path: path_parts.join("/"),
                size_bytes: file.length,
            });
        }

        if result.is_empty() {
            return Err(ZamundaError::TorrentDecode(
                "torrent has an empty file list".to_string(),
            ));
        }

        Ok(result)
    } else if let Some(length) = info.length {
        Ok(vec![TorrentFile {
            path: root_name,
            size_bytes: length,
        }])
    } else {
        Err(ZamundaError::TorrentDecode(
            "torrent has neither files nor length".to_string(),
        ))
    }
}

/// UTF-8 when possible, lossy otherwise (some trackers serve cp1251 names)
fn bytes_to_string(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}
