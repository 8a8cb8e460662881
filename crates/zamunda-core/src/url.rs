//! URL helper functions for zamunda.net
//!
//! Builds search URLs, resolves site-relative hrefs, classifies listing
//! links and pulls info hashes out of magnet URIs.

use regex::Regex;

use crate::types::LinkKind;

/// Builds the search path for a given query
///
/// Spaces become `+` (the form the site itself uses), every other
/// reserved character is percent-encoded, and the fixed sort and
/// dead-torrent parameters are appended.
///
/// # Example
/// ```
/// use zamunda_core::url::build_search_path;
/// let path = build_search_path("foo bar");
/// assert_eq!(
///     path,
///     "/bananas?search=foo+bar&gotonext=1&incldead=&field=name&sort=9&type=desc"
/// );
/// ```
pub fn build_search_path(query: &str) -> String {
    let encoded = urlencoding::encode(query).replace("%20", "+");
    format!("/bananas?search={encoded}&gotonext=1&incldead=&field=name&sort=9&type=desc")
}

/// Resolves a site-relative href against a base URL
///
/// Hrefs that are already absolute pass through unchanged.
///
/// # Example
/// ```
/// use zamunda_core::url::absolute_url;
/// let url = absolute_url("https://zamunda.net", "/download.php/42/x.torrent");
/// assert_eq!(url, "https://zamunda.net/download.php/42/x.torrent");
/// ```
pub fn absolute_url(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

/// Classifies a listing anchor href into one of the recognized patterns
///
/// Returns `None` for every other href; such anchors never produce a
/// search result.
///
/// # Example
/// ```
/// use zamunda_core::{url::classify_href, LinkKind};
/// assert_eq!(classify_href("/magnetlink.php?id=42"), Some(LinkKind::Magnet));
/// assert_eq!(classify_href("/download.php/42/x.torrent"), Some(LinkKind::TorrentFile));
/// assert_eq!(classify_href("/details.php?id=42"), None);
/// ```
pub fn classify_href(href: &str) -> Option<LinkKind> {
    if href.starts_with("/magnetlink") {
        Some(LinkKind::Magnet)
    } else if href.starts_with("/download.php") {
        Some(LinkKind::TorrentFile)
    } else {
        None
    }
}

/// Extracts the btih info hash from a magnet URI, lowercased
///
/// Accepts the 40-char hex form and the older 32-char base32 form.
///
/// # Example
/// ```
/// use zamunda_core::url::extract_info_hash;
/// let magnet = "magnet:?xt=urn:btih:0123456789ABCDEF0123456789ABCDEF01234567&dn=x";
/// assert_eq!(
///     extract_info_hash(magnet).as_deref(),
///     Some("0123456789abcdef0123456789abcdef01234567")
/// );
/// assert_eq!(extract_info_hash("https://zamunda.net/magnetlink.php?id=1"), None);
/// ```
pub fn extract_info_hash(magnet: &str) -> Option<String> {
    let re = Regex::new(r"(?i)xt=urn:btih:([0-9a-f]{40}|[a-z2-7]{32})").ok()?;
    re.captures(magnet)
        .map(|caps| caps[1].to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_build_search_path_simple() {
        let path = build_search_path("matrix");
        assert_eq!(
            path,
            "/bananas?search=matrix&gotonext=1&incldead=&field=name&sort=9&type=desc"
        );
    }

    #[test]
    fn test_build_search_path_joins_tokens_with_plus() {
        let path = build_search_path("the matrix reloaded");
        assert!(path.starts_with("/bananas?search=the+matrix+reloaded&"));
    }

    #[test]
    fn test_build_search_path_percent_encodes_reserved_chars() {
        let path = build_search_path("tom & jerry");
        assert!(path.starts_with("/bananas?search=tom+%26+jerry&"));
    }

    #[test]
    fn test_absolute_url_joins_relative_href() {
        let url = absolute_url("https://zamunda.net", "/magnetlink.php?id=7");
        assert_eq!(url, "https://zamunda.net/magnetlink.php?id=7");
    }

    #[test]
    fn test_absolute_url_handles_trailing_slash() {
        let url = absolute_url("http://127.0.0.1:8080/", "download.php/1/a.torrent");
        assert_eq!(url, "http://127.0.0.1:8080/download.php/1/a.torrent");
    }

    #[test]
    fn test_absolute_url_passes_through_full_urls() {
        let url = absolute_url("https://zamunda.net", "https://other.example/file");
        assert_eq!(url, "https://other.example/file");
    }

    #[test]
    fn test_classify_href_patterns() {
        assert_eq!(classify_href("/magnetlink.php?id=1"), Some(LinkKind::Magnet));
        assert_eq!(classify_href("/magnetlink2.php?id=1"), Some(LinkKind::Magnet));
        assert_eq!(
            classify_href("/download.php/1234/name.torrent"),
            Some(LinkKind::TorrentFile)
        );
        assert_eq!(classify_href("/details.php?id=1"), None);
        assert_eq!(classify_href("magnet:?xt=urn:btih:abc"), None);
        assert_eq!(classify_href(""), None);
    }

    #[test]
    fn test_extract_info_hash_hex() {
        let magnet = "magnet:?xt=urn:btih:ABCDEF0123456789ABCDEF0123456789ABCDEF01";
        assert_eq!(
            extract_info_hash(magnet).as_deref(),
            Some("abcdef0123456789abcdef0123456789abcdef01")
        );
    }

    #[test]
    fn test_extract_info_hash_base32() {
        let magnet = "magnet:?xt=urn:btih:MFRGGZDFMZTWQ2LKNNWG23TPOBYXE43U&dn=x";
        assert_eq!(
            extract_info_hash(magnet).as_deref(),
            Some("mfrggzdfmztwq2lknnwg23tpobyxe43u")
        );
    }

    #[test]
    fn test_extract_info_hash_rejects_short_hashes() {
        assert_eq!(extract_info_hash("magnet:?xt=urn:btih:abc123"), None);
    }

    proptest! {
        #[test]
        fn search_path_never_contains_a_space(query in ".*") {
            let path = build_search_path(&query);
            prop_assert!(!path.contains(' '));
        }

        #[test]
        fn search_path_joins_alnum_tokens_with_plus(
            a in "[a-z0-9]{1,8}",
            b in "[a-z0-9]{1,8}",
        ) {
            let path = build_search_path(&format!("{a} {b}"));
            let needle = format!("search={a}+{b}&");
            prop_assert!(path.contains(&needle));
        }
    }
}
