//! Main scraper API for zamunda.net
//!
//! Combines the cookie-bearing HTTP client with the HTML parsers and
//! the torrent decoder to provide the high-level operations: log in,
//! search, batch search and per-listing link resolution.

use tracing::{debug, warn};

use crate::client::{ClientConfig, ZamundaClient};
use crate::error::{Result, ZamundaError};
use crate::headers;
use crate::parser::{find_magnet_link, parse_search_results};
use crate::torrent::decode_torrent;
use crate::types::{LinkKind, Listing, SearchOptions, SearchResult, TorrentMetadata};
use crate::url::{absolute_url, build_search_path, extract_info_hash};

/// Main scraper API for zamunda.net
///
/// One instance owns one logged-in session. All requests within an
/// operation go out strictly sequentially; the only suspension points
/// are the requests themselves and the retry backoff sleeps.
pub struct ZamundaScraper {
    client: ZamundaClient,
}

impl ZamundaScraper {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        let client = ZamundaClient::new()?;
        Ok(Self { client })
    }

    /// Create a new scraper with custom client configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = ZamundaClient::with_config(config)?;
        Ok(Self { client })
    }

    /// Log in to the site, storing session cookies on success
    ///
    /// One attempt is a GET of the login page (which primes the session
    /// cookies) followed by the form POST. Connection-level failures
    /// retry with exponential backoff; a timeout or any other request
    /// error fails immediately.
    ///
    /// # Arguments
    /// * `username` - Account name, must be non-empty
    /// * `password` - Account password, must be non-empty
    ///
    /// # Errors
    /// - `InvalidCredentials` if either field is empty (checked before
    ///   any network call)
    /// - `UnexpectedStatus` if the site rejects the form POST
    /// - `LoginFailed` once connection retries are exhausted
    /// - `Timeout` / `Http` for non-retryable transport failures
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ZamundaError::InvalidCredentials);
        }

        let attempt = || async move {
            self.client.get("/login.php").await?;

            let form = [("username", username), ("password", password)];
            let response = self
                .client
                .post_form(
                    "/takelogin.php",
                    headers::login_headers(self.client.base_url()),
                    &form,
                )
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(ZamundaError::UnexpectedStatus(status));
            }

            Ok(())
        };

        self.client.with_retry(attempt).await.map_err(|e| match e {
            // retries exhausted; anything else propagates as-is
            ZamundaError::ConnectionFailed(_) => {
                ZamundaError::LoginFailed(self.client.config().max_retries + 1)
            }
            other => other,
        })
    }

    /// Search for torrents, logging in first
    ///
    /// Authenticates, fetches one results page and turns every
    /// recognized listing link into a [`SearchResult`]. A row carrying
    /// several recognized links yields several results sharing the
    /// row's name, seeders, size and audio flag; rows with none are
    /// dropped. Row order and within-row link order are preserved.
    ///
    /// A missing results table or a non-success response yields an
    /// empty vector, not an error; authentication failures abort.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> zamunda_core::Result<()> {
    /// use zamunda_core::{SearchOptions, ZamundaScraper};
    /// let scraper = ZamundaScraper::new()?;
    /// let results = scraper
    ///     .search("the matrix", "user", "pass", &SearchOptions::default())
    ///     .await?;
    /// for torrent in results {
    ///     println!("{} ({} seeders): {}", torrent.name, torrent.seeders, torrent.magnet_link);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(
        &self,
        query: &str,
        username: &str,
        password: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        self.login(username, password).await?;
        self.search_logged_in(query, options).await
    }

    /// Search for several queries with a single login
    ///
    /// Runs the queries sequentially and accumulates all results. A
    /// query whose fetch or parse fails is logged and skipped; only a
    /// login failure aborts the whole batch.
    pub async fn search_multi(
        &self,
        queries: &[&str],
        username: &str,
        password: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        self.login(username, password).await?;

        let mut results = Vec::new();
        for query in queries {
            match self.search_logged_in(query, options).await {
                Ok(mut batch) => results.append(&mut batch),
                Err(e) => warn!("Skipping query {query:?}: {e}"),
            }
        }

        Ok(results)
    }

    /// One search fetch-and-parse pass against an authenticated session
    async fn search_logged_in(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        let path = build_search_path(query);
        let response = self.client.get(&path).await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Search for {query:?} answered {status}, returning no results");
            return Ok(Vec::new());
        }

        let html = response.text().await?;
        let listings = match parse_search_results(&html) {
            Ok(listings) => listings,
            Err(e) => {
                warn!("Search for {query:?} returned an unparsable page: {e}");
                return Ok(Vec::new());
            }
        };

        let mut results = Vec::new();
        for listing in &listings {
            self.emit_listing(listing, options, &mut results).await;
        }

        debug!(
            "Query {query:?}: {} rows, {} results",
            listings.len(),
            results.len()
        );
        Ok(results)
    }

    /// Turns one parsed row into zero or more results
    async fn emit_listing(
        &self,
        listing: &Listing,
        options: &SearchOptions,
        results: &mut Vec<SearchResult>,
    ) {
        for link in &listing.links {
            let page_url = absolute_url(self.client.base_url(), &link.href);

            let (magnet_link, info_hash, files) = match link.kind {
                LinkKind::Magnet if options.resolve_magnets => {
                    match self.resolve_magnet(&link.href).await {
                        Some(magnet) => {
                            let hash = extract_info_hash(&magnet);
                            (magnet, hash, None)
                        }
                        None => (page_url, None, None),
                    }
                }
                LinkKind::Magnet => (page_url, None, None),
                LinkKind::TorrentFile => match self.get_torrent(&link.href).await {
                    TorrentMetadata::Resolved {
                        magnet_link,
                        info_hash,
                        files,
                    } => (magnet_link, Some(info_hash), Some(files)),
                    TorrentMetadata::Unavailable => (page_url, None, None),
                },
            };

            results.push(SearchResult {
                name: listing.name.clone(),
                magnet_link,
                seeders: listing.seeders,
                has_background_audio: listing.has_background_audio,
                size: listing.size.clone(),
                info_hash,
                files,
            });
        }
    }

    /// Resolve a `/magnetlink...` href into the magnet URI it renders
    ///
    /// Fetches the page under the retry policy. Every failure — retries
    /// exhausted, non-success status, no magnet anchor on the page —
    /// comes back as `None`; the caller falls back to the page URL.
    pub async fn resolve_magnet(&self, href: &str) -> Option<String> {
        let response = match self.client.get_with_retry(href).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Magnet page {href} unreachable: {e}");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Magnet page {href} answered {status}");
            return None;
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                warn!("Magnet page {href} body unreadable: {e}");
                return None;
            }
        };

        let magnet = find_magnet_link(&html);
        if magnet.is_none() {
            debug!("Magnet page {href} carries no magnet anchor");
        }
        magnet
    }

    /// Fetch a `/download.php...` href and decode the torrent file
    ///
    /// Never fails: a transport error, a non-success status (a pruned
    /// torrent answers 404) or a decode failure all come back as
    /// [`TorrentMetadata::Unavailable`].
    pub async fn get_torrent(&self, href: &str) -> TorrentMetadata {
        let response = match self.client.get(href).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Torrent file {href} unreachable: {e}");
                return TorrentMetadata::Unavailable;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Torrent file {href} answered {status}");
            return TorrentMetadata::Unavailable;
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Torrent file {href} body unreadable: {e}");
                return TorrentMetadata::Unavailable;
            }
        };

        match decode_torrent(&bytes) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Torrent file {href} failed to decode: {e}");
                TorrentMetadata::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_rejects_empty_username() {
        let scraper = ZamundaScraper::new().unwrap();
        let result = scraper.login("", "secret").await;
        assert!(matches!(result, Err(ZamundaError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_rejects_empty_password() {
        let scraper = ZamundaScraper::new().unwrap();
        let result = scraper.login("user", "").await;
        assert!(matches!(result, Err(ZamundaError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_rejects_whitespace_only_credentials() {
        let scraper = ZamundaScraper::new().unwrap();
        let result = scraper.login("   ", "\t").await;
        assert!(matches!(result, Err(ZamundaError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_search_fails_fast_on_empty_credentials() {
        let scraper = ZamundaScraper::new().unwrap();
        let result = scraper
            .search("matrix", "", "", &SearchOptions::default())
            .await;
        assert!(matches!(result, Err(ZamundaError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_search_multi_fails_fast_on_empty_credentials() {
        let scraper = ZamundaScraper::new().unwrap();
        let result = scraper
            .search_multi(&["a", "b"], "user", "", &SearchOptions::default())
            .await;
        assert!(matches!(result, Err(ZamundaError::InvalidCredentials)));
    }
}
