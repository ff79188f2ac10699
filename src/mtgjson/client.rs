//! MTGJSON archive download

use super::models::AllSets;
use crate::error::{Result, SyncError};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Zipped `AllSets` dump
pub const MTG_JSON_URL: &str = "https://mtgjson.com/json/AllSets-x.json.zip";

/// Plain-HTTP mirror, tried when the primary URL can't be reached
pub const FALLBACK_MTG_JSON_URL: &str = "http://mtgjson.com/json/AllSets-x.json.zip";

/// Downloads and unpacks the MTGJSON dump
pub struct MtgJsonClient {
    client: reqwest::Client,
    archive_url: String,
    fallback_url: String,
}

impl MtgJsonClient {
    /// Client against the public MTGJSON URLs
    pub fn new() -> Self {
        Self::with_urls(MTG_JSON_URL, FALLBACK_MTG_JSON_URL)
    }

    /// Client against custom URLs (mirrors, tests)
    pub fn with_urls(archive_url: impl Into<String>, fallback_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            archive_url: archive_url.into(),
            fallback_url: fallback_url.into(),
        }
    }

    /// Download the archive and parse every set in it
    pub async fn fetch_all(&self) -> Result<AllSets> {
        let bytes = self.download().await?;
        log::info!("Downloaded MTGJSON archive ({} bytes)", bytes.len());

        let sets = unpack_archive(&bytes)?;
        log::info!("Parsed {} sets from MTGJSON", sets.len());
        Ok(sets)
    }

    /// Only a failure to connect to the primary URL falls back to the mirror;
    /// any other error is returned as is.
    async fn download(&self) -> Result<Vec<u8>> {
        log::info!("Fetching MTGJSON archive from {}...", self.archive_url);
        let response = match self.get(&self.archive_url).await {
            Ok(response) => response,
            Err(e) if e.is_connect() => {
                log::warn!(
                    "Could not connect to {} ({}), retrying {}",
                    self.archive_url,
                    e,
                    self.fallback_url
                );
                self.get(&self.fallback_url).await?
            }
            Err(e) => return Err(e.into()),
        };

        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn get(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(url)
            .header("User-Agent", "card_sync/1.0")
            .send()
            .await
    }
}

impl Default for MtgJsonClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the single JSON file inside a zip archive
///
/// Fails with [`SyncError::ArchiveLayout`] unless the archive holds exactly
/// one file.
pub fn unpack_archive(bytes: &[u8]) -> Result<AllSets> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    if archive.len() != 1 {
        return Err(SyncError::ArchiveLayout(archive.len()));
    }

    let mut file = archive.by_index(0)?;
    log::debug!("Reading {} from archive", file.name());
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
