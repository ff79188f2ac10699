//! FABDB REST client

use super::models::{CardPage, FabCard};
use crate::error::{Result, SyncError};

/// FABDB card listing endpoint
pub const API_URL: &str = "https://fabdb.net/api/cards";

/// Cards requested per page
pub const PAGE_SIZE: u32 = 100;

/// Client for the paginated FABDB card listing
pub struct FabDbClient {
    client: reqwest::Client,
    api_url: String,
}

impl FabDbClient {
    /// Client against the public FABDB API
    pub fn new() -> Self {
        Self::with_api_url(API_URL)
    }

    /// Client against a custom endpoint (mirrors, tests)
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    /// Fetch every page sequentially and return all cards
    ///
    /// The last page number is only known from each response, so pages are
    /// requested one after another until `current_page` reaches `last_page`.
    pub async fn fetch_all(&self) -> Result<Vec<FabCard>> {
        log::info!("Fetching cards from FABDB ({})...", self.api_url);

        let mut cards = Vec::new();
        let mut page = 1;
        loop {
            let page_data = self.fetch_page(page).await?;
            if page_data.meta.current_page != page {
                return Err(SyncError::PageMismatch {
                    requested: page,
                    returned: page_data.meta.current_page,
                });
            }
            log::debug!(
                "Fetched page {}/{} ({} cards)",
                page_data.meta.current_page,
                page_data.meta.last_page,
                page_data.data.len()
            );
            cards.extend(page_data.data);

            if page_data.meta.current_page >= page_data.meta.last_page {
                break;
            }
            page += 1;
        }

        log::info!("Fetched {} cards over {} page(s)", cards.len(), page);
        Ok(cards)
    }

    async fn fetch_page(&self, page: u32) -> Result<CardPage> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("per_page", PAGE_SIZE), ("page", page)])
            .header("User-Agent", "card_sync/1.0")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }

        Ok(response.json::<CardPage>().await?)
    }
}

impl Default for FabDbClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
