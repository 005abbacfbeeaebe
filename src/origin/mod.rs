//! Client for the upstream catalog API: one GET endpoint, dispatched by an
//! `action` query parameter. Failures never escape this layer: transport
//! errors, bad statuses, and malformed JSON all degrade to the benign empty
//! result so callers only ever see "no data".

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::{debug, warn};

use crate::mapper;
use crate::models::{CatalogPage, DetailRecord};

#[cfg(test)]
mod tests;

/// Category actions the upstream exposes. The client accepts arbitrary
/// action strings; these are the known ones.
pub mod actions {
    pub const TRENDING: &str = "trending";
    pub const INDONESIAN_MOVIES: &str = "indonesian-movies";
    pub const INDONESIAN_DRAMA: &str = "indonesian-drama";
    pub const ADULT_COMEDY: &str = "adult-comedy";
    pub const WESTERN_TV: &str = "western-tv";
    pub const KDRAMA: &str = "kdrama";
    pub const SHORT_TV: &str = "short-tv";
    pub const ANIME: &str = "anime";
    pub const HOLLYWOOD_MOVIES: &str = "hollywood-movies";
}

/// Upstream routing workaround: these category ids have no category route
/// and must be rewritten into a search call with a fixed query term.
static SEARCH_ALIASES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([(actions::HOLLYWOOD_MOVIES, "hollywood")]));

/// Detail responses bury the record under varying envelope keys. First
/// present non-null wins, in this fixed priority order.
fn locate_detail_item(payload: &Value) -> Option<&Value> {
    [
        payload.get("item"),
        payload.get("data"),
        payload.get("items").and_then(|v| v.get(0)),
        payload.get("results").and_then(|v| v.get(0)),
        payload.get("result"),
    ]
    .into_iter()
    .flatten()
    .find(|v| !v.is_null())
}

#[derive(Debug, Clone)]
pub struct OriginClient {
    client: reqwest::Client,
    base_url: String,
}

impl OriginClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch one page of a category listing. Aliased categories are
    /// silently rerouted through search.
    pub async fn fetch_category(&self, action: &str, page: u32) -> CatalogPage {
        if let Some(term) = SEARCH_ALIASES.get(action) {
            debug!("Rewriting aliased category {} into search for '{}'", action, term);
            return self.search(term).await;
        }

        let page_param = page.to_string();
        match self
            .try_listing(&[("action", action), ("page", page_param.as_str())])
            .await
        {
            Ok(listing) => listing,
            Err(e) => {
                warn!("Category fetch {} page {} failed: {}", action, page, e);
                CatalogPage::empty()
            }
        }
    }

    pub async fn search(&self, query: &str) -> CatalogPage {
        match self.try_listing(&[("action", "search"), ("q", query)]).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!("Search for '{}' failed: {}", query, e);
                CatalogPage::empty()
            }
        }
    }

    /// Fetch and normalize one detail record. `None` covers the whole
    /// failure spectrum: transport error, upstream failure flag, or no
    /// recognizable record in the envelope.
    pub async fn get_detail(&self, detail_path: &str) -> Option<DetailRecord> {
        match self.try_detail(detail_path).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Detail fetch for '{}' failed: {}", detail_path, e);
                None
            }
        }
    }

    async fn try_listing(&self, params: &[(&str, &str)]) -> Result<CatalogPage> {
        let response = self.client.get(&self.base_url).query(params).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("catalog request failed: {}", response.status()));
        }

        Ok(response.json::<CatalogPage>().await?)
    }

    async fn try_detail(&self, detail_path: &str) -> Result<Option<DetailRecord>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("action", "detail"), ("detailPath", detail_path)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("detail request failed: {}", response.status()));
        }

        let payload = response.json::<Value>().await?;
        if !payload
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            debug!("Detail response for '{}' carried no success flag", detail_path);
            return Ok(None);
        }

        Ok(locate_detail_item(&payload).map(mapper::normalize_detail))
    }
}
