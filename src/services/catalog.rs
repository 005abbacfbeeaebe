//! Read-through catalog facade. Every logical request walks the tier chain
//! local, then shared, then origin, short-circuits on the first hit, and populates
//! the faster tiers on the way back. Nothing above this service is aware of
//! caching.

use futures::future::join_all;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::cache::{LocalCache, Namespace, RequestKey, SharedCache, WriteOutcome};
use crate::config::Config;
use crate::models::{CatalogPage, DetailRecord};
use crate::origin::OriginClient;
use crate::utils::errors::CacheError;

pub struct CatalogService {
    origin: OriginClient,
    local: LocalCache,
    shared: SharedCache,
}

impl CatalogService {
    /// Cache tiers are injected rather than ambient so tests can substitute
    /// in-memory stores and a mock origin.
    pub fn new(origin: OriginClient, local: LocalCache, shared: SharedCache) -> Self {
        Self {
            origin,
            local,
            shared,
        }
    }

    /// Build the full tier chain from configuration.
    pub async fn from_config(config: &Config) -> Result<Self, CacheError> {
        let origin = OriginClient::new(&config.origin.base_url, config.origin.timeout());
        let local = LocalCache::new(config.cache.local_ttl());
        let shared = SharedCache::open(&config.cache.db_path(), config.cache.shared_ttl()).await?;
        Ok(Self::new(origin, local, shared))
    }

    /// One page of a category listing. Origin failures come back as the
    /// empty page and are never cached, so the next identical request tries
    /// the origin again.
    pub async fn fetch_category(&self, action: &str, page: u32) -> CatalogPage {
        let key = RequestKey::category(action, page).fingerprint();

        if let Some(hit) = self.local.get::<CatalogPage>(&key).await {
            debug!("Category {} served from local cache", key);
            return hit;
        }

        if let Some(hit) = self
            .shared_get::<CatalogPage>(Namespace::Categories, &key)
            .await
        {
            let outcome = local_outcome(self.local.set(&key, &hit).await);
            debug!("Category {} served from shared cache, local write {:?}", key, outcome);
            return hit;
        }

        let listing = self.origin.fetch_category(action, page).await;
        if listing.success {
            self.populate(Namespace::Categories, &key, &listing).await;
        }
        listing
    }

    /// Free-text search. Cached in the local tier only: search results stay
    /// origin-fresh and free-text keys must not grow the shared store.
    pub async fn search(&self, query: &str) -> CatalogPage {
        let key = RequestKey::search(query).fingerprint();

        if let Some(hit) = self.local.get::<CatalogPage>(&key).await {
            debug!("Search {} served from local cache", key);
            return hit;
        }

        let listing = self.origin.search(query).await;
        if listing.success {
            let outcome = local_outcome(self.local.set(&key, &listing).await);
            debug!("Search {} cached locally, write {:?}", key, outcome);
        }
        listing
    }

    /// One normalized detail record, or `None` for the whole failure
    /// spectrum (origin down, upstream failure flag, nothing recognizable).
    pub async fn get_detail(&self, detail_path: &str) -> Option<DetailRecord> {
        let key = RequestKey::detail(detail_path).fingerprint();

        if let Some(hit) = self.local.get::<DetailRecord>(&key).await {
            debug!("Detail {} served from local cache", key);
            return Some(hit);
        }

        if let Some(hit) = self
            .shared_get::<DetailRecord>(Namespace::Details, &key)
            .await
        {
            let outcome = local_outcome(self.local.set(&key, &hit).await);
            debug!("Detail {} served from shared cache, local write {:?}", key, outcome);
            return Some(hit);
        }

        let record = self.origin.get_detail(detail_path).await?;
        self.populate(Namespace::Details, &key, &record).await;
        Some(record)
    }

    /// Several category rows fetched concurrently (the landing-view
    /// pattern); results come back in input order. Each row is an
    /// independent page-1 category request with its own tier walk.
    pub async fn fetch_rows(&self, actions: &[&str]) -> Vec<CatalogPage> {
        join_all(
            actions
                .iter()
                .map(|action| self.fetch_category(action, 1)),
        )
        .await
    }

    /// Shared-tier read with store failures degraded to a miss.
    async fn shared_get<T: DeserializeOwned>(&self, namespace: Namespace, key: &str) -> Option<T> {
        match self.shared.get(namespace, key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(
                    "Shared cache read {}/{} failed, treating as miss: {}",
                    namespace, key, e
                );
                None
            }
        }
    }

    /// Write through both tiers after an origin success. A failed write
    /// skips that tier; it never fails the request.
    async fn populate<T: Serialize>(&self, namespace: Namespace, key: &str, value: &T) {
        let shared = match self.shared.set(namespace, key, value).await {
            Ok(()) => WriteOutcome::Written,
            Err(e) => {
                warn!("Shared cache write {}/{} skipped: {}", namespace, key, e);
                WriteOutcome::Skipped(e.to_string())
            }
        };
        let local = local_outcome(self.local.set(key, value).await);
        debug!(
            "Write-through for {}/{}: shared {:?}, local {:?}",
            namespace, key, shared, local
        );
    }
}

fn local_outcome(result: Result<(), CacheError>) -> WriteOutcome {
    match result {
        Ok(()) => WriteOutcome::Written,
        Err(e) => {
            warn!("Local cache write skipped: {}", e);
            WriteOutcome::Skipped(e.to_string())
        }
    }
}
