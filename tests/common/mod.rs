//! Shared fixtures for the facade integration tests: payload builders and
//! a service wired to a mock origin plus in-memory cache tiers.

use std::time::Duration;

use marquee::cache::{DEFAULT_SHARED_TTL, LocalCache, SharedCache};
use marquee::origin::OriginClient;
use marquee::services::CatalogService;
use serde_json::{Value, json};

pub const LOCAL_TTL: Duration = Duration::from_secs(900);

pub struct TestTiers {
    pub local: LocalCache,
    pub shared: SharedCache,
}

impl TestTiers {
    pub async fn new() -> Self {
        Self::with_ttls(LOCAL_TTL, DEFAULT_SHARED_TTL).await
    }

    pub async fn with_ttls(local_ttl: Duration, shared_ttl: Duration) -> Self {
        Self {
            local: LocalCache::new(local_ttl),
            shared: SharedCache::in_memory(shared_ttl)
                .await
                .expect("in-memory shared cache"),
        }
    }

    /// Build a service over these tiers; the tiers stay cloneable from the
    /// outside so tests can seed and inspect them.
    pub fn service(&self, server: &mockito::Server) -> CatalogService {
        let origin = OriginClient::new(server.url(), Duration::from_secs(5));
        CatalogService::new(origin, self.local.clone(), self.shared.clone())
    }
}

pub fn listing_body(titles: &[&str]) -> Value {
    json!({
        "success": true,
        "items": titles
            .iter()
            .enumerate()
            .map(|(i, title)| json!({
                "id": format!("{}", i + 1),
                "title": title,
                "poster": format!("https://img.example/{}.jpg", i + 1),
                "rating": "7.5",
                "year": "2024",
                "type": "movie",
                "genre": "Drama",
                "detailPath": format!("/film/{}", title.to_lowercase().replace(' ', "-")),
            }))
            .collect::<Vec<_>>(),
        "page": 1,
        "hasMore": false,
    })
}

pub fn detail_envelope(title: &str) -> Value {
    json!({
        "success": true,
        "item": {
            "title": title,
            "poster": "https://img.example/detail.jpg",
            "rating": "8.2",
            "year": "2024",
            "genre": "Drama",
            "description": "A story worth caching.",
            "playerUrl": "https://embed.example/play",
            "type": "movie"
        }
    })
}
