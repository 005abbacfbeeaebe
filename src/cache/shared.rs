use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::{Row, sqlite::SqlitePool, sqlite::SqlitePoolOptions};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::utils::errors::CacheError;

pub const DEFAULT_SHARED_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// Logical namespaces of the shared store. Search results are deliberately
/// never written here: free-text keys would grow the store without bound
/// and search is kept origin-fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Categories,
    Details,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Categories => "categories",
            Namespace::Details => "details",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shared persistent cache tier: a SQLite document store addressed by
/// `(namespace, key)`, each document holding the JSON payload, an absolute
/// expiry timestamp, and a human-readable update marker. Shared across
/// clients to keep load off the origin.
///
/// Expired rows read as a miss but stay in place; the next successful write
/// supersedes them.
#[derive(Debug, Clone)]
pub struct SharedCache {
    db: SqlitePool,
    ttl: Duration,
}

impl SharedCache {
    pub async fn open(path: &Path, ttl: Duration) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", path.display());
        let db = SqlitePool::connect(&db_url).await?;
        Self::initialize_schema(&db).await?;

        Ok(Self { db, ttl })
    }

    /// An in-memory store with identical semantics, for tests. Pinned to a
    /// single pooled connection: every `:memory:` connection is its own
    /// database.
    pub async fn in_memory(ttl: Duration) -> Result<Self, CacheError> {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::initialize_schema(&db).await?;

        Ok(Self { db, ttl })
    }

    async fn initialize_schema(db: &SqlitePool) -> Result<(), CacheError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS remote_cache (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                content TEXT NOT NULL,
                expiry INTEGER NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (namespace, key)
            )
            "#,
        )
        .execute(db)
        .await?;

        Ok(())
    }

    /// Look up `key` in `namespace`. Rows past their stored expiry are
    /// reported as a miss without being deleted.
    pub async fn get<T>(&self, namespace: Namespace, key: &str) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned,
    {
        let row = sqlx::query("SELECT content, expiry FROM remote_cache WHERE namespace = ? AND key = ?")
            .bind(namespace.as_str())
            .bind(key)
            .fetch_optional(&self.db)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expiry: i64 = row.try_get("expiry")?;
        if expiry <= Utc::now().timestamp() {
            debug!("Shared cache entry {}/{} expired", namespace, key);
            return Ok(None);
        }

        let content: String = row.try_get("content")?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub async fn set<T>(&self, namespace: Namespace, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        self.set_with_ttl(namespace, key, value, self.ttl).await
    }

    /// Write with an explicit TTL instead of the store default.
    pub async fn set_with_ttl<T>(
        &self,
        namespace: Namespace,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let content = serde_json::to_string(value)?;
        let expiry = Utc::now().timestamp() + ttl.as_secs() as i64;
        let updated_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO remote_cache (namespace, key, content, expiry, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(namespace, key) DO UPDATE SET
                content = excluded.content,
                expiry = excluded.expiry,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(namespace.as_str())
        .bind(key)
        .bind(content)
        .bind(expiry)
        .bind(updated_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Raw presence check, ignoring expiry. Lets tests observe that expired
    /// rows are ignored rather than deleted.
    pub async fn contains(&self, namespace: Namespace, key: &str) -> Result<bool, CacheError> {
        let row = sqlx::query("SELECT 1 FROM remote_cache WHERE namespace = ? AND key = ?")
            .bind(namespace.as_str())
            .bind(key)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.is_some())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogPage;

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let cache = SharedCache::in_memory(DEFAULT_SHARED_TTL).await.unwrap();
        let page = CatalogPage::empty();
        cache
            .set(Namespace::Categories, "trending_1", &page)
            .await
            .unwrap();

        let hit: Option<CatalogPage> = cache.get(Namespace::Categories, "trending_1").await.unwrap();
        assert_eq!(hit, Some(page));
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let cache = SharedCache::in_memory(DEFAULT_SHARED_TTL).await.unwrap();
        cache.set(Namespace::Categories, "k", &1u32).await.unwrap();

        let other: Option<u32> = cache.get(Namespace::Details, "k").await.unwrap();
        assert_eq!(other, None);
    }

    #[tokio::test]
    async fn expired_row_is_a_miss_but_stays_on_disk() {
        let cache = SharedCache::in_memory(DEFAULT_SHARED_TTL).await.unwrap();
        cache
            .set_with_ttl(Namespace::Details, "k", &42u32, Duration::ZERO)
            .await
            .unwrap();

        let hit: Option<u32> = cache.get(Namespace::Details, "k").await.unwrap();
        assert_eq!(hit, None);
        assert!(cache.contains(Namespace::Details, "k").await.unwrap());
    }

    #[tokio::test]
    async fn write_supersedes_expired_row() {
        let cache = SharedCache::in_memory(DEFAULT_SHARED_TTL).await.unwrap();
        cache
            .set_with_ttl(Namespace::Details, "k", &1u32, Duration::ZERO)
            .await
            .unwrap();
        cache.set(Namespace::Details, "k", &2u32).await.unwrap();

        let hit: Option<u32> = cache.get(Namespace::Details, "k").await.unwrap();
        assert_eq!(hit, Some(2));
    }

    #[tokio::test]
    async fn open_creates_the_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.db");
        let cache = SharedCache::open(&path, DEFAULT_SHARED_TTL).await.unwrap();

        cache.set(Namespace::Categories, "k", &7u32).await.unwrap();
        let hit: Option<u32> = cache.get(Namespace::Categories, "k").await.unwrap();
        assert_eq!(hit, Some(7));
        assert!(path.exists());
    }
}
