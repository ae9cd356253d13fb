//! Two-tier page cache.
//!
//! Fresh content lives in the primary "pages" store and never expires.
//! Evicting a page demotes it to the "temp" store stamped with the demotion
//! time; the demoted copy stays servable for a bounded window, so a fetch
//! failure shortly after an invalidation still has a recent copy to fall
//! back on. Expired temp entries are purged lazily on read, not by a
//! background sweep.

mod content;

pub use content::PageContent;
use content::TempEntry;

use std::path::Path;

use crate::{Error, FileStore};
use chrono::Utc;

/// How long a demoted entry remains servable, in seconds.
const TEMP_TTL_SECS: i64 = 1800;

/// Primary tier database file name.
const PAGES_DB: &str = "paginas.db";

/// Temp tier database file name.
const TEMP_DB: &str = "paginas-temp.db";

/// Two-tier page cache over two [`FileStore`] instances.
///
/// The cache can also run disabled (no backing stores at all): reads always
/// miss and writes and evictions are no-ops. Disabled mode is selected
/// explicitly through configuration or entered when no usable configuration
/// directory can be resolved.
#[derive(Clone, Debug)]
pub struct PageCache {
    tiers: Option<Tiers>,
}

#[derive(Clone, Debug)]
struct Tiers {
    pages: FileStore,
    temp: FileStore,
}

impl PageCache {
    /// Open the cache under the given configuration directory.
    ///
    /// Ensures `<config_dir>/cache/` exists, then opens the two tier stores
    /// inside it. `None` means no usable configuration directory could be
    /// resolved; the cache degrades to disabled mode instead of failing.
    /// A directory or store that cannot be created surfaces
    /// [`Error::StoreUnavailable`].
    pub async fn open(config_dir: Option<&Path>) -> Result<Self, Error> {
        let Some(config_dir) = config_dir else {
            tracing::debug!("no configuration directory, page cache disabled");
            return Ok(Self::disabled());
        };

        let cache_dir = config_dir.join("cache");
        std::fs::create_dir_all(&cache_dir)
            .map_err(|e| Error::StoreUnavailable(format!("{}: {e}", cache_dir.display())))?;

        let pages = FileStore::open(cache_dir.join(PAGES_DB)).await?;
        let temp = FileStore::open(cache_dir.join(TEMP_DB)).await?;

        Ok(Self { tiers: Some(Tiers { pages, temp }) })
    }

    /// Open an in-memory cache for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let pages = FileStore::open_in_memory().await?;
        let temp = FileStore::open_in_memory().await?;
        Ok(Self { tiers: Some(Tiers { pages, temp }) })
    }

    /// A cache that never hits: reads miss, writes and evictions are no-ops.
    pub fn disabled() -> Self {
        Self { tiers: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tiers.is_some()
    }

    /// Look up a page.
    ///
    /// The primary tier is consulted first and its entries never expire.
    /// A temp-tier entry is returned only while its TTL window is open;
    /// past the window it is deleted and the read is a miss.
    pub async fn read(&self, url: &str) -> Result<Option<PageContent>, Error> {
        self.read_at(url, Utc::now().timestamp()).await
    }

    async fn read_at(&self, url: &str, now: i64) -> Result<Option<PageContent>, Error> {
        let Some(tiers) = &self.tiers else {
            return Ok(None);
        };

        if let Some(bytes) = tiers.pages.get(url).await? {
            tracing::debug!("cache hit for {url}");
            return Ok(Some(PageContent::from_bytes(bytes)));
        }

        let Some(raw) = tiers.temp.get(url).await? else {
            tracing::debug!("cache miss for {url}");
            return Ok(None);
        };

        // Records that no longer parse are purged along with expired ones.
        match serde_json::from_slice::<TempEntry>(&raw) {
            Ok(entry) if now <= entry.stamped_at + TEMP_TTL_SECS => {
                tracing::debug!("temp tier hit for {url}");
                Ok(Some(PageContent::from_bytes(entry.content)))
            }
            _ => {
                tiers.temp.delete(url).await?;
                tracing::debug!("temp tier entry for {url} expired");
                Ok(None)
            }
        }
    }

    /// Store fresh content. Fresh content always lands in the primary tier.
    pub async fn write(&self, url: &str, content: &PageContent) -> Result<(), Error> {
        let Some(tiers) = &self.tiers else {
            return Ok(());
        };
        tiers.pages.set(url, content.as_bytes()).await
    }

    /// Demote a page from the primary tier to the temp tier.
    ///
    /// The entry is stamped with the current time and removed from the
    /// primary tier; both steps complete before this returns. Evicting a
    /// URL the primary tier doesn't hold is a no-op.
    pub async fn evict(&self, url: &str) -> Result<(), Error> {
        self.evict_at(url, Utc::now().timestamp()).await
    }

    async fn evict_at(&self, url: &str, now: i64) -> Result<(), Error> {
        let Some(tiers) = &self.tiers else {
            return Ok(());
        };
        let Some(content) = tiers.pages.get(url).await? else {
            return Ok(());
        };

        let entry = TempEntry { stamped_at: now, content };
        let raw = serde_json::to_vec(&entry).map_err(|e| Error::InvalidEntry(e.to_string()))?;
        tiers.temp.set(url, &raw).await?;
        tiers.pages.delete(url).await?;
        tracing::debug!("evicted {url} to temp tier");
        Ok(())
    }

    /// Commit and release both tier stores.
    pub async fn close(self) -> Result<(), Error> {
        if let Some(tiers) = self.tiers {
            tiers.pages.close().await?;
            tiers.temp.close().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://loterias.example/quina";

    #[tokio::test]
    async fn test_read_miss() {
        let cache = PageCache::open_in_memory().await.unwrap();
        assert_eq!(cache.read(URL).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let cache = PageCache::open_in_memory().await.unwrap();
        cache.write(URL, &"resultado".into()).await.unwrap();
        assert_eq!(cache.read(URL).await.unwrap(), Some("resultado".into()));
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let cache = PageCache::open_in_memory().await.unwrap();
        cache.write(URL, &"primeiro".into()).await.unwrap();
        cache.write(URL, &"segundo".into()).await.unwrap();
        assert_eq!(cache.read(URL).await.unwrap(), Some("segundo".into()));
    }

    #[tokio::test]
    async fn test_evict_moves_not_duplicates() {
        let cache = PageCache::open_in_memory().await.unwrap();
        cache.write(URL, &"resultado".into()).await.unwrap();
        cache.evict(URL).await.unwrap();

        let tiers = cache.tiers.as_ref().unwrap();
        assert!(!tiers.pages.contains(URL).await.unwrap());
        assert!(tiers.temp.contains(URL).await.unwrap());

        // Still served, now through the temp tier.
        assert_eq!(cache.read(URL).await.unwrap(), Some("resultado".into()));
    }

    #[tokio::test]
    async fn test_evict_absent_is_noop() {
        let cache = PageCache::open_in_memory().await.unwrap();
        cache.evict(URL).await.unwrap();
        assert_eq!(cache.read(URL).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_temp_entry_served_until_ttl_boundary() {
        let cache = PageCache::open_in_memory().await.unwrap();
        cache.write(URL, &"resultado".into()).await.unwrap();
        cache.evict_at(URL, 1_000_000).await.unwrap();

        let hit = cache.read_at(URL, 1_000_000 + TEMP_TTL_SECS).await.unwrap();
        assert_eq!(hit, Some("resultado".into()));
    }

    #[tokio::test]
    async fn test_temp_entry_expires_and_is_purged() {
        let cache = PageCache::open_in_memory().await.unwrap();
        cache.write(URL, &"resultado".into()).await.unwrap();
        cache.evict_at(URL, 1_000_000).await.unwrap();

        let miss = cache.read_at(URL, 1_000_000 + TEMP_TTL_SECS + 1).await.unwrap();
        assert_eq!(miss, None);

        // Purged as a side effect of the expired read.
        let tiers = cache.tiers.as_ref().unwrap();
        assert!(!tiers.temp.contains(URL).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_temp_entry_is_purged() {
        let cache = PageCache::open_in_memory().await.unwrap();
        let tiers = cache.tiers.as_ref().unwrap();
        tiers.temp.set(URL, b"not json").await.unwrap();

        assert_eq!(cache.read(URL).await.unwrap(), None);
        assert!(!tiers.temp.contains(URL).await.unwrap());
    }

    #[tokio::test]
    async fn test_rewrite_after_evict_shadows_temp_copy() {
        let cache = PageCache::open_in_memory().await.unwrap();
        cache.write(URL, &"velho".into()).await.unwrap();
        cache.evict_at(URL, 1_000_000).await.unwrap();
        cache.write(URL, &"novo".into()).await.unwrap();

        // Primary shadows whatever the temp tier still holds, even long
        // after the temp entry would have expired.
        let hit = cache.read_at(URL, 1_000_000 + TEMP_TTL_SECS + 100).await.unwrap();
        assert_eq!(hit, Some("novo".into()));
    }

    #[tokio::test]
    async fn test_disabled_cache_is_inert() {
        let cache = PageCache::disabled();
        assert!(!cache.is_enabled());

        cache.write(URL, &"resultado".into()).await.unwrap();
        assert_eq!(cache.read(URL).await.unwrap(), None);
        cache.evict(URL).await.unwrap();
        cache.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_with_no_directory_degrades_to_disabled() {
        let cache = PageCache::open(None).await.unwrap();
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_open_creates_cache_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::open(Some(dir.path())).await.unwrap();
        assert!(cache.is_enabled());
        assert!(dir.path().join("cache").join("paginas.db").exists());
        assert!(dir.path().join("cache").join("paginas-temp.db").exists());
        cache.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_reopen_preserves_pages() {
        let dir = tempfile::tempdir().unwrap();

        let cache = PageCache::open(Some(dir.path())).await.unwrap();
        cache.write(URL, &"resultado".into()).await.unwrap();
        cache.close().await.unwrap();

        let cache = PageCache::open(Some(dir.path())).await.unwrap();
        assert_eq!(cache.read(URL).await.unwrap(), Some("resultado".into()));
        cache.close().await.unwrap();
    }
}
