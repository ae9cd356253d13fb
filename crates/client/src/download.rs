//! Cache-first download orchestration.

use sorte_core::{AppConfig, Error, PageCache, PageContent};

use crate::fetch::{FetchClient, FetchConfig, charset};

/// Downloads pages, preferring the cache and falling back to the network.
///
/// Callers can force either path per request; with no preference the
/// configured default applies.
pub struct Downloader {
    fetcher: FetchClient,
    cache: PageCache,
    cache_by_default: bool,
}

impl Downloader {
    /// Build a downloader over an already-opened cache.
    ///
    /// The ambient use-cache default is the configured `cache_enabled`
    /// flag; a disabled cache forces it off.
    pub fn new(cache: PageCache, config: &AppConfig) -> Result<Self, Error> {
        let fetcher = FetchClient::new(FetchConfig {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
        })?;
        let cache_by_default = config.cache_enabled && cache.is_enabled();

        Ok(Self { fetcher, cache, cache_by_default })
    }

    /// Produce the content of `url`.
    ///
    /// `Some(true)` forces the cache path, `Some(false)` forces the network
    /// path, `None` uses the configured default. On the cache path a hit is
    /// returned without touching the network, and a fetched page is written
    /// back. Transport errors propagate to the caller unretried.
    pub async fn download(&self, url: &str, use_cache: Option<bool>) -> Result<PageContent, Error> {
        let use_cache = use_cache.unwrap_or(self.cache_by_default);

        if use_cache && let Some(content) = self.cache.read(url).await? {
            return Ok(content);
        }

        let response = self.fetcher.fetch(url).await?;
        let content = charset::decode_body(&response.bytes, response.content_type.as_deref());

        if use_cache {
            self.cache.write(url, &content).await?;
        }

        Ok(content)
    }

    /// Demote `url`'s cached copy to the temp tier.
    pub async fn evict(&self, url: &str) -> Result<(), Error> {
        self.cache.evict(url).await
    }

    /// Commit and release the cache stores.
    pub async fn close(self) -> Result<(), Error> {
        self.cache.close().await
    }
}
