use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use super::ReferralCache;
use crate::storage::WaitlistEntry;

pub struct MemoryReferralCache {
    inner: Cache<String, WaitlistEntry>,
}

impl MemoryReferralCache {
    pub fn new() -> Self {
        let config = crate::config::get_config();

        let inner = Cache::builder()
            .max_capacity(config.cache.memory.max_capacity)
            .time_to_live(Duration::from_secs(config.cache.default_ttl))
            .build();

        debug!(
            "MemoryReferralCache initialized with max capacity: {}, TTL: {}s",
            config.cache.memory.max_capacity, config.cache.default_ttl
        );
        Self { inner }
    }
}

impl Default for MemoryReferralCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReferralCache for MemoryReferralCache {
    async fn get(&self, code: &str) -> Option<WaitlistEntry> {
        self.inner.get(code).await
    }

    async fn insert(&self, code: &str, entry: WaitlistEntry) {
        self.inner.insert(code.to_string(), entry).await;
    }

    async fn remove(&self, code: &str) {
        self.inner.invalidate(code).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}
