//! 推荐码查询缓存
//!
//! GET /api/referral/{code} 的只读缓存层。任何缓存故障都降级为直接
//! 查库，核心写路径不经过缓存。

mod memory;
mod null;
mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::errors::{LaunchlistError, Result};
use crate::storage::WaitlistEntry;

pub use memory::MemoryReferralCache;
pub use null::NullReferralCache;
pub use redis::RedisReferralCache;

#[async_trait]
pub trait ReferralCache: Send + Sync {
    async fn get(&self, code: &str) -> Option<WaitlistEntry>;
    async fn insert(&self, code: &str, entry: WaitlistEntry);
    async fn remove(&self, code: &str);
    async fn invalidate_all(&self);
}

pub struct CacheFactory;

impl CacheFactory {
    pub fn create() -> Result<Arc<dyn ReferralCache>> {
        let config = crate::config::get_config();
        let cache_type = config.cache.cache_type.as_str();

        match cache_type {
            "memory" => Ok(Arc::new(MemoryReferralCache::new()) as Arc<dyn ReferralCache>),
            "redis" => {
                let cache = RedisReferralCache::new()
                    .map_err(LaunchlistError::cache_connection)?;
                Ok(Arc::new(cache) as Arc<dyn ReferralCache>)
            }
            "null" | "none" => Ok(Arc::new(NullReferralCache) as Arc<dyn ReferralCache>),
            _ => {
                error!("Unknown cache backend: {}", cache_type);
                Err(LaunchlistError::cache_plugin_not_found(format!(
                    "Unknown cache backend: {}. Supported: memory, redis, null",
                    cache_type
                )))
            }
        }
    }
}
