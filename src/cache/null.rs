use async_trait::async_trait;

use super::ReferralCache;
use crate::storage::WaitlistEntry;

/// 空缓存：所有读取都 miss，用于禁用缓存的部署
pub struct NullReferralCache;

#[async_trait]
impl ReferralCache for NullReferralCache {
    async fn get(&self, _code: &str) -> Option<WaitlistEntry> {
        None
    }

    async fn insert(&self, _code: &str, _entry: WaitlistEntry) {}

    async fn remove(&self, _code: &str) {}

    async fn invalidate_all(&self) {}
}
