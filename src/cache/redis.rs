use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, trace};

use super::ReferralCache;
use crate::storage::WaitlistEntry;

pub struct RedisReferralCache {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
    ttl: u64,
}

impl RedisReferralCache {
    pub fn new() -> Result<Self, String> {
        let config = crate::config::get_config();
        let redis_config = &config.cache.redis;
        let ttl = config.cache.default_ttl;

        debug!(
            "RedisReferralCache created with prefix: '{}', TTL: {}s",
            redis_config.key_prefix, ttl
        );

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Failed to create Redis client: {e}. Check REDIS_URL."))?;

        // 测试 Redis 连接 - 使用同步连接进行简单测试
        match client.get_connection() {
            Ok(mut conn) => match redis::cmd("PING").query::<String>(&mut conn) {
                Ok(response) => {
                    debug!("Redis connection test successful: {}", response);
                }
                Err(e) => {
                    error!(
                        "Failed to ping Redis server: {}. Check Redis server status and URL: {}",
                        e, redis_config.url
                    );
                    return Err(format!("Redis ping failed: {e}"));
                }
            },
            Err(e) => {
                error!(
                    "Failed to ping Redis server: {}. Check Redis server status and URL: {}",
                    e, redis_config.url
                );
                return Err(format!("Redis ping failed: {e}"));
            }
        }

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: redis_config.key_prefix.clone(),
            ttl,
        })
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        // 首先尝试读取现有连接
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        // 需要建立新连接
        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    fn make_key(&self, code: &str) -> String {
        format!("{}referral:{}", self.key_prefix, code)
    }
}

#[async_trait]
impl ReferralCache for RedisReferralCache {
    async fn get(&self, code: &str) -> Option<WaitlistEntry> {
        let redis_key = self.make_key(code);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.reset_connection().await;
                return None;
            }
        };

        let result: redis::RedisResult<Option<String>> = conn.get(&redis_key).await;

        match result {
            Ok(Some(data)) => match serde_json::from_str::<WaitlistEntry>(&data) {
                Ok(entry) => {
                    trace!("Cache hit for referral code: {}", code);
                    Some(entry)
                }
                Err(e) => {
                    error!("Failed to deserialize cached entry '{}': {}", code, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!("Redis GET failed for '{}': {}", code, e);
                self.reset_connection().await;
                None
            }
        }
    }

    async fn insert(&self, code: &str, entry: WaitlistEntry) {
        let redis_key = self.make_key(code);

        let data = match serde_json::to_string(&entry) {
            Ok(data) => data,
            Err(e) => {
                error!("Failed to serialize entry '{}': {}", code, e);
                return;
            }
        };

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.reset_connection().await;
                return;
            }
        };

        let result: redis::RedisResult<()> = conn.set_ex(&redis_key, data, self.ttl).await;
        if let Err(e) = result {
            error!("Redis SET failed for '{}': {}", code, e);
            self.reset_connection().await;
        }
    }

    async fn remove(&self, code: &str) {
        let redis_key = self.make_key(code);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.reset_connection().await;
                return;
            }
        };

        let result: redis::RedisResult<()> = conn.del(&redis_key).await;
        if let Err(e) = result {
            error!("Redis DEL failed for '{}': {}", code, e);
            self.reset_connection().await;
        }
    }

    async fn invalidate_all(&self) {
        // 按前缀批量删除需要 SCAN，这里只在进程内存中有 TTL 兜底，
        // 不做全量失效。
        trace!("RedisReferralCache invalidate_all is a no-op (TTL-bounded keys)");
    }
}
