//! 服务器启动准备
//!
//! 按依赖注入的方式一次性构建存储、缓存和各个 service，通过
//! StartupContext 传给 HTTP 层，不设模块级单例。

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::{CacheFactory, ReferralCache};
use crate::services::{AnalyticsService, ChatService, WaitlistService};
use crate::storage::{SeaOrmStorage, infer_backend_from_url, normalize_backend_name};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub cache: Arc<dyn ReferralCache>,
    pub waitlist_service: Arc<WaitlistService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub chat_service: Arc<ChatService>,
}

/// 构建存储后端（CLI 的 seed 子命令也走这里）
pub async fn create_storage() -> Result<Arc<SeaOrmStorage>> {
    let config = crate::config::get_config();
    let database_url = &config.database.database_url;

    let backend = normalize_backend_name(
        &infer_backend_from_url(database_url).context("Failed to infer database backend")?,
    );

    let storage = SeaOrmStorage::new(database_url, &backend)
        .await
        .context("Failed to create storage backend")?;

    Ok(Arc::new(storage))
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和各个 service
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = create_storage().await?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    // 初始化推荐码查询缓存
    let cache = CacheFactory::create().context("Failed to create cache")?;

    let waitlist_service = Arc::new(WaitlistService::new(storage.clone(), cache.clone()));
    let analytics_service = Arc::new(AnalyticsService::new(storage.clone()));
    let chat_service = Arc::new(ChatService::new());

    check_component_enabled();

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        cache,
        waitlist_service,
        analytics_service,
        chat_service,
    })
}

fn check_component_enabled() {
    let config = crate::config::get_config();

    // 检查 Analytics 管理 API 是否启用
    if config.api.admin_api_key.is_empty() {
        info!("Analytics admin API is disabled (ADMIN_API_KEY not set)");
    } else {
        info!("Analytics admin API available at: /api/analytics");
        if config.api.admin_api_key.len() < 16 {
            tracing::warn!(
                "WARNING: Admin API key is very short ({} chars). Consider using a stronger key.",
                config.api.admin_api_key.len()
            );
        }
    }
}
