//! API 路由配置
//!
//! 按功能模块拆分路由。注意注册顺序：analytics 前缀更长，必须在
//! 公共 /api scope 之前注册。

use actix_web::web;

use super::middleware::{ApiKeyAuth, public_rate_limiter};
use super::services::analytics::{
    export_dataset, get_daily_stats, get_geographic_stats, get_overview, get_referral_channels,
    post_daily_stats, post_geographic_stats, post_referral_channel,
};
use super::services::auth::{login_user, register_user};
use super::services::chat::{get_chat, post_message};
use super::services::health::HealthService;
use super::services::waitlist::{get_referral, post_waitlist};

/// 公共路由 `/api`
///
/// 包含：
/// - POST /api/waitlist - 等待名单注册（限流）
/// - GET /api/referral/{code} - 推荐码查询（限流）
/// - GET /api/ai/chat, POST /api/ai/message - 关键词应答
/// - POST /api/auth/register, POST /api/auth/login - 用户注册/登录
pub fn public_routes() -> actix_web::Scope {
    web::scope("/api")
        .service(
            web::scope("/waitlist")
                .wrap(public_rate_limiter())
                .route("", web::post().to(post_waitlist)),
        )
        .service(
            web::scope("/referral")
                .wrap(public_rate_limiter())
                .route("/{code}", web::get().to(get_referral)),
        )
        .service(
            web::scope("/ai")
                .route("/chat", web::get().to(get_chat))
                .route("/message", web::post().to(post_message)),
        )
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(register_user))
                .route("/login", web::post().to(login_user)),
        )
}

/// Analytics 管理路由 `/api/analytics`（x-api-key 认证）
///
/// 包含：
/// - GET /overview - 聚合概览
/// - GET/POST /daily-stats - 每日统计查询与 upsert
/// - GET/POST /geographic-stats - 地区统计
/// - GET/POST /referral-channels - 渠道统计
/// - GET /export - CSV 导出
pub fn analytics_routes() -> impl actix_web::dev::HttpServiceFactory {
    web::scope("/api/analytics")
        .wrap(ApiKeyAuth)
        .route("/overview", web::get().to(get_overview))
        .route("/daily-stats", web::get().to(get_daily_stats))
        .route("/daily-stats", web::post().to(post_daily_stats))
        .route("/geographic-stats", web::get().to(get_geographic_stats))
        .route("/geographic-stats", web::post().to(post_geographic_stats))
        .route("/referral-channels", web::get().to(get_referral_channels))
        .route("/referral-channels", web::post().to(post_referral_channel))
        .route("/export", web::get().to(export_dataset))
}

/// Health 路由 `/health`
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
