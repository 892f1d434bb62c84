//! HTTP API 集成测试
//!
//! 用 actix-web 的 test harness 打真实路由，覆盖注册/查询/analytics
//! 的状态码、响应信封和认证行为。

use std::sync::{Arc, Once};

use actix_web::{App, test, web};
use tempfile::TempDir;

use launchlist::api::routes::{analytics_routes, health_routes, public_routes};
use launchlist::api::services::AppStartTime;
use launchlist::cache::{MemoryReferralCache, ReferralCache};
use launchlist::config::{StaticConfig, init_config_with};
use launchlist::services::{AnalyticsService, ChatService, WaitlistService};
use launchlist::storage::SeaOrmStorage;

const TEST_API_KEY: &str = "test-admin-key-0123456789";

// =============================================================================
// 全局初始化
// =============================================================================

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        let mut config = StaticConfig::default();
        config.api.admin_api_key = TEST_API_KEY.to_string();
        init_config_with(config);
    });
}

struct TestCtx {
    storage: Arc<SeaOrmStorage>,
    waitlist: Arc<WaitlistService>,
    analytics: Arc<AnalyticsService>,
    chat: Arc<ChatService>,
    _td: TempDir,
}

async fn create_ctx() -> TestCtx {
    init_static_config();
    let td = TempDir::new().unwrap();
    let p = td.path().join("api_test.db");
    let u = format!("sqlite://{}?mode=rwc", p.display());
    let storage = Arc::new(SeaOrmStorage::new(&u, "sqlite").await.unwrap());
    let cache: Arc<dyn ReferralCache> = Arc::new(MemoryReferralCache::new());
    TestCtx {
        waitlist: Arc::new(WaitlistService::new(storage.clone(), cache)),
        analytics: Arc::new(AnalyticsService::new(storage.clone())),
        chat: Arc::new(ChatService::new()),
        storage,
        _td: td,
    }
}

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx.storage.clone()))
                .app_data(web::Data::new($ctx.waitlist.clone()))
                .app_data(web::Data::new($ctx.analytics.clone()))
                .app_data(web::Data::new($ctx.chat.clone()))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .service(analytics_routes())
                .service(public_routes())
                .service(health_routes()),
        )
        .await
    };
}

fn peer() -> std::net::SocketAddr {
    "127.0.0.1:54321".parse().unwrap()
}

// =============================================================================
// POST /api/waitlist
// =============================================================================

#[actix_rt::test]
async fn test_post_waitlist_creates_entry() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/waitlist")
        .peer_addr(peer())
        .set_json(serde_json::json!({
            "fullName": "Ann",
            "email": "ann@x.com",
            "userType": "user"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "ann@x.com");
    assert_eq!(body["data"]["fullName"], "Ann");
    assert_eq!(body["data"]["userType"], "user");
    assert_eq!(body["data"]["referralCount"], 0);

    let code = body["data"]["referralCode"].as_str().unwrap();
    assert!((8..=10).contains(&code.len()));
    assert!(
        code.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    );
}

#[actix_rt::test]
async fn test_post_waitlist_duplicate_email_conflict() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let payload = serde_json::json!({ "fullName": "Ann", "email": "ann@x.com" });

    let req = test::TestRequest::post()
        .uri("/api/waitlist")
        .peer_addr(peer())
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/waitlist")
        .peer_addr(peer())
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);

    // 条目数没有增加
    assert_eq!(ctx.storage.count_entries().await.unwrap(), 1);
}

#[actix_rt::test]
async fn test_post_waitlist_validation_error() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/waitlist")
        .peer_addr(peer())
        .set_json(serde_json::json!({ "fullName": "Ann", "email": "not-an-email" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn test_post_waitlist_referral_credits_referrer() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/waitlist")
        .peer_addr(peer())
        .set_json(serde_json::json!({ "fullName": "Ann", "email": "ann@x.com" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let ann_code = body["data"]["referralCode"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/waitlist")
        .peer_addr(peer())
        .set_json(serde_json::json!({
            "fullName": "Bob",
            "email": "bob@x.com",
            "referredBy": ann_code.clone()
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/referral/{}", ann_code))
        .peer_addr(peer())
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["referralCount"], 1);
}

// =============================================================================
// GET /api/referral/{code}
// =============================================================================

#[actix_rt::test]
async fn test_get_referral_has_no_email() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/waitlist")
        .peer_addr(peer())
        .set_json(serde_json::json!({ "fullName": "Ann", "email": "ann@x.com" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let code = body["data"]["referralCode"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/referral/{}", code))
        .peer_addr(peer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["referralCode"], code);
    assert_eq!(body["data"]["fullName"], "Ann");
    assert!(body["data"].get("email").is_none());
}

#[actix_rt::test]
async fn test_get_referral_unknown_is_404() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/referral/NOSUCH999")
        .peer_addr(peer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}

// =============================================================================
// Analytics 认证
// =============================================================================

#[actix_rt::test]
async fn test_analytics_requires_api_key() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/analytics/overview")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/analytics/overview")
        .insert_header(("x-api-key", "wrong-key"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_analytics_overview_with_key() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/analytics/overview")
        .insert_header(("x-api-key", TEST_API_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total_signups"], 0);
    assert_eq!(body["data"]["avg_referrals_per_user"], 0.0);
}

// =============================================================================
// Analytics upsert + 查询
// =============================================================================

#[actix_rt::test]
async fn test_analytics_daily_stats_roundtrip() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/analytics/daily-stats")
        .insert_header(("x-api-key", TEST_API_KEY))
        .set_json(serde_json::json!({
            "date": "2025-07-01",
            "signupCount": 12,
            "totalReferrals": 4,
            "conversionRate": 33
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    // 同一日期再次 upsert：仍是 201，行数不变
    let req = test::TestRequest::post()
        .uri("/api/analytics/daily-stats")
        .insert_header(("x-api-key", TEST_API_KEY))
        .set_json(serde_json::json!({
            "date": "2025-07-01",
            "signupCount": 20,
            "totalReferrals": 5,
            "conversionRate": 40
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/analytics/daily-stats?limit=10")
        .insert_header(("x-api-key", TEST_API_KEY))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["signup_count"], 20);
}

#[actix_rt::test]
async fn test_analytics_geographic_stats_upsert() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/analytics/geographic-stats")
        .insert_header(("x-api-key", TEST_API_KEY))
        .set_json(serde_json::json!({
            "region": "Europe",
            "userCount": 10,
            "engagementScore": 75
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/analytics/geographic-stats")
        .insert_header(("x-api-key", TEST_API_KEY))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["region"], "Europe");
}

#[actix_rt::test]
async fn test_analytics_export_csv() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/analytics/export?dataset=summary")
        .insert_header(("x-api-key", TEST_API_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let content_type = resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("total_signups"));
}

// =============================================================================
// Chat 端点
// =============================================================================

#[actix_rt::test]
async fn test_chat_endpoints() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/api/ai/chat").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert!(!body["data"]["sessionId"].as_str().unwrap().is_empty());

    let req = test::TestRequest::post()
        .uri("/api/ai/message")
        .set_json(serde_json::json!({
            "sessionId": "abc",
            "message": "how do referrals work?"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["sessionId"], "abc");
    assert!(
        body["data"]["reply"]
            .as_str()
            .unwrap()
            .to_lowercase()
            .contains("referral")
    );
}

// =============================================================================
// 用户注册/登录
// =============================================================================

#[actix_rt::test]
async fn test_auth_register_and_login() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({ "username": "admin", "password": "longenoughpassword" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({ "username": "admin", "password": "longenoughpassword" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({ "username": "admin", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Health
// =============================================================================

#[actix_rt::test]
async fn test_health_check() {
    let ctx = create_ctx().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");

    let req = test::TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NO_CONTENT);
}
