//! WaitlistService 集成测试
//!
//! 覆盖 create_entry（校验、推荐码生成、推荐人计数）、
//! lookup_referral（隐私过滤、缓存）、用户注册/校验。

use std::sync::{Arc, Once};

use tempfile::TempDir;

use launchlist::cache::NullReferralCache;
use launchlist::config::{StaticConfig, init_config_with};
use launchlist::errors::LaunchlistError;
use launchlist::services::{CreateEntryRequest, WaitlistService};
use launchlist::storage::{SeaOrmStorage, UserType};

// =============================================================================
// 全局初始化
// =============================================================================

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config_with(StaticConfig::default());
    });
}

async fn create_service() -> (WaitlistService, Arc<SeaOrmStorage>, TempDir) {
    init_static_config();
    let td = TempDir::new().unwrap();
    let p = td.path().join("waitlist_svc_test.db");
    let u = format!("sqlite://{}?mode=rwc", p.display());
    let storage = Arc::new(SeaOrmStorage::new(&u, "sqlite").await.unwrap());
    let service = WaitlistService::new(storage.clone(), Arc::new(NullReferralCache));
    (service, storage, td)
}

fn signup(full_name: &str, email: &str) -> CreateEntryRequest {
    CreateEntryRequest {
        full_name: full_name.to_string(),
        email: email.to_string(),
        ..Default::default()
    }
}

// =============================================================================
// create_entry
// =============================================================================

#[tokio::test]
async fn test_create_entry_generates_code() {
    let (service, _storage, _td) = create_service().await;

    let entry = service.create_entry(signup("Ann", "ann@x.com")).await.unwrap();
    assert_eq!(entry.full_name, "Ann");
    assert_eq!(entry.email, "ann@x.com");
    assert_eq!(entry.referral_count, 0);
    assert_eq!(entry.user_type, UserType::User);
    // 生成的推荐码：8-10 位大写字母数字
    assert!((8..=10).contains(&entry.referral_code.len()));
    assert!(
        entry
            .referral_code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    );
}

#[tokio::test]
async fn test_create_entry_normalizes_email() {
    let (service, _storage, _td) = create_service().await;

    let entry = service
        .create_entry(signup("Ann", "  Ann@Example.COM "))
        .await
        .unwrap();
    assert_eq!(entry.email, "ann@example.com");
}

#[tokio::test]
async fn test_create_entry_rejects_bad_input() {
    let (service, _storage, _td) = create_service().await;

    let err = service.create_entry(signup("", "ann@x.com")).await.unwrap_err();
    assert!(matches!(err, LaunchlistError::Validation(_)));

    let err = service.create_entry(signup("Ann", "not-an-email")).await.unwrap_err();
    assert!(matches!(err, LaunchlistError::Validation(_)));

    let mut req = signup("Ann", "ann@x.com");
    req.user_type = Some("wizard".to_string());
    let err = service.create_entry(req).await.unwrap_err();
    assert!(matches!(err, LaunchlistError::Validation(_)));
}

#[tokio::test]
async fn test_duplicate_email_conflict_and_count_unchanged() {
    let (service, storage, _td) = create_service().await;

    service.create_entry(signup("Ann", "ann@x.com")).await.unwrap();
    let err = service
        .create_entry(signup("Ann Again", "ann@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchlistError::DuplicateEmail(_)));
    assert_eq!(storage.count_entries().await.unwrap(), 1);
}

#[tokio::test]
async fn test_referral_chain_accumulates() {
    let (service, _storage, _td) = create_service().await;

    let ann = service.create_entry(signup("Ann", "ann@x.com")).await.unwrap();

    let mut bob = signup("Bob", "bob@x.com");
    bob.referred_by = Some(ann.referral_code.clone());
    service.create_entry(bob).await.unwrap();

    let lookup = service.lookup_referral(&ann.referral_code).await.unwrap();
    assert_eq!(lookup.referral_count, 1);

    let mut eve = signup("Eve", "eve@x.com");
    eve.referred_by = Some(ann.referral_code.clone());
    service.create_entry(eve).await.unwrap();

    // 第二次引用后累加为 2，而不是停在 1
    let lookup = service.lookup_referral(&ann.referral_code).await.unwrap();
    assert_eq!(lookup.referral_count, 2);
}

#[tokio::test]
async fn test_referred_by_is_case_insensitive() {
    let (service, _storage, _td) = create_service().await;

    let ann = service.create_entry(signup("Ann", "ann@x.com")).await.unwrap();

    let mut bob = signup("Bob", "bob@x.com");
    bob.referred_by = Some(ann.referral_code.to_lowercase());
    service.create_entry(bob).await.unwrap();

    let lookup = service.lookup_referral(&ann.referral_code).await.unwrap();
    assert_eq!(lookup.referral_count, 1);
}

#[tokio::test]
async fn test_unknown_referrer_still_creates_entry() {
    let (service, storage, _td) = create_service().await;

    let mut req = signup("Ann", "ann@x.com");
    req.referred_by = Some("NOSUCH999".to_string());
    let entry = service.create_entry(req).await.unwrap();
    assert_eq!(entry.email, "ann@x.com");
    assert_eq!(storage.count_entries().await.unwrap(), 1);
}

#[tokio::test]
async fn test_seeded_code_is_preserved() {
    let (service, _storage, _td) = create_service().await;

    let mut req = signup("Ann", "ann@x.com");
    req.referral_code = Some("legacy01".to_string());
    let entry = service.create_entry(req).await.unwrap();
    // 历史码大写入库
    assert_eq!(entry.referral_code, "LEGACY01");
}

#[tokio::test]
async fn test_codes_are_unique_across_entries() {
    let (service, _storage, _td) = create_service().await;

    let mut codes = std::collections::HashSet::new();
    for i in 0..20 {
        let entry = service
            .create_entry(signup("User", &format!("user{}@x.com", i)))
            .await
            .unwrap();
        assert!(
            codes.insert(entry.referral_code.clone()),
            "duplicate code generated: {}",
            entry.referral_code
        );
    }
}

// =============================================================================
// lookup_referral
// =============================================================================

#[tokio::test]
async fn test_lookup_is_privacy_filtered() {
    let (service, _storage, _td) = create_service().await;

    let entry = service.create_entry(signup("Ann", "ann@x.com")).await.unwrap();
    let lookup = service.lookup_referral(&entry.referral_code).await.unwrap();

    assert_eq!(lookup.full_name, "Ann");
    assert_eq!(lookup.referral_code, entry.referral_code);
    // 序列化结果里不允许出现邮箱
    let json = serde_json::to_string(&lookup).unwrap();
    assert!(!json.contains("ann@x.com"));
}

#[tokio::test]
async fn test_lookup_unknown_code_not_found() {
    let (service, _storage, _td) = create_service().await;

    let err = service.lookup_referral("NOSUCH999").await.unwrap_err();
    assert!(matches!(err, LaunchlistError::NotFound(_)));
}

#[tokio::test]
async fn test_lookup_invalid_format_rejected() {
    let (service, _storage, _td) = create_service().await;

    let err = service.lookup_referral("???").await.unwrap_err();
    assert!(matches!(err, LaunchlistError::Validation(_)));
}

// =============================================================================
// 用户注册/校验
// =============================================================================

#[tokio::test]
async fn test_register_and_verify_user() {
    let (service, storage, _td) = create_service().await;

    service.register_user("admin", "correct horse battery").await.unwrap();

    // 密码以 Argon2 哈希入库，不是明文
    let stored = storage.find_user_by_username("admin").await.unwrap().unwrap();
    assert!(stored.password.starts_with("$argon2"));
    assert_ne!(stored.password, "correct horse battery");

    assert!(service.verify_user("admin", "correct horse battery").await.unwrap());
    assert!(!service.verify_user("admin", "wrong password").await.unwrap());
    assert!(!service.verify_user("ghost", "whatever").await.unwrap());
}

#[tokio::test]
async fn test_register_user_validation() {
    let (service, _storage, _td) = create_service().await;

    let err = service.register_user("", "longenoughpassword").await.unwrap_err();
    assert!(matches!(err, LaunchlistError::Validation(_)));

    let err = service.register_user("admin", "short").await.unwrap_err();
    assert!(matches!(err, LaunchlistError::Validation(_)));
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let (service, _storage, _td) = create_service().await;

    service.register_user("admin", "longenoughpassword").await.unwrap();
    let err = service
        .register_user("admin", "anotherpassword1")
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchlistError::DuplicateResource(_)));
}
