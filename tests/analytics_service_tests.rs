//! AnalyticsService 集成测试
//!
//! 覆盖 overview（含除零保护）、日期范围解析、每日/地区/渠道
//! upsert 校验、CSV 导出。

use std::sync::{Arc, Once};

use tempfile::TempDir;

use launchlist::cache::NullReferralCache;
use launchlist::config::{StaticConfig, init_config_with};
use launchlist::errors::LaunchlistError;
use launchlist::services::{
    AnalyticsService, CreateEntryRequest, ExportDataset, WaitlistService,
};
use launchlist::storage::{
    DailyStatsRecord, GeographicStatsRecord, ReferralChannelRecord, SeaOrmStorage,
};

// =============================================================================
// 全局初始化
// =============================================================================

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config_with(StaticConfig::default());
    });
}

async fn create_services() -> (AnalyticsService, WaitlistService, TempDir) {
    init_static_config();
    let td = TempDir::new().unwrap();
    let p = td.path().join("analytics_svc_test.db");
    let u = format!("sqlite://{}?mode=rwc", p.display());
    let storage = Arc::new(SeaOrmStorage::new(&u, "sqlite").await.unwrap());
    let analytics = AnalyticsService::new(storage.clone());
    let waitlist = WaitlistService::new(storage, Arc::new(NullReferralCache));
    (analytics, waitlist, td)
}

async fn seed_entries(waitlist: &WaitlistService) -> String {
    let ann = waitlist
        .create_entry(CreateEntryRequest {
            full_name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    for (name, email) in [("Bob", "bob@x.com"), ("Eve", "eve@x.com")] {
        waitlist
            .create_entry(CreateEntryRequest {
                full_name: name.to_string(),
                email: email.to_string(),
                referred_by: Some(ann.referral_code.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    ann.referral_code
}

// =============================================================================
// parse_date_range_strict
// =============================================================================

#[test]
fn test_parse_date_range_both_none_defaults_to_30_days() {
    let (start, end) = AnalyticsService::parse_date_range_strict(None, None).unwrap();
    assert_eq!((end - start).num_days(), 30);
}

#[test]
fn test_parse_date_range_yyyy_mm_dd() {
    let (start, end) =
        AnalyticsService::parse_date_range_strict(Some("2025-06-01"), Some("2025-06-30")).unwrap();
    assert_eq!(start.to_string(), "2025-06-01");
    assert_eq!(end.to_string(), "2025-06-30");
}

#[test]
fn test_parse_date_range_rfc3339() {
    let (start, end) = AnalyticsService::parse_date_range_strict(
        Some("2025-06-01T08:00:00Z"),
        Some("2025-06-30T20:00:00Z"),
    )
    .unwrap();
    assert_eq!(start.to_string(), "2025-06-01");
    assert_eq!(end.to_string(), "2025-06-30");
}

#[test]
fn test_parse_date_range_rejects_garbage() {
    let err =
        AnalyticsService::parse_date_range_strict(Some("not-a-date"), Some("2025-06-30"))
            .unwrap_err();
    assert!(matches!(err, LaunchlistError::DateParse(_)));
}

#[test]
fn test_parse_date_range_rejects_inverted() {
    let err =
        AnalyticsService::parse_date_range_strict(Some("2025-06-30"), Some("2025-06-01"))
            .unwrap_err();
    assert!(matches!(err, LaunchlistError::Validation(_)));
}

#[test]
fn test_parse_date_range_rejects_half_open() {
    assert!(AnalyticsService::parse_date_range_strict(Some("2025-06-01"), None).is_err());
    assert!(AnalyticsService::parse_date_range_strict(None, Some("2025-06-30")).is_err());
}

// =============================================================================
// overview
// =============================================================================

#[tokio::test]
async fn test_overview_empty_has_zero_average() {
    let (analytics, _waitlist, _td) = create_services().await;

    let overview = analytics.overview().await.unwrap();
    assert_eq!(overview.total_signups, 0);
    assert_eq!(overview.total_referrals, 0);
    // 零注册时平均数为 0，不抛除零
    assert_eq!(overview.avg_referrals_per_user, 0.0);
    assert!(overview.top_referrers.is_empty());
}

#[tokio::test]
async fn test_overview_with_referrals() {
    let (analytics, waitlist, _td) = create_services().await;
    let ann_code = seed_entries(&waitlist).await;

    let overview = analytics.overview().await.unwrap();
    assert_eq!(overview.total_signups, 3);
    assert_eq!(overview.total_referrals, 2);
    assert!((overview.avg_referrals_per_user - 2.0 / 3.0).abs() < 1e-9);

    assert_eq!(overview.top_referrers[0].referral_code, ann_code);
    assert_eq!(overview.top_referrers[0].referral_count, 2);

    // top_referrers 序列化结果不含邮箱
    let json = serde_json::to_string(&overview).unwrap();
    assert!(!json.contains("ann@x.com"));
}

// =============================================================================
// upsert 校验
// =============================================================================

#[tokio::test]
async fn test_record_daily_stats_validation() {
    let (analytics, _waitlist, _td) = create_services().await;
    let date = chrono::NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();

    let err = analytics
        .record_daily_stats(DailyStatsRecord {
            date,
            signup_count: -1,
            total_referrals: 0,
            conversion_rate: 0,
            metadata: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchlistError::Validation(_)));

    let err = analytics
        .record_daily_stats(DailyStatsRecord {
            date,
            signup_count: 0,
            total_referrals: 0,
            conversion_rate: 120,
            metadata: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchlistError::Validation(_)));
}

#[tokio::test]
async fn test_record_geographic_stats_roundtrip() {
    let (analytics, _waitlist, _td) = create_services().await;

    let region = analytics
        .record_geographic_stats(GeographicStatsRecord {
            region: "Asia Pacific".to_string(),
            user_count: 42,
            engagement_score: 88,
        })
        .await
        .unwrap();
    assert_eq!(region.region, "Asia Pacific");

    let err = analytics
        .record_geographic_stats(GeographicStatsRecord {
            region: "".to_string(),
            user_count: 1,
            engagement_score: 50,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchlistError::Validation(_)));

    let err = analytics
        .record_geographic_stats(GeographicStatsRecord {
            region: "Europe".to_string(),
            user_count: 1,
            engagement_score: 101,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchlistError::Validation(_)));
}

#[tokio::test]
async fn test_record_referral_channel_and_top() {
    let (analytics, _waitlist, _td) = create_services().await;

    for (name, count) in [("twitter", 40), ("discord", 90), ("newsletter", 10)] {
        analytics
            .record_referral_channel(ReferralChannelRecord {
                channel_name: name.to_string(),
                referral_count: count,
                conversion_rate: 10,
            })
            .await
            .unwrap();
    }

    let channels = analytics.referral_channels(2).await.unwrap();
    assert_eq!(channels.len(), 2);
    assert_eq!(channels[0].channel_name, "discord");
    assert_eq!(channels[1].channel_name, "twitter");
}

// =============================================================================
// 每日统计查询
// =============================================================================

#[tokio::test]
async fn test_daily_stats_range_and_latest() {
    let (analytics, _waitlist, _td) = create_services().await;

    for day in 1..=5 {
        analytics
            .record_daily_stats(DailyStatsRecord {
                date: chrono::NaiveDate::from_ymd_opt(2025, 7, day).unwrap(),
                signup_count: day as i64,
                total_referrals: 0,
                conversion_rate: 0,
                metadata: None,
            })
            .await
            .unwrap();
    }

    let range = analytics
        .daily_stats_range(
            chrono::NaiveDate::from_ymd_opt(2025, 7, 2).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(range.len(), 3);
    assert!(range.windows(2).all(|w| w[0].date < w[1].date));

    let latest = analytics.latest_daily_stats(3).await.unwrap();
    assert_eq!(latest.len(), 3);
    assert!(latest.windows(2).all(|w| w[0].date > w[1].date));
}

// =============================================================================
// CSV 导出
// =============================================================================

#[tokio::test]
async fn test_export_waitlist_csv() {
    let (analytics, waitlist, _td) = create_services().await;
    seed_entries(&waitlist).await;

    let (filename, csv) = analytics.export_dataset(ExportDataset::Waitlist).await.unwrap();
    assert!(filename.starts_with("waitlist_entries_"));
    assert!(filename.ends_with(".csv"));

    let mut lines = csv.lines();
    let header = lines.next().unwrap();
    assert!(header.contains("email"));
    assert!(header.contains("referral_code"));
    // header + 3 行数据
    assert_eq!(lines.count(), 3);
}

#[tokio::test]
async fn test_export_summary_csv() {
    let (analytics, waitlist, _td) = create_services().await;
    seed_entries(&waitlist).await;

    let (_filename, csv) = analytics.export_dataset(ExportDataset::Summary).await.unwrap();
    assert!(csv.contains("total_signups,3"));
    assert!(csv.contains("total_referrals,2"));
}

#[test]
fn test_export_dataset_parsing() {
    assert_eq!(
        "daily-stats".parse::<ExportDataset>().unwrap(),
        ExportDataset::DailyStats
    );
    assert_eq!(
        "waitlist".parse::<ExportDataset>().unwrap(),
        ExportDataset::Waitlist
    );
    assert!("bogus".parse::<ExportDataset>().is_err());
}
