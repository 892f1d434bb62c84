//! Analytics service layer
//!
//! Provides unified business logic for analytics queries, shared between
//! the HTTP API and the seed CLI.
//!
//! Overview 由多条独立查询拼装，不构成事务快照——与各子查询单独
//! 执行的原始行为一致。

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::LaunchlistError;
use crate::storage::{
    DailyStatsRecord, GeographicStatsRecord, ReferralChannelRecord, SeaOrmStorage,
};

use migration::entities::{daily_stats, geographic_stats, referral_channel};

// ============ 公共类型定义 ============

/// Top 推荐人（隐私过滤，不含邮箱）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopReferrer {
    pub full_name: String,
    pub referral_code: String,
    pub referral_count: i64,
}

/// 地区统计行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionStats {
    pub region: String,
    pub user_count: i64,
    pub engagement_score: i32,
}

/// 渠道统计行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStats {
    pub channel_name: String,
    pub referral_count: i64,
    pub conversion_rate: i32,
}

/// 每日统计行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub signup_count: i64,
    pub total_referrals: i64,
    pub conversion_rate: i32,
}

/// Overview 聚合结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewData {
    pub total_signups: u64,
    pub total_referrals: i64,
    pub avg_referrals_per_user: f64,
    pub top_referrers: Vec<TopReferrer>,
    pub top_regions: Vec<RegionStats>,
    pub top_channels: Vec<ChannelStats>,
}

/// 导出数据集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportDataset {
    #[default]
    Waitlist,
    DailyStats,
    GeographicStats,
    ReferralChannels,
    Summary,
}

impl std::str::FromStr for ExportDataset {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "waitlist" => Ok(Self::Waitlist),
            "daily" | "daily-stats" => Ok(Self::DailyStats),
            "geographic" | "geographic-stats" => Ok(Self::GeographicStats),
            "channels" | "referral-channels" => Ok(Self::ReferralChannels),
            "summary" => Ok(Self::Summary),
            _ => Err(format!(
                "Unknown dataset: '{}'. Valid: waitlist, daily, geographic, channels, summary",
                s
            )),
        }
    }
}

/// 等待名单导出行（管理端导出，含邮箱）
#[derive(Debug, Clone, Serialize)]
struct WaitlistCsvRow {
    full_name: String,
    email: String,
    referral_code: String,
    referred_by: String,
    referral_count: i64,
    user_type: String,
    created_at: String,
}

// ============ AnalyticsService ============

/// Analytics 服务
pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
}

impl AnalyticsService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 严格解析日期范围，解析失败时返回错误
    ///
    /// 支持 YYYY-MM-DD 和 RFC3339（取日期部分）。两端都缺省时
    /// 回退到最近 30 天。
    pub fn parse_date_range_strict(
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<(NaiveDate, NaiveDate), LaunchlistError> {
        match (start_date, end_date) {
            (Some(s), Some(e)) => {
                let start = Self::parse_date(s).ok_or_else(|| {
                    LaunchlistError::date_parse(format!(
                        "Invalid start date format: '{}'. Supported formats: RFC3339 or YYYY-MM-DD",
                        s
                    ))
                })?;
                let end = Self::parse_date(e).ok_or_else(|| {
                    LaunchlistError::date_parse(format!(
                        "Invalid end date format: '{}'. Supported formats: RFC3339 or YYYY-MM-DD",
                        e
                    ))
                })?;
                if start > end {
                    return Err(LaunchlistError::validation(
                        "Start date must not be later than end date",
                    ));
                }
                Ok((start, end))
            }
            (Some(_), None) => Err(LaunchlistError::validation(
                "Start date is provided but end date is missing",
            )),
            (None, Some(_)) => Err(LaunchlistError::validation(
                "End date is provided but start date is missing",
            )),
            (None, None) => Ok(Self::default_date_range()),
        }
    }

    fn parse_date(s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().or_else(|| {
            chrono::DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.date_naive())
        })
    }

    fn default_date_range() -> (NaiveDate, NaiveDate) {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(30);
        (start, end)
    }

    /// 获取 overview 聚合
    pub async fn overview(&self) -> Result<OverviewData, LaunchlistError> {
        let total_signups = self.storage.count_entries().await?;
        let total_referrals = self.storage.sum_referrals().await?;

        // 无人注册时平均数取 0，避免除零
        let avg_referrals_per_user = if total_signups == 0 {
            0.0
        } else {
            total_referrals as f64 / total_signups as f64
        };

        let top_referrers = self
            .storage
            .top_referrers(10)
            .await?
            .into_iter()
            .map(|entry| TopReferrer {
                full_name: entry.full_name,
                referral_code: entry.referral_code,
                referral_count: entry.referral_count,
            })
            .collect();

        let top_regions = self
            .storage
            .top_regions(10)
            .await?
            .into_iter()
            .map(region_stats_from_model)
            .collect();

        let top_channels = self
            .storage
            .top_channels(10)
            .await?
            .into_iter()
            .map(channel_stats_from_model)
            .collect();

        Ok(OverviewData {
            total_signups,
            total_referrals,
            avg_referrals_per_user,
            top_referrers,
            top_regions,
            top_channels,
        })
    }

    /// 日期范围内的每日统计（升序）
    pub async fn daily_stats_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyStats>, LaunchlistError> {
        let rows = self.storage.daily_stats_range(start, end).await?;
        Ok(rows.into_iter().map(daily_stats_from_model).collect())
    }

    /// 最近 N 天的每日统计（降序）
    pub async fn latest_daily_stats(&self, limit: u64) -> Result<Vec<DailyStats>, LaunchlistError> {
        let limit = limit.clamp(1, 365);
        let rows = self.storage.latest_daily_stats(limit).await?;
        Ok(rows.into_iter().map(daily_stats_from_model).collect())
    }

    /// 每日统计 upsert
    pub async fn record_daily_stats(
        &self,
        record: DailyStatsRecord,
    ) -> Result<DailyStats, LaunchlistError> {
        if record.signup_count < 0 || record.total_referrals < 0 {
            return Err(LaunchlistError::validation(
                "signupCount and totalReferrals must be non-negative",
            ));
        }
        if !(0..=100).contains(&record.conversion_rate) {
            return Err(LaunchlistError::validation(
                "conversionRate must be a percentage between 0 and 100",
            ));
        }

        let model = self.storage.upsert_daily_stats(&record).await?;
        Ok(daily_stats_from_model(model))
    }

    /// 地区统计 upsert
    pub async fn record_geographic_stats(
        &self,
        record: GeographicStatsRecord,
    ) -> Result<RegionStats, LaunchlistError> {
        if record.region.trim().is_empty() {
            return Err(LaunchlistError::validation("region is required"));
        }
        if record.user_count < 0 {
            return Err(LaunchlistError::validation(
                "userCount must be non-negative",
            ));
        }
        if !(0..=100).contains(&record.engagement_score) {
            return Err(LaunchlistError::validation(
                "engagementScore must be between 0 and 100",
            ));
        }

        let model = self.storage.upsert_geographic_stats(&record).await?;
        Ok(region_stats_from_model(model))
    }

    /// 渠道统计 upsert
    pub async fn record_referral_channel(
        &self,
        record: ReferralChannelRecord,
    ) -> Result<ChannelStats, LaunchlistError> {
        if record.channel_name.trim().is_empty() {
            return Err(LaunchlistError::validation("channelName is required"));
        }
        if record.referral_count < 0 {
            return Err(LaunchlistError::validation(
                "referralCount must be non-negative",
            ));
        }
        if !(0..=100).contains(&record.conversion_rate) {
            return Err(LaunchlistError::validation(
                "conversionRate must be a percentage between 0 and 100",
            ));
        }

        let model = self.storage.upsert_referral_channel(&record).await?;
        Ok(channel_stats_from_model(model))
    }

    /// 地区统计 top-N
    pub async fn geographic_stats(&self, limit: u64) -> Result<Vec<RegionStats>, LaunchlistError> {
        let rows = self.storage.top_regions(limit.clamp(1, 100)).await?;
        Ok(rows.into_iter().map(region_stats_from_model).collect())
    }

    /// 渠道统计 top-N
    pub async fn referral_channels(&self, limit: u64) -> Result<Vec<ChannelStats>, LaunchlistError> {
        let rows = self.storage.top_channels(limit.clamp(1, 100)).await?;
        Ok(rows.into_iter().map(channel_stats_from_model).collect())
    }

    /// 导出指定数据集为 CSV，返回（文件名, CSV 内容）
    pub async fn export_dataset(
        &self,
        dataset: ExportDataset,
    ) -> Result<(String, String), LaunchlistError> {
        let (name, csv) = match dataset {
            ExportDataset::Waitlist => ("waitlist_entries", self.export_waitlist_csv().await?),
            ExportDataset::DailyStats => ("daily_stats", self.export_daily_csv().await?),
            ExportDataset::GeographicStats => {
                ("geographic_stats", self.export_geographic_csv().await?)
            }
            ExportDataset::ReferralChannels => {
                ("referral_channels", self.export_channels_csv().await?)
            }
            ExportDataset::Summary => ("summary", self.export_summary_csv().await?),
        };

        let filename = format!("{}_{}.csv", name, Utc::now().format("%Y%m%d_%H%M%S"));
        info!("Analytics: exported dataset '{}'", filename);
        Ok((filename, csv))
    }

    async fn export_waitlist_csv(&self) -> Result<String, LaunchlistError> {
        let entries = self.storage.all_entries().await?;
        let rows = entries.into_iter().map(|entry| WaitlistCsvRow {
            full_name: entry.full_name,
            email: entry.email,
            referral_code: entry.referral_code,
            referred_by: entry.referred_by.unwrap_or_default(),
            referral_count: entry.referral_count,
            user_type: entry.user_type.to_string(),
            created_at: entry.created_at.to_rfc3339(),
        });
        write_csv(rows)
    }

    async fn export_daily_csv(&self) -> Result<String, LaunchlistError> {
        let rows = self.storage.all_daily_stats().await?;
        write_csv(rows.into_iter().map(daily_stats_from_model))
    }

    async fn export_geographic_csv(&self) -> Result<String, LaunchlistError> {
        let rows = self.storage.all_geographic_stats().await?;
        write_csv(rows.into_iter().map(region_stats_from_model))
    }

    async fn export_channels_csv(&self) -> Result<String, LaunchlistError> {
        let rows = self.storage.all_referral_channels().await?;
        write_csv(rows.into_iter().map(channel_stats_from_model))
    }

    async fn export_summary_csv(&self) -> Result<String, LaunchlistError> {
        #[derive(Serialize)]
        struct SummaryRow {
            metric: &'static str,
            value: String,
        }

        let overview = self.overview().await?;
        let rows = vec![
            SummaryRow {
                metric: "total_signups",
                value: overview.total_signups.to_string(),
            },
            SummaryRow {
                metric: "total_referrals",
                value: overview.total_referrals.to_string(),
            },
            SummaryRow {
                metric: "avg_referrals_per_user",
                value: format!("{:.2}", overview.avg_referrals_per_user),
            },
            SummaryRow {
                metric: "exported_at",
                value: Utc::now().to_rfc3339(),
            },
        ];
        write_csv(rows.into_iter())
    }
}

// ============ 转换辅助 ============

fn daily_stats_from_model(model: daily_stats::Model) -> DailyStats {
    DailyStats {
        date: model.date,
        signup_count: model.signup_count,
        total_referrals: model.total_referrals,
        conversion_rate: model.conversion_rate,
    }
}

fn region_stats_from_model(model: geographic_stats::Model) -> RegionStats {
    RegionStats {
        region: model.region,
        user_count: model.user_count,
        engagement_score: model.engagement_score,
    }
}

fn channel_stats_from_model(model: referral_channel::Model) -> ChannelStats {
    ChannelStats {
        channel_name: model.channel_name,
        referral_count: model.referral_count,
        conversion_rate: model.conversion_rate,
    }
}

/// 将可序列化的行写成 CSV 字符串
fn write_csv<T, I>(rows: I) -> Result<String, LaunchlistError>
where
    T: Serialize,
    I: Iterator<Item = T>,
{
    let mut writer = csv::WriterBuilder::new().from_writer(vec![]);

    for row in rows {
        writer
            .serialize(&row)
            .map_err(|e| LaunchlistError::serialization(format!("Failed to write CSV row: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LaunchlistError::serialization(format!("Failed to finalize CSV: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| LaunchlistError::serialization(format!("CSV is not valid UTF-8: {}", e)))
}
