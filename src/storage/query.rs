//! 只读查询
//!
//! 条目查找与 analytics 聚合查询，供 WaitlistService / AnalyticsService 调用。

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};

use super::SeaOrmStorage;
use super::converters::model_to_entry;
use super::models::WaitlistEntry;
use crate::errors::{LaunchlistError, Result};

use migration::entities::{daily_stats, geographic_stats, referral_channel, user, waitlist_entry};

/// 聚合查询结果行
#[derive(Debug, FromQueryResult)]
struct SumRow {
    total: i64,
}

impl SeaOrmStorage {
    pub async fn find_by_email(&self, email: &str) -> Result<Option<WaitlistEntry>> {
        waitlist_entry::Entity::find()
            .filter(waitlist_entry::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map(|opt| opt.map(model_to_entry))
            .map_err(|e| LaunchlistError::database_operation(format!("按邮箱查询失败: {}", e)))
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<WaitlistEntry>> {
        waitlist_entry::Entity::find()
            .filter(waitlist_entry::Column::ReferralCode.eq(code))
            .one(&self.db)
            .await
            .map(|opt| opt.map(model_to_entry))
            .map_err(|e| LaunchlistError::database_operation(format!("按推荐码查询失败: {}", e)))
    }

    /// 等待名单总人数
    pub async fn count_entries(&self) -> Result<u64> {
        waitlist_entry::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("统计条目数失败: {}", e)))
    }

    /// 推荐总数（SUM(referral_count)）
    ///
    /// SUM 的返回类型三个后端各不相同，这里按后端 CAST 回整数。
    pub async fn sum_referrals(&self) -> Result<i64> {
        let sum_expr = match self.backend_name.as_str() {
            "sqlite" => "COALESCE(SUM(referral_count), 0)",
            "mysql" => "CAST(COALESCE(SUM(referral_count), 0) AS SIGNED)",
            _ => "CAST(COALESCE(SUM(referral_count), 0) AS BIGINT)",
        };

        let row = waitlist_entry::Entity::find()
            .select_only()
            .column_as(Expr::cust(sum_expr), "total")
            .into_model::<SumRow>()
            .one(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("推荐总数查询失败: {}", e)))?;

        Ok(row.map(|r| r.total).unwrap_or(0))
    }

    /// 推荐数最高的前 N 个条目
    pub async fn top_referrers(&self, limit: u64) -> Result<Vec<WaitlistEntry>> {
        waitlist_entry::Entity::find()
            .order_by_desc(waitlist_entry::Column::ReferralCount)
            .order_by_asc(waitlist_entry::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map(|models| models.into_iter().map(model_to_entry).collect())
            .map_err(|e| LaunchlistError::database_operation(format!("Top 推荐查询失败: {}", e)))
    }

    /// 全量条目（按创建时间升序，导出用）
    pub async fn all_entries(&self) -> Result<Vec<WaitlistEntry>> {
        waitlist_entry::Entity::find()
            .order_by_asc(waitlist_entry::Column::CreatedAt)
            .all(&self.db)
            .await
            .map(|models| models.into_iter().map(model_to_entry).collect())
            .map_err(|e| LaunchlistError::database_operation(format!("加载全部条目失败: {}", e)))
    }

    /// 日期范围内的每日统计，按日期升序
    pub async fn daily_stats_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<daily_stats::Model>> {
        daily_stats::Entity::find()
            .filter(daily_stats::Column::Date.gte(start))
            .filter(daily_stats::Column::Date.lte(end))
            .order_by_asc(daily_stats::Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("每日统计查询失败: {}", e)))
    }

    /// 最近 N 天的每日统计，按日期降序
    pub async fn latest_daily_stats(&self, limit: u64) -> Result<Vec<daily_stats::Model>> {
        daily_stats::Entity::find()
            .order_by_desc(daily_stats::Column::Date)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("每日统计查询失败: {}", e)))
    }

    /// 用户数最高的前 N 个地区
    pub async fn top_regions(&self, limit: u64) -> Result<Vec<geographic_stats::Model>> {
        geographic_stats::Entity::find()
            .order_by_desc(geographic_stats::Column::UserCount)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("地区统计查询失败: {}", e)))
    }

    /// 推荐数最高的前 N 个渠道
    pub async fn top_channels(&self, limit: u64) -> Result<Vec<referral_channel::Model>> {
        referral_channel::Entity::find()
            .order_by_desc(referral_channel::Column::ReferralCount)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("渠道统计查询失败: {}", e)))
    }

    /// 全量每日统计（导出用，按日期升序）
    pub async fn all_daily_stats(&self) -> Result<Vec<daily_stats::Model>> {
        daily_stats::Entity::find()
            .order_by_asc(daily_stats::Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("每日统计导出失败: {}", e)))
    }

    /// 全量地区统计（导出用）
    pub async fn all_geographic_stats(&self) -> Result<Vec<geographic_stats::Model>> {
        geographic_stats::Entity::find()
            .order_by_desc(geographic_stats::Column::UserCount)
            .all(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("地区统计导出失败: {}", e)))
    }

    /// 全量渠道统计（导出用）
    pub async fn all_referral_channels(&self) -> Result<Vec<referral_channel::Model>> {
        referral_channel::Entity::find()
            .order_by_desc(referral_channel::Column::ReferralCount)
            .all(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("渠道统计导出失败: {}", e)))
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("按用户名查询失败: {}", e)))
    }
}
