//! Mutation operations for SeaOrmStorage
//!
//! 所有写路径：条目创建（含推荐人计数）、统计表 upsert、用户创建。

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ExprTrait, QueryFilter,
    TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use sea_orm::ActiveValue::Set;
use tracing::{info, warn};

use super::SeaOrmStorage;
use super::converters::{model_to_entry, new_entry_to_active_model};
use super::models::{
    DailyStatsRecord, GeographicStatsRecord, NewWaitlistEntry, ReferralChannelRecord,
    WaitlistEntry,
};
use super::retry;
use crate::errors::{LaunchlistError, Result};

use migration::entities::{daily_stats, geographic_stats, referral_channel, user, waitlist_entry};

/// 判断是否是唯一约束冲突错误
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    match err {
        DbErr::Exec(sea_orm::error::RuntimeErr::SqlxError(sqlx_err))
        | DbErr::Query(sea_orm::error::RuntimeErr::SqlxError(sqlx_err)) => {
            use std::ops::Deref;
            if let Some(db_err) = sqlx_err.deref().as_database_error() {
                let code = db_err.code();
                // SQLite: SQLITE_CONSTRAINT (code 2067)
                // MySQL: ER_DUP_ENTRY (code 1062)
                // PostgreSQL: unique_violation (code 23505)
                return code
                    .as_ref()
                    .map(|c| {
                        c == "2067"  // SQLite
                            || c == "1062"  // MySQL
                            || c == "23505" // PostgreSQL
                    })
                    .unwrap_or(false);
            }
            false
        }
        _ => false,
    }
}

/// 推荐人计数 +1，单条原子 UPDATE
///
/// rows_affected 同时充当存在性检查：0 表示推荐码不存在。
async fn credit_referrer<C: ConnectionTrait>(conn: &C, code: &str) -> Result<u64> {
    let result = waitlist_entry::Entity::update_many()
        .col_expr(
            waitlist_entry::Column::ReferralCount,
            Expr::col(waitlist_entry::Column::ReferralCount).add(1),
        )
        .filter(waitlist_entry::Column::ReferralCode.eq(code))
        .exec(conn)
        .await
        .map_err(|e| {
            LaunchlistError::database_operation(format!("推荐计数更新失败 {}: {}", code, e))
        })?;

    Ok(result.rows_affected)
}

impl SeaOrmStorage {
    /// 创建等待名单条目
    ///
    /// 插入新行和推荐人计数在同一事务内完成。唯一冲突被转换为
    /// 带类型的错误：邮箱重复返回 DuplicateEmail，推荐码撞车返回
    /// DuplicateReferralCode（调用方据此换码重试）。
    pub async fn create_entry(&self, new_entry: &NewWaitlistEntry) -> Result<WaitlistEntry> {
        let txn = self.db.begin().await.map_err(|e| {
            LaunchlistError::database_operation(format!("开始事务失败: {}", e))
        })?;

        let active_model = new_entry_to_active_model(new_entry, Utc::now());

        let model = match active_model.insert(&txn).await {
            Ok(model) => model,
            Err(e) if is_unique_violation(&e) => {
                let _ = txn.rollback().await;
                return Err(self.classify_duplicate(new_entry).await);
            }
            Err(e) => {
                let _ = txn.rollback().await;
                return Err(LaunchlistError::database_operation(format!(
                    "插入等待名单条目失败: {}",
                    e
                )));
            }
        };

        if let Some(ref referrer_code) = new_entry.referred_by {
            let credited = match credit_referrer(&txn, referrer_code).await {
                Ok(n) => n,
                Err(e) => {
                    let _ = txn.rollback().await;
                    return Err(e);
                }
            };
            if credited == 0 {
                // 未知推荐码不阻断注册，条目照常落库
                warn!(
                    "Unknown referral code '{}' on signup '{}'",
                    referrer_code, new_entry.email
                );
            }
        }

        txn.commit()
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Waitlist entry created: {}", model.referral_code);
        Ok(model_to_entry(model))
    }

    /// 冲突已经发生，事后区分撞的是哪个唯一键
    async fn classify_duplicate(&self, new_entry: &NewWaitlistEntry) -> LaunchlistError {
        let existing = waitlist_entry::Entity::find()
            .filter(waitlist_entry::Column::Email.eq(&new_entry.email))
            .one(&self.db)
            .await;

        match existing {
            Ok(Some(_)) => LaunchlistError::duplicate_email(format!(
                "Email already on the waitlist: {}",
                new_entry.email
            )),
            _ => LaunchlistError::duplicate_referral_code(format!(
                "Referral code collision: {}",
                new_entry.referral_code
            )),
        }
    }

    /// 每日统计 upsert（按日期，原子 ON CONFLICT）
    pub async fn upsert_daily_stats(
        &self,
        record: &DailyStatsRecord,
    ) -> Result<daily_stats::Model> {
        let db = &self.db;

        retry::with_retry(
            &format!("upsert_daily_stats({})", record.date),
            self.retry_config,
            || async {
                let active_model = daily_stats::ActiveModel {
                    date: Set(record.date),
                    signup_count: Set(record.signup_count),
                    total_referrals: Set(record.total_referrals),
                    conversion_rate: Set(record.conversion_rate),
                    metadata: Set(record.metadata.clone()),
                    ..Default::default()
                };

                daily_stats::Entity::insert(active_model)
                    .on_conflict(
                        OnConflict::column(daily_stats::Column::Date)
                            .update_columns([
                                daily_stats::Column::SignupCount,
                                daily_stats::Column::TotalReferrals,
                                daily_stats::Column::ConversionRate,
                                daily_stats::Column::Metadata,
                            ])
                            .to_owned(),
                    )
                    .exec(db)
                    .await
                    .map(|_| ())
            },
        )
        .await
        .map_err(|e| LaunchlistError::database_operation(format!("Upsert 每日统计失败: {}", e)))?;

        // 取回 upsert 后的行
        daily_stats::Entity::find()
            .filter(daily_stats::Column::Date.eq(record.date))
            .one(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("查询每日统计失败: {}", e)))?
            .ok_or_else(|| {
                LaunchlistError::database_operation(format!(
                    "Upsert 后未找到每日统计行: {}",
                    record.date
                ))
            })
    }

    /// 地区统计 upsert（按地区）
    pub async fn upsert_geographic_stats(
        &self,
        record: &GeographicStatsRecord,
    ) -> Result<geographic_stats::Model> {
        let db = &self.db;

        retry::with_retry(
            &format!("upsert_geographic_stats({})", record.region),
            self.retry_config,
            || async {
                let active_model = geographic_stats::ActiveModel {
                    region: Set(record.region.clone()),
                    user_count: Set(record.user_count),
                    engagement_score: Set(record.engagement_score),
                    ..Default::default()
                };

                geographic_stats::Entity::insert(active_model)
                    .on_conflict(
                        OnConflict::column(geographic_stats::Column::Region)
                            .update_columns([
                                geographic_stats::Column::UserCount,
                                geographic_stats::Column::EngagementScore,
                            ])
                            .to_owned(),
                    )
                    .exec(db)
                    .await
                    .map(|_| ())
            },
        )
        .await
        .map_err(|e| LaunchlistError::database_operation(format!("Upsert 地区统计失败: {}", e)))?;

        geographic_stats::Entity::find()
            .filter(geographic_stats::Column::Region.eq(&record.region))
            .one(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("查询地区统计失败: {}", e)))?
            .ok_or_else(|| {
                LaunchlistError::database_operation(format!(
                    "Upsert 后未找到地区统计行: {}",
                    record.region
                ))
            })
    }

    /// 渠道统计 upsert（按渠道名）
    pub async fn upsert_referral_channel(
        &self,
        record: &ReferralChannelRecord,
    ) -> Result<referral_channel::Model> {
        let db = &self.db;

        retry::with_retry(
            &format!("upsert_referral_channel({})", record.channel_name),
            self.retry_config,
            || async {
                let active_model = referral_channel::ActiveModel {
                    channel_name: Set(record.channel_name.clone()),
                    referral_count: Set(record.referral_count),
                    conversion_rate: Set(record.conversion_rate),
                    ..Default::default()
                };

                referral_channel::Entity::insert(active_model)
                    .on_conflict(
                        OnConflict::column(referral_channel::Column::ChannelName)
                            .update_columns([
                                referral_channel::Column::ReferralCount,
                                referral_channel::Column::ConversionRate,
                            ])
                            .to_owned(),
                    )
                    .exec(db)
                    .await
                    .map(|_| ())
            },
        )
        .await
        .map_err(|e| LaunchlistError::database_operation(format!("Upsert 渠道统计失败: {}", e)))?;

        referral_channel::Entity::find()
            .filter(referral_channel::Column::ChannelName.eq(&record.channel_name))
            .one(&self.db)
            .await
            .map_err(|e| LaunchlistError::database_operation(format!("查询渠道统计失败: {}", e)))?
            .ok_or_else(|| {
                LaunchlistError::database_operation(format!(
                    "Upsert 后未找到渠道统计行: {}",
                    record.channel_name
                ))
            })
    }

    /// 创建管理后台用户（密码由调用方先行哈希）
    pub async fn create_user(&self, username: &str, password_hash: &str) -> Result<user::Model> {
        let active_model = user::ActiveModel {
            username: Set(username.to_string()),
            password: Set(password_hash.to_string()),
            ..Default::default()
        };

        match active_model.insert(&self.db).await {
            Ok(model) => {
                info!("User created: {}", model.username);
                Ok(model)
            }
            Err(e) if is_unique_violation(&e) => Err(LaunchlistError::duplicate_resource(
                format!("Username already exists: {}", username),
            )),
            Err(e) => Err(LaunchlistError::database_operation(format!(
                "创建用户失败: {}",
                e
            ))),
        }
    }

    /// 清空等待名单（仅种子导入的 --truncate 路径使用）
    pub async fn truncate_entries(&self) -> Result<u64> {
        let result = waitlist_entry::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| {
                LaunchlistError::database_operation(format!("清空等待名单失败: {}", e))
            })?;

        warn!("Truncated waitlist: {} entries removed", result.rows_affected);
        Ok(result.rows_affected)
    }
}
