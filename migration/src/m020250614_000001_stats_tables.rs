//! 统计汇总表迁移
//!
//! 创建三张按自然键 upsert 的汇总表：
//! - daily_waitlist_stats：每日注册/推荐统计
//! - geographic_stats：地区分布统计
//! - referral_channels：推荐渠道统计

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 daily_waitlist_stats 表
        manager
            .create_table(
                Table::create()
                    .table(DailyWaitlistStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyWaitlistStats::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DailyWaitlistStats::Date)
                            .date()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DailyWaitlistStats::SignupCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyWaitlistStats::TotalReferrals)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyWaitlistStats::ConversionRate)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(DailyWaitlistStats::Metadata).json().null())
                    .to_owned(),
            )
            .await?;

        // 创建 geographic_stats 表
        manager
            .create_table(
                Table::create()
                    .table(GeographicStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeographicStats::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GeographicStats::Region)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(GeographicStats::UserCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GeographicStats::EngagementScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 referral_channels 表
        manager
            .create_table(
                Table::create()
                    .table(ReferralChannels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReferralChannels::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReferralChannels::ChannelName)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ReferralChannels::ReferralCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ReferralChannels::ConversionRate)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 日期范围查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_daily_stats_date")
                    .table(DailyWaitlistStats::Table)
                    .col(DailyWaitlistStats::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_daily_stats_date").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ReferralChannels::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GeographicStats::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(DailyWaitlistStats::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DailyWaitlistStats {
    #[sea_orm(iden = "daily_waitlist_stats")]
    Table,
    Id,
    Date,
    SignupCount,
    TotalReferrals,
    ConversionRate,
    Metadata,
}

#[derive(DeriveIden)]
enum GeographicStats {
    #[sea_orm(iden = "geographic_stats")]
    Table,
    Id,
    Region,
    UserCount,
    EngagementScore,
}

#[derive(DeriveIden)]
enum ReferralChannels {
    #[sea_orm(iden = "referral_channels")]
    Table,
    Id,
    ChannelName,
    ReferralCount,
    ConversionRate,
}
