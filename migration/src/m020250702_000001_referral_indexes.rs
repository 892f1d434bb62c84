//! 推荐查询索引迁移
//!
//! referred_by 用于按推荐码统计，referral_count 用于 top-N 排行查询。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_waitlist_referred_by")
                    .table(WaitlistEntries::Table)
                    .col(WaitlistEntries::ReferredBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_waitlist_referral_count")
                    .table(WaitlistEntries::Table)
                    .col(WaitlistEntries::ReferralCount)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_waitlist_referral_count").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_waitlist_referred_by").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WaitlistEntries {
    #[sea_orm(iden = "waitlist_entries")]
    Table,
    ReferredBy,
    ReferralCount,
}
