use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 waitlist_entries 表
        manager
            .create_table(
                Table::create()
                    .table(WaitlistEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WaitlistEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WaitlistEntries::FullName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WaitlistEntries::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(WaitlistEntries::ReferralCode)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(WaitlistEntries::ReferredBy)
                            .string_len(16)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WaitlistEntries::ReferralCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WaitlistEntries::UserType)
                            .string_len(32)
                            .not_null()
                            .default("user"),
                    )
                    .col(ColumnDef::new(WaitlistEntries::Metadata).json().null())
                    .col(
                        ColumnDef::new(WaitlistEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建创建时间索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_waitlist_created_at")
                    .table(WaitlistEntries::Table)
                    .col(WaitlistEntries::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 创建 users 表（管理后台账号）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_waitlist_created_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(WaitlistEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WaitlistEntries {
    #[sea_orm(iden = "waitlist_entries")]
    Table,
    Id,
    FullName,
    Email,
    ReferralCode,
    ReferredBy,
    ReferralCount,
    UserType,
    Metadata,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Password,
}
