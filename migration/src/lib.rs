pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m020250601_000001_initial_tables;
mod m020250614_000001_stats_tables;
mod m020250702_000001_referral_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m020250601_000001_initial_tables::Migration),
            Box::new(m020250614_000001_stats_tables::Migration),
            Box::new(m020250702_000001_referral_indexes::Migration),
        ]
    }
}
