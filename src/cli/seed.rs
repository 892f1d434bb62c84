//! 等待名单 CSV 种子导入
//!
//! 逐行走 WaitlistService 的创建路径，历史推荐码原样保留；单行失败
//! 不中断整个导入，最后汇总成功/失败数。

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::cache::NullReferralCache;
use crate::runtime::startup::create_storage;
use crate::services::{CreateEntryRequest, WaitlistService};

/// CSV 行数据结构
#[derive(Debug, Clone, Deserialize)]
pub struct SeedCsvRow {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub referred_by: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
}

/// 执行种子导入
pub async fn run_seed(file: &Path, truncate: bool) -> Result<()> {
    let storage = create_storage().await?;
    // 种子导入不需要缓存
    let service = WaitlistService::new(storage.clone(), Arc::new(NullReferralCache));

    if truncate {
        let removed = storage
            .truncate_entries()
            .await
            .context("Failed to truncate waitlist")?;
        warn!("Truncated waitlist before seeding ({} rows)", removed);
    }

    let reader = std::fs::File::open(file)
        .with_context(|| format!("Failed to open seed file: {}", file.display()))?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(std::io::BufReader::new(reader));

    let mut success = 0usize;
    let mut failed = 0usize;

    for (row_idx, result) in csv_reader.deserialize::<SeedCsvRow>().enumerate() {
        let row_num = row_idx + 2; // CSV 行号（1-based，跳过 header）

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                failed += 1;
                error!("Row {}: CSV parse error: {}", row_num, e);
                continue;
            }
        };

        let request = CreateEntryRequest {
            full_name: row.full_name,
            email: row.email,
            referred_by: row.referred_by,
            user_type: row.user_type,
            metadata: None,
            referral_code: row.referral_code,
        };

        match service.create_entry(request).await {
            Ok(entry) => {
                success += 1;
                info!("Row {}: imported '{}'", row_num, entry.email);
            }
            Err(e) => {
                failed += 1;
                error!("Row {}: import failed: {}", row_num, e);
            }
        }
    }

    info!("Seed completed: {} imported, {} failed", success, failed);
    Ok(())
}
