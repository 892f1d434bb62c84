//! 实体模型与领域模型之间的转换

use sea_orm::ActiveValue::Set;

use crate::storage::models::{NewWaitlistEntry, UserType, WaitlistEntry};

use migration::entities::waitlist_entry;

/// 将 Sea-ORM Model 转换为 WaitlistEntry
pub fn model_to_entry(model: waitlist_entry::Model) -> WaitlistEntry {
    WaitlistEntry {
        id: model.id,
        full_name: model.full_name,
        email: model.email,
        referral_code: model.referral_code,
        referred_by: model.referred_by,
        referral_count: model.referral_count.max(0),
        // 历史数据里未知的 user_type 按默认 user 处理
        user_type: model.user_type.parse::<UserType>().unwrap_or_default(),
        metadata: model.metadata,
        created_at: model.created_at,
    }
}

/// 将 NewWaitlistEntry 转换为 ActiveModel（用于插入）
pub fn new_entry_to_active_model(
    entry: &NewWaitlistEntry,
    created_at: chrono::DateTime<chrono::Utc>,
) -> waitlist_entry::ActiveModel {
    waitlist_entry::ActiveModel {
        full_name: Set(entry.full_name.clone()),
        email: Set(entry.email.clone()),
        referral_code: Set(entry.referral_code.clone()),
        referred_by: Set(entry.referred_by.clone()),
        referral_count: Set(0),
        user_type: Set(entry.user_type.to_string()),
        metadata: Set(entry.metadata.clone()),
        created_at: Set(created_at),
        ..Default::default()
    }
}
