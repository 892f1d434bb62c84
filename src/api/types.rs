//! API 类型定义
//!
//! 请求体沿用前端表单的 camelCase 字段名。

use serde::{Deserialize, Serialize};

use crate::storage::WaitlistEntry;

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// POST /api/waitlist 请求体
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostWaitlistEntry {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub referred_by: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// 新建条目响应
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntryResponse {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub referral_code: String,
    pub referral_count: i64,
    pub user_type: String,
}

impl From<WaitlistEntry> for WaitlistEntryResponse {
    fn from(entry: WaitlistEntry) -> Self {
        Self {
            id: entry.id,
            email: entry.email,
            full_name: entry.full_name,
            referral_code: entry.referral_code,
            referral_count: entry.referral_count,
            user_type: entry.user_type.to_string(),
        }
    }
}

/// 推荐码查询响应（隐私过滤，无邮箱）
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReferralResponse {
    pub full_name: String,
    pub referral_code: String,
    pub referral_count: i64,
}

/// GET /api/analytics/daily-stats 查询参数
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DailyStatsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<u64>,
}

/// POST /api/analytics/daily-stats 请求体
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostDailyStats {
    pub date: String,
    pub signup_count: i64,
    pub total_referrals: i64,
    pub conversion_rate: i32,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// POST /api/analytics/geographic-stats 请求体
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostGeographicStats {
    pub region: String,
    pub user_count: i64,
    pub engagement_score: i32,
}

/// POST /api/analytics/referral-channels 请求体
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostReferralChannel {
    pub channel_name: String,
    pub referral_count: i64,
    pub conversion_rate: i32,
}

/// top-N 查询参数
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TopQuery {
    pub limit: Option<u64>,
}

/// GET /api/analytics/export 查询参数
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExportQuery {
    pub dataset: Option<String>,
}

/// GET /api/ai/chat 查询参数
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// POST /api/ai/message 请求体
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostChatMessage {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

/// Chat 响应
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
}

/// 用户注册/登录请求体
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UserCredentials {
    pub username: String,
    pub password: String,
}
