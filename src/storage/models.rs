use serde::{Deserialize, Serialize};

/// 等待名单用户类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    User,
    Developer,
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Developer => write!(f, "developer"),
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "developer" => Ok(Self::Developer),
            _ => Err(format!(
                "Invalid user type: '{}'. Valid: user, developer",
                s
            )),
        }
    }
}

/// 等待名单条目（领域模型）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub referral_count: i64,
    pub user_type: UserType,
    pub metadata: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 待插入的等待名单条目
///
/// referral_code 由服务层生成（或种子导入时沿用历史码）。
#[derive(Debug, Clone)]
pub struct NewWaitlistEntry {
    pub full_name: String,
    pub email: String,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub user_type: UserType,
    pub metadata: Option<serde_json::Value>,
}

/// 每日统计 upsert 载荷（按日期为自然键）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStatsRecord {
    pub date: chrono::NaiveDate,
    pub signup_count: i64,
    pub total_referrals: i64,
    pub conversion_rate: i32,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// 地区统计 upsert 载荷（按地区为自然键）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeographicStatsRecord {
    pub region: String,
    pub user_count: i64,
    pub engagement_score: i32,
}

/// 渠道统计 upsert 载荷（按渠道名为自然键）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralChannelRecord {
    pub channel_name: String,
    pub referral_count: i64,
    pub conversion_rate: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
