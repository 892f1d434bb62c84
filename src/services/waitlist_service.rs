//! Waitlist management service
//!
//! Provides unified business logic for signup and referral operations,
//! shared between HTTP handlers and the seed CLI.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cache::ReferralCache;
use crate::errors::LaunchlistError;
use crate::storage::{NewWaitlistEntry, SeaOrmStorage, UserType, WaitlistEntry};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::{
    generate_referral_code_salted, is_valid_email, is_valid_referral_code,
};

/// 推荐码冲突时的最大换码重试次数
const MAX_CODE_ATTEMPTS: u32 = 3;

// ============ Request/Response DTOs ============

/// Request to create a waitlist entry
#[derive(Debug, Clone, Default)]
pub struct CreateEntryRequest {
    pub full_name: String,
    pub email: String,
    /// 推荐人的推荐码（可选）
    pub referred_by: Option<String>,
    /// "user" 或 "developer"，缺省为 user
    pub user_type: Option<String>,
    /// 透传的表单附加字段（role、github_url 等）
    pub metadata: Option<serde_json::Value>,
    /// 种子导入时沿用的历史推荐码；线上路径始终为 None
    pub referral_code: Option<String>,
}

/// 推荐码查询结果（不含邮箱等隐私字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralLookup {
    pub full_name: String,
    pub referral_code: String,
    pub referral_count: i64,
}

// ============ WaitlistService ============

/// Service for waitlist signup and referral operations
pub struct WaitlistService {
    storage: Arc<SeaOrmStorage>,
    cache: Arc<dyn ReferralCache>,
}

impl WaitlistService {
    pub fn new(storage: Arc<SeaOrmStorage>, cache: Arc<dyn ReferralCache>) -> Self {
        Self { storage, cache }
    }

    /// 创建等待名单条目
    ///
    /// 校验入参、生成推荐码后落库；插入和推荐人计数在 Storage 层的
    /// 同一事务内完成。推荐码撞唯一约束时带盐换码重试，邮箱重复
    /// 直接向上抛 DuplicateEmail。
    pub async fn create_entry(
        &self,
        req: CreateEntryRequest,
    ) -> Result<WaitlistEntry, LaunchlistError> {
        let full_name = req.full_name.trim().to_string();
        if full_name.is_empty() || full_name.len() > 255 {
            return Err(LaunchlistError::validation(
                "fullName is required and must be at most 255 characters",
            ));
        }

        let email = req.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(LaunchlistError::validation(format!(
                "Invalid email address: '{}'",
                req.email
            )));
        }

        let user_type = match req.user_type.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => s
                .parse::<UserType>()
                .map_err(LaunchlistError::validation)?,
            None => UserType::default(),
        };

        let referred_by = match req.referred_by.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => {
                let code = code.to_uppercase();
                if !is_valid_referral_code(&code) {
                    return Err(LaunchlistError::validation(format!(
                        "Invalid referral code format: '{}'",
                        code
                    )));
                }
                Some(code)
            }
            _ => None,
        };

        // 种子导入沿用历史码；线上路径每次都重新生成
        let seeded_code = req.referral_code.as_deref().map(str::trim);
        if let Some(code) = seeded_code
            && !code.is_empty()
            && !is_valid_referral_code(&code.to_uppercase())
        {
            return Err(LaunchlistError::validation(format!(
                "Invalid seeded referral code: '{}'",
                code
            )));
        }

        let mut attempt: u32 = 0;
        loop {
            let referral_code = match seeded_code {
                Some(code) if !code.is_empty() => code.to_uppercase(),
                _ => {
                    let salt = if attempt == 0 { 0 } else { rand::random::<u32>() };
                    generate_referral_code_salted(&email, salt)
                }
            };

            let new_entry = NewWaitlistEntry {
                full_name: full_name.clone(),
                email: email.clone(),
                referral_code,
                referred_by: referred_by.clone(),
                user_type,
                metadata: req.metadata.clone(),
            };

            match self.storage.create_entry(&new_entry).await {
                Ok(entry) => {
                    // 推荐人的计数变了，踢掉缓存里的旧值
                    if let Some(ref code) = entry.referred_by {
                        self.cache.remove(code).await;
                    }
                    info!(
                        "WaitlistService: created entry '{}' with code '{}'",
                        entry.email, entry.referral_code
                    );
                    return Ok(entry);
                }
                Err(LaunchlistError::DuplicateReferralCode(msg))
                    if seeded_code.is_none() && attempt + 1 < MAX_CODE_ATTEMPTS =>
                {
                    attempt += 1;
                    warn!(
                        "Referral code collision (attempt {}/{}): {}",
                        attempt, MAX_CODE_ATTEMPTS, msg
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// 按推荐码查询（只读，隐私过滤）
    pub async fn lookup_referral(&self, code: &str) -> Result<ReferralLookup, LaunchlistError> {
        let code = code.trim().to_uppercase();
        if !is_valid_referral_code(&code) {
            return Err(LaunchlistError::validation(format!(
                "Invalid referral code format: '{}'",
                code
            )));
        }

        if let Some(entry) = self.cache.get(&code).await {
            return Ok(Self::to_lookup(entry));
        }

        match self.storage.find_by_code(&code).await? {
            Some(entry) => {
                self.cache.insert(&code, entry.clone()).await;
                Ok(Self::to_lookup(entry))
            }
            None => Err(LaunchlistError::not_found(format!(
                "Unknown referral code: {}",
                code
            ))),
        }
    }

    /// 领域模型 → 对外查询结果，邮箱在这里被剥掉
    fn to_lookup(entry: WaitlistEntry) -> ReferralLookup {
        ReferralLookup {
            full_name: entry.full_name,
            referral_code: entry.referral_code,
            referral_count: entry.referral_count,
        }
    }

    /// 注册管理后台用户（密码 Argon2id 哈希后入库）
    pub async fn register_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<i64, LaunchlistError> {
        let username = username.trim();
        if username.is_empty() || username.len() > 255 {
            return Err(LaunchlistError::validation(
                "username is required and must be at most 255 characters",
            ));
        }
        if password.len() < 8 {
            return Err(LaunchlistError::validation(
                "password must be at least 8 characters",
            ));
        }

        let password_hash = hash_password(password)
            .map_err(|e| LaunchlistError::password_hash(e.to_string()))?;

        let user = self.storage.create_user(username, &password_hash).await?;
        Ok(user.id)
    }

    /// 校验管理后台用户密码
    ///
    /// 用户不存在和密码不匹配都返回 Ok(false)，不区分两种失败。
    pub async fn verify_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, LaunchlistError> {
        let Some(user) = self.storage.find_user_by_username(username.trim()).await? else {
            return Ok(false);
        };

        verify_password(password, &user.password)
            .map_err(|e| LaunchlistError::password_hash(e.to_string()))
    }
}
