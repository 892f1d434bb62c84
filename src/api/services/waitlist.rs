//! 等待名单公共端点

use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::api::helpers::{api_created, api_result};
use crate::api::types::{PostWaitlistEntry, ReferralResponse, WaitlistEntryResponse};
use crate::services::{CreateEntryRequest, WaitlistService};

/// 新增等待名单条目
pub async fn post_waitlist(
    _req: HttpRequest,
    body: web::Json<PostWaitlistEntry>,
    waitlist_service: web::Data<Arc<WaitlistService>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    info!("Waitlist API: signup request - email: {}", body.email);

    // role / githubUrl 等表单附加字段并入 metadata 透传
    let mut metadata = match body.metadata {
        Some(serde_json::Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };
    if let Some(role) = body.role.filter(|s| !s.is_empty()) {
        metadata.insert("role".to_string(), serde_json::Value::String(role));
    }
    if let Some(github_url) = body.github_url.filter(|s| !s.is_empty()) {
        metadata.insert(
            "github_url".to_string(),
            serde_json::Value::String(github_url),
        );
    }
    let metadata = if metadata.is_empty() {
        None
    } else {
        Some(serde_json::Value::Object(metadata))
    };

    let request = CreateEntryRequest {
        full_name: body.full_name,
        email: body.email,
        referred_by: body.referred_by,
        user_type: body.user_type,
        metadata,
        referral_code: None,
    };

    let result = waitlist_service
        .create_entry(request)
        .await
        .map(WaitlistEntryResponse::from);

    Ok(api_created(result))
}

/// 按推荐码查询（只读，无邮箱）
pub async fn get_referral(
    _req: HttpRequest,
    code: web::Path<String>,
    waitlist_service: web::Data<Arc<WaitlistService>>,
) -> ActixResult<impl Responder> {
    trace!("Waitlist API: referral lookup - code: {}", code);

    let result = waitlist_service
        .lookup_referral(&code)
        .await
        .map(|lookup| ReferralResponse {
            full_name: lookup.full_name,
            referral_code: lookup.referral_code,
            referral_count: lookup.referral_count,
        });

    Ok(api_result(result))
}
