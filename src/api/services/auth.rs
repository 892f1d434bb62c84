//! 管理后台用户注册/登录端点
//!
//! 启动模板遗留的用户存储：注册写入 Argon2id 哈希，登录只返回
//! 校验结果，不发放会话凭证。

use actix_web::{HttpRequest, Responder, Result as ActixResult, http::StatusCode, web};
use std::sync::Arc;
use tracing::info;

use crate::api::helpers::{api_created, error_from_launchlist, error_response, success_response};
use crate::api::types::UserCredentials;
use crate::services::WaitlistService;

/// 注册用户
pub async fn register_user(
    _req: HttpRequest,
    body: web::Json<UserCredentials>,
    waitlist_service: web::Data<Arc<WaitlistService>>,
) -> ActixResult<impl Responder> {
    info!("Auth API: register request - username: {}", body.username);

    let result = waitlist_service
        .register_user(&body.username, &body.password)
        .await
        .map(|id| serde_json::json!({ "id": id, "username": body.username.clone() }));

    Ok(api_created(result))
}

/// 登录（仅校验密码）
pub async fn login_user(
    _req: HttpRequest,
    body: web::Json<UserCredentials>,
    waitlist_service: web::Data<Arc<WaitlistService>>,
) -> ActixResult<impl Responder> {
    match waitlist_service
        .verify_user(&body.username, &body.password)
        .await
    {
        Ok(true) => {
            info!("Auth API: login successful - {}", body.username);
            Ok(success_response(
                serde_json::json!({ "username": body.username.clone() }),
            ))
        }
        Ok(false) => {
            info!("Auth API: login failed - {}", body.username);
            Ok(error_response(
                StatusCode::UNAUTHORIZED,
                "Invalid username or password",
            ))
        }
        Err(e) => Ok(error_from_launchlist(&e)),
    }
}
