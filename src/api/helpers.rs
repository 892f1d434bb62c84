//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::LaunchlistError;

use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    success: bool,
    message: Option<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            success,
            message,
            data,
        })
}

/// 构建成功响应（200）
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, true, None, Some(data))
}

/// 构建创建成功响应（201）
pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, true, None, Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    json_response::<()>(status, false, Some(message.to_string()), None)
}

/// 从 LaunchlistError 构建错误响应（自动映射 HTTP 状态码）
pub fn error_from_launchlist(err: &LaunchlistError) -> HttpResponse {
    // 5xx 细节不外泄，统一成通用消息
    let message = if err.http_status().is_server_error() {
        "Internal server error".to_string()
    } else {
        err.message().to_string()
    };
    json_response::<()>(err.http_status(), false, Some(message), None)
}

/// 统一 Result → HttpResponse 转换（200）
pub fn api_result<T: Serialize>(result: Result<T, LaunchlistError>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_launchlist(&e),
    }
}

/// 统一 Result → HttpResponse 转换（201）
pub fn api_created<T: Serialize>(result: Result<T, LaunchlistError>) -> HttpResponse {
    match result {
        Ok(data) => created_response(data),
        Err(e) => error_from_launchlist(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let response = success_response("success_data");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_created_response() {
        let response = created_response("created_data");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_error_response_not_found() {
        let response = error_response(StatusCode::NOT_FOUND, "Resource not found");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_from_launchlist_maps_conflict() {
        let err = LaunchlistError::duplicate_email("Email already on the waitlist: a@b.c");
        let response = error_from_launchlist(&err);
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_error_from_launchlist_hides_internal_detail() {
        let err = LaunchlistError::database_operation("connection refused at 10.0.0.3");
        let response = error_from_launchlist(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
