//! LaunchlistError 错误模型测试

use actix_web::http::StatusCode;
use launchlist::errors::LaunchlistError;

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(LaunchlistError::cache_connection("x").code(), "E001");
    assert_eq!(LaunchlistError::duplicate_email("x").code(), "E006");
    assert_eq!(LaunchlistError::duplicate_referral_code("x").code(), "E007");
    assert_eq!(LaunchlistError::validation("x").code(), "E009");
    assert_eq!(LaunchlistError::not_found("x").code(), "E010");
}

#[test]
fn test_http_status_mapping() {
    assert_eq!(
        LaunchlistError::validation("bad input").http_status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        LaunchlistError::date_parse("bad date").http_status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        LaunchlistError::duplicate_email("dup").http_status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        LaunchlistError::duplicate_referral_code("dup").http_status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        LaunchlistError::duplicate_resource("dup").http_status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        LaunchlistError::not_found("missing").http_status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        LaunchlistError::unauthorized("no key").http_status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        LaunchlistError::database_operation("boom").http_status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_display_uses_simple_format() {
    let err = LaunchlistError::not_found("Unknown referral code: ABC123XYZ");
    let rendered = format!("{}", err);
    assert!(rendered.contains("Resource Not Found"));
    assert!(rendered.contains("ABC123XYZ"));
}

#[test]
fn test_message_returns_detail() {
    let err = LaunchlistError::duplicate_email("Email already on the waitlist: a@b.c");
    assert_eq!(err.message(), "Email already on the waitlist: a@b.c");
    assert_eq!(err.error_type(), "Duplicate Email");
}

#[test]
fn test_from_db_err() {
    let db_err = sea_orm::DbErr::Custom("boom".to_string());
    let err: LaunchlistError = db_err.into();
    assert!(matches!(err, LaunchlistError::DatabaseOperation(_)));
}

#[test]
fn test_from_serde_json_err() {
    let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
    let err: LaunchlistError = json_err.into();
    assert!(matches!(err, LaunchlistError::Serialization(_)));
}

#[test]
fn test_from_chrono_parse_err() {
    let parse_err = chrono::DateTime::parse_from_rfc3339("nope").unwrap_err();
    let err: LaunchlistError = parse_err.into();
    assert!(matches!(err, LaunchlistError::DateParse(_)));
}
