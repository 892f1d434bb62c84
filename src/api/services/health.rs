use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, trace};

use crate::api::types::ApiResponse;
use crate::storage::SeaOrmStorage;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 存储健康检查状态
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub storage_type: String,
    pub entry_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 健康检查响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u32,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u32,
}

/// Health Service
///
/// 直接打存储层的 count，不经过业务 service——探针要求快速、简单。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let storage_type = storage.get_backend_config().storage_type;

        // 只查 count，不加载全表
        let storage_status =
            match tokio::time::timeout(Duration::from_secs(5), storage.count_entries()).await {
                Ok(Ok(count)) => HealthStorageCheck {
                    status: "healthy".to_string(),
                    storage_type,
                    entry_count: Some(count),
                    error: None,
                },
                Ok(Err(e)) => {
                    error!("Storage health check failed: {}", e);
                    HealthStorageCheck {
                        status: "unhealthy".to_string(),
                        storage_type,
                        entry_count: None,
                        error: Some(format!("database error: {}", e)),
                    }
                }
                Err(_) => {
                    error!("Storage health check timeout");
                    HealthStorageCheck {
                        status: "unhealthy".to_string(),
                        storage_type,
                        entry_count: None,
                        error: Some("timeout".to_string()),
                    }
                }
            };

        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0) as u32;
        let is_healthy = storage_status.status == "healthy";

        let health_data = HealthResponse {
            status: if is_healthy {
                "healthy".to_string()
            } else {
                "unhealthy".to_string()
            },
            timestamp: now.to_rfc3339(),
            uptime: uptime_seconds,
            storage: storage_status,
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        let response_status = if is_healthy {
            actix_web::http::StatusCode::OK
        } else {
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        };

        HttpResponse::build(response_status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ApiResponse {
                success: is_healthy,
                message: None,
                data: Some(health_data),
            })
    }

    // 简单的就绪检查，只返回 200 状态码
    pub async fn readiness_check() -> impl Responder {
        trace!("Received readiness check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }

    // 活跃性检查，检查基本服务可用性
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}
