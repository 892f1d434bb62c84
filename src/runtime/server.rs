//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::middleware::RequestIdMiddleware;
use crate::api::routes::{analytics_routes, health_routes, public_routes};
use crate::api::services::AppStartTime;
use crate::runtime::{shutdown, startup};

/// CORS configuration loaded from config
#[derive(Clone, Debug)]
struct CorsSettings {
    enabled: bool,
    allowed_origins: Vec<String>,
}

impl CorsSettings {
    fn from_config() -> Self {
        let config = crate::config::get_config();
        Self {
            enabled: config.api.cors_enabled,
            allowed_origins: config.api.cors_allowed_origins.clone(),
        }
    }
}

/// Build CORS middleware from configuration
fn build_cors_middleware(cors_config: &CorsSettings) -> Cors {
    // When CORS is disabled, use browser's default same-origin policy (restrictive)
    if !cors_config.enabled {
        return Cors::default();
    }

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "HEAD", "OPTIONS"])
        .allowed_headers(vec!["Content-Type", "Accept", "x-api-key"])
        .max_age(3600);

    if cors_config.allowed_origins.is_empty() {
        // Empty origins = same-origin only
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed."
        );
    } else if is_any_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Run the HTTP server
///
/// This function:
/// 1. Records startup time
/// 2. Prepares server components (storage, cache, services)
/// 3. Configures and starts the HTTP server
/// 4. Listens for graceful shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    // Record application start time
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    // Prepare server startup (storage, cache, services)
    let ctx = startup::prepare_server_startup().await.map_err(|e| {
        tracing::error!("Server startup failed: {}", e);
        e
    })?;

    let storage = ctx.storage.clone();
    let waitlist_service = ctx.waitlist_service.clone();
    let analytics_service = ctx.analytics_service.clone();
    let chat_service = ctx.chat_service.clone();

    let config = crate::config::get_config();
    let cpu_count = config.server.cpu_count.min(32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_config = CorsSettings::from_config();

    // Clone db reference before storage moves into HttpServer closure
    let db_for_shutdown = storage.get_db().clone();

    // Configure HTTP server
    let server = HttpServer::new(move || {
        // Build CORS middleware
        let cors = build_cors_middleware(&cors_config);

        App::new()
            .wrap(RequestIdMiddleware) // 为每个请求生成 request_id
            .wrap(cors)
            .wrap(Compress::default())
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(waitlist_service.clone()))
            .app_data(web::Data::new(analytics_service.clone()))
            .app_data(web::Data::new(chat_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            // analytics 前缀更长，必须先注册
            .service(analytics_routes())
            .service(public_routes())
            .service(health_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(bind_address)?.run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
