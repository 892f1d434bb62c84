//! Analytics 管理端点的 API key 认证
//!
//! 校验 x-api-key 请求头是否等于配置的 admin_api_key。
//! 未配置 key 时整个管理面视为未启用，直接返回 404。

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{Method, header::CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info, trace};

use crate::api::types::ApiResponse;

/// x-api-key 请求头名
pub const API_KEY_HEADER: &str = "x-api-key";

/// API key authentication middleware
#[derive(Clone)]
pub struct ApiKeyAuth;

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle OPTIONS requests for CORS preflight
    fn handle_options_request(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::NoContent()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .finish()
                .map_into_right_body(),
        )
    }

    /// Handle requests when no API key is configured
    fn handle_missing_key(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        debug!("Admin API key not configured - returning 404");
        req.into_response(
            HttpResponse::NotFound()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .body("Not Found")
                .map_into_right_body(),
        )
    }

    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!("Analytics authentication failed - invalid or missing API key");
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    success: false,
                    message: Some("Unauthorized: invalid or missing API key".to_string()),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// 从请求头提取 API key
    fn extract_api_key(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string())
    }
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            let config = crate::config::get_config();
            let admin_api_key = config.api.admin_api_key.as_str();

            // Check if API key is configured
            if admin_api_key.is_empty() {
                return Ok(Self::handle_missing_key(req));
            }

            // Handle CORS preflight requests
            if req.method() == Method::OPTIONS {
                return Ok(Self::handle_options_request(req));
            }

            match Self::extract_api_key(&req) {
                Some(provided) if provided == admin_api_key => {
                    trace!("Analytics authentication successful");
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                _ => Ok(Self::handle_unauthorized(req)),
            }
        })
    }
}
