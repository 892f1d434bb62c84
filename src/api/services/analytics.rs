//! Analytics 管理端点（x-api-key 认证）

use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::api::helpers::{api_created, api_result, error_from_launchlist};
use crate::api::types::{
    DailyStatsQuery, ExportQuery, PostDailyStats, PostGeographicStats, PostReferralChannel,
    TopQuery,
};
use crate::errors::LaunchlistError;
use crate::services::{AnalyticsService, ExportDataset};
use crate::storage::{DailyStatsRecord, GeographicStatsRecord, ReferralChannelRecord};

/// 默认的最近 N 天窗口
const DEFAULT_DAILY_LIMIT: u64 = 30;

/// 获取 overview 聚合
pub async fn get_overview(
    _req: HttpRequest,
    analytics_service: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    trace!("Analytics API: overview request");
    Ok(api_result(analytics_service.overview().await))
}

/// 获取每日统计
///
/// start+end 给定时返回升序的日期范围扫描，否则返回最近 limit 天
/// 的降序列表。
pub async fn get_daily_stats(
    _req: HttpRequest,
    query: web::Query<DailyStatsQuery>,
    analytics_service: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    trace!("Analytics API: daily stats query: {:?}", query);

    let result = match (&query.start, &query.end) {
        (None, None) => {
            analytics_service
                .latest_daily_stats(query.limit.unwrap_or(DEFAULT_DAILY_LIMIT))
                .await
        }
        (start, end) => {
            match AnalyticsService::parse_date_range_strict(start.as_deref(), end.as_deref()) {
                Ok((start, end)) => analytics_service.daily_stats_range(start, end).await,
                Err(e) => Err(e),
            }
        }
    };

    Ok(api_result(result))
}

/// 每日统计 upsert
pub async fn post_daily_stats(
    _req: HttpRequest,
    body: web::Json<PostDailyStats>,
    analytics_service: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    info!("Analytics API: upsert daily stats for {}", body.date);

    let result = match chrono::NaiveDate::parse_from_str(&body.date, "%Y-%m-%d") {
        Ok(date) => {
            analytics_service
                .record_daily_stats(DailyStatsRecord {
                    date,
                    signup_count: body.signup_count,
                    total_referrals: body.total_referrals,
                    conversion_rate: body.conversion_rate,
                    metadata: body.metadata,
                })
                .await
        }
        Err(_) => Err(LaunchlistError::date_parse(format!(
            "Invalid date: '{}'. Use YYYY-MM-DD",
            body.date
        ))),
    };

    Ok(api_created(result))
}

/// 地区统计 top-N
pub async fn get_geographic_stats(
    _req: HttpRequest,
    query: web::Query<TopQuery>,
    analytics_service: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    let limit = query.limit.unwrap_or(10);
    Ok(api_result(analytics_service.geographic_stats(limit).await))
}

/// 地区统计 upsert
pub async fn post_geographic_stats(
    _req: HttpRequest,
    body: web::Json<PostGeographicStats>,
    analytics_service: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    info!("Analytics API: upsert geographic stats for {}", body.region);

    let result = analytics_service
        .record_geographic_stats(GeographicStatsRecord {
            region: body.region,
            user_count: body.user_count,
            engagement_score: body.engagement_score,
        })
        .await;

    Ok(api_created(result))
}

/// 渠道统计 top-N
pub async fn get_referral_channels(
    _req: HttpRequest,
    query: web::Query<TopQuery>,
    analytics_service: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    let limit = query.limit.unwrap_or(10);
    Ok(api_result(analytics_service.referral_channels(limit).await))
}

/// 渠道统计 upsert
pub async fn post_referral_channel(
    _req: HttpRequest,
    body: web::Json<PostReferralChannel>,
    analytics_service: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    info!(
        "Analytics API: upsert referral channel '{}'",
        body.channel_name
    );

    let result = analytics_service
        .record_referral_channel(ReferralChannelRecord {
            channel_name: body.channel_name,
            referral_count: body.referral_count,
            conversion_rate: body.conversion_rate,
        })
        .await;

    Ok(api_created(result))
}

/// 导出数据集为 CSV 附件
pub async fn export_dataset(
    _req: HttpRequest,
    query: web::Query<ExportQuery>,
    analytics_service: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    let dataset = match query.dataset.as_deref() {
        Some(s) => match s.parse::<ExportDataset>() {
            Ok(dataset) => dataset,
            Err(e) => {
                return Ok(error_from_launchlist(&LaunchlistError::validation(e)));
            }
        },
        None => ExportDataset::default(),
    };

    match analytics_service.export_dataset(dataset).await {
        Ok((filename, csv)) => {
            info!("Analytics API: exporting {}", filename);
            Ok(HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", filename),
                ))
                .body(csv))
        }
        Err(e) => Ok(error_from_launchlist(&e)),
    }
}
