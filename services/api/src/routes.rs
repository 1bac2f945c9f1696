use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use civic_insights::analytics::{analyze, ScoringConfig, ServiceAnalytics, ServiceRecord};
use civic_insights::error::AppError;
use civic_insights::ingest::ServiceRecordImporter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyticsRequest {
    /// Records supplied inline, already filtered by the caller.
    #[serde(default)]
    pub(crate) records: Option<Vec<ServiceRecord>>,
    /// Alternatively, a raw CSV export to run through the importer.
    #[serde(default)]
    pub(crate) csv: Option<String>,
    /// Reference date for recency rules; defaults to today.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyticsResponse {
    pub(crate) data_source: AnalyticsDataSource,
    pub(crate) record_count: usize,
    #[serde(flatten)]
    pub(crate) analytics: ServiceAnalytics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum AnalyticsDataSource {
    Inline,
    Csv,
}

pub(crate) fn router() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/analytics", axum::routing::post(analytics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn analytics_endpoint(
    Extension(scoring): Extension<Arc<ScoringConfig>>,
    Json(payload): Json<AnalyticsRequest>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let AnalyticsRequest {
        records,
        csv,
        as_of,
    } = payload;

    let (records, data_source) = match (records, csv) {
        (Some(records), _) => (records, AnalyticsDataSource::Inline),
        (None, Some(csv)) => {
            let reader = Cursor::new(csv.into_bytes());
            let records = ServiceRecordImporter::from_reader(reader)?;
            (records, AnalyticsDataSource::Csv)
        }
        (None, None) => (Vec::new(), AnalyticsDataSource::Inline),
    };

    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let analytics = analyze(&records, as_of, &scoring);

    Ok(Json(AnalyticsResponse {
        data_source,
        record_count: records.len(),
        analytics,
    }))
}
