use crate::infra::{deserialize_optional_date, AppState};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use rfs_planner::error::AppError;
use rfs_planner::planning::calendar::holidays_for_years;
use rfs_planner::planning::{Country, TimelineEntry, Workweek};
use rfs_planner::procurement::{EquipmentCatalog, EquipmentRowView};
use rfs_planner::report::{HallRowView, SitePlan, SiteReport, SiteSummary};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use tracing::info;

const MIN_HOLIDAY_YEAR: i32 = 1900;
const MAX_HOLIDAY_YEAR: i32 = 2200;

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleRequest {
    pub(crate) site: SitePlan,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    /// Overrides the configured holiday country.
    #[serde(default)]
    pub(crate) country: Option<String>,
    /// Overrides the configured construction workweek.
    #[serde(default)]
    pub(crate) construction_workweek: Option<u8>,
    /// Catalog CSV text; the built-in catalog is used when absent.
    #[serde(default)]
    pub(crate) equipment_csv: Option<String>,
    #[serde(default)]
    pub(crate) include_timeline: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScheduleResponse {
    pub(crate) country: Country,
    pub(crate) catalog_source: CatalogSource,
    pub(crate) summary: SiteSummary,
    pub(crate) halls: Vec<HallRowView>,
    pub(crate) equipment: Vec<EquipmentRowView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) timeline: Option<Vec<TimelineEntry>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CatalogSource {
    Uploaded,
    Configured,
}

#[derive(Debug, Serialize)]
pub(crate) struct HolidaysResponse {
    pub(crate) country: Country,
    pub(crate) year: i32,
    pub(crate) holidays: Vec<NaiveDate>,
}

pub(crate) fn planner_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/schedule", post(schedule_endpoint))
        .route("/api/v1/holidays/:country/:year", get(holidays_endpoint))
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

pub(crate) async fn schedule_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let ScheduleRequest {
        site,
        today,
        country,
        construction_workweek,
        equipment_csv,
        include_timeline,
    } = payload;
    site.validate()?;

    let mut planner = state.planner;
    if let Some(code) = country.as_deref() {
        planner.country = Country::from_code(code);
    }
    if let Some(workweek) = construction_workweek.and_then(Workweek::from_length) {
        planner.construction_workweek = workweek;
    }

    let uploaded = match equipment_csv {
        Some(csv) => Some(EquipmentCatalog::from_reader(Cursor::new(csv.into_bytes()))?),
        None => None,
    };
    let (catalog, catalog_source) = match uploaded.as_ref() {
        Some(catalog) => (catalog, CatalogSource::Uploaded),
        None => (state.catalog.as_ref(), CatalogSource::Configured),
    };

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let report = SiteReport::compute(&site, &planner, catalog, today);
    info!(
        buildings = report.buildings.len(),
        equipment = report.equipment.len(),
        source = ?catalog_source,
        "schedule request served"
    );

    Ok(Json(ScheduleResponse {
        country: planner.country,
        catalog_source,
        summary: report.summary(),
        halls: report.hall_views(),
        equipment: report.equipment_views(),
        timeline: include_timeline.then(|| report.timeline()),
    }))
}

pub(crate) async fn holidays_endpoint(
    Path((country, year)): Path<(String, i32)>,
) -> Result<Json<HolidaysResponse>, (StatusCode, Json<serde_json::Value>)> {
    let Some(country) = Country::parse(&country) else {
        let supported: Vec<&str> = Country::ordered().iter().map(|c| c.code()).collect();
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("unsupported country '{country}'"),
                "supported": supported,
            })),
        ));
    };
    if !(MIN_HOLIDAY_YEAR..=MAX_HOLIDAY_YEAR).contains(&year) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("year must be between {MIN_HOLIDAY_YEAR} and {MAX_HOLIDAY_YEAR}")
            })),
        ));
    }

    let holidays = holidays_for_years(country, [year])
        .into_iter()
        .filter(|date| chrono::Datelike::year(date) == year)
        .collect();

    Ok(Json(HolidaysResponse {
        country,
        year,
        holidays,
    }))
}
