use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rfs_planner::config::PlannerConfig;
use rfs_planner::error::AppError;
use rfs_planner::procurement::EquipmentCatalog;
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) planner: PlannerConfig,
    /// Catalog used when a request does not upload its own.
    pub(crate) catalog: Arc<EquipmentCatalog>,
}

/// Custom catalog from disk, or the built-in list.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<EquipmentCatalog, AppError> {
    match path {
        Some(path) => Ok(EquipmentCatalog::from_path(path)?),
        None => Ok(EquipmentCatalog::standard()),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

pub(crate) fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "n/a".to_string())
}
