use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState};
use crate::routes::planner_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rfs_planner::config::AppConfig;
use rfs_planner::error::AppError;
use rfs_planner::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let catalog_path = args.equipment_csv.take();
    let catalog = load_catalog(catalog_path.as_deref())?;
    info!(items = catalog.len(), custom = catalog_path.is_some(), "equipment catalog loaded");

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        planner: config.planner,
        catalog: Arc::new(catalog),
    };

    let app = planner_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        country = config.planner.country.code(),
        "rfs planner ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
