use crate::cli::ServeArgs;
use crate::infra::{ledger_service, AppState};
use crate::routes::with_record_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tree_ledger::config::AppConfig;
use tree_ledger::error::AppError;
use tree_ledger::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.sheets.access_token.is_none() {
        warn!("SHEETS_ACCESS_TOKEN not set; add-record requests will fail");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(ledger_service(&config)?);

    let app = with_record_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        spreadsheet = %config.sheets.spreadsheet_id,
        range = %config.sheets.range,
        "tree ledger ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
