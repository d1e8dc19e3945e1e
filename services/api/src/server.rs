use crate::cli::ServeArgs;
use crate::demo::load_snapshot;
use crate::infra::AppState;
use crate::routes::with_stats_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use splitfee::config::AppConfig;
use splitfee::error::AppError;
use splitfee::stats::StatsService;
use splitfee::telemetry;
use std::sync::atomic::Ordering;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let seeded = config.dataset.seed_path.is_some();
    let snapshot = load_snapshot(config.dataset.seed_path.as_deref())?;
    info!(
        seeded,
        identities = snapshot.identities.len(),
        placements = snapshot.placements.len(),
        "marketplace snapshot loaded"
    );
    let (resolver, store) = snapshot.into_collaborators();
    let stats_service = Arc::new(StatsService::new(Arc::new(resolver), Arc::new(store)));

    let app = with_stats_routes(stats_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "split-fee metrics service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
