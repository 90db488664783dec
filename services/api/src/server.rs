use crate::cli::ServeArgs;
use crate::infra::{pricing_resolver, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cleanbook::config::AppConfig;
use cleanbook::error::AppError;
use cleanbook::pricing::PricingService;
use cleanbook::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let resolver = pricing_resolver(&config)?;
    let pricing = Arc::new(PricingService::bootstrap(resolver).await);
    let snapshot = pricing.current();
    if snapshot.is_fallback() {
        warn!(
            advisory = snapshot.advisory.as_deref().unwrap_or("no live snapshot"),
            "serving default pricing"
        );
    }

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        pricing: pricing.clone(),
    };

    let app = with_service_routes(pricing)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, source = ?snapshot.source, "pricing service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
