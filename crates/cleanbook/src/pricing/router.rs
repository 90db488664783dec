use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::cancellation::{CancellationContext, CancellationOutcome};
use super::config::PricingConfig;
use super::quote::{JobQuoteRequest, QuoteBreakdown, TimeWindowOption};
use super::resolver::{ConfigSource, PricingSource, ResolvedPricing};
use super::service::PricingService;
use super::settlement::{PayoutSummary, Settlement, SettlementInput};

/// Current snapshot plus the booking-screen window list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSnapshotView {
    pub source: ConfigSource,
    pub using_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
    pub pricing: PricingConfig,
    pub time_windows: Vec<TimeWindowOption>,
}

impl PricingSnapshotView {
    pub fn from_resolved(resolved: &ResolvedPricing) -> Self {
        Self {
            source: resolved.source,
            using_fallback: resolved.is_fallback(),
            advisory: resolved.advisory.clone(),
            pricing: resolved.pricing.clone(),
            time_windows: super::quote::time_window_options(&resolved.pricing),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayoutRequest {
    #[serde(default)]
    pub jobs: Vec<SettlementInput>,
}

/// Router builder exposing the calculators over HTTP.
pub fn pricing_router<S>(service: Arc<PricingService<S>>) -> Router
where
    S: PricingSource + 'static,
{
    Router::new()
        .route("/api/v1/pricing", get(snapshot_handler::<S>))
        .route("/api/v1/pricing/refresh", post(refresh_handler::<S>))
        .route("/api/v1/pricing/quote", post(quote_handler::<S>))
        .route("/api/v1/pricing/settlement", post(settlement_handler::<S>))
        .route("/api/v1/pricing/payouts", post(payouts_handler::<S>))
        .route(
            "/api/v1/pricing/cancellation",
            post(cancellation_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn snapshot_handler<S>(
    State(service): State<Arc<PricingService<S>>>,
) -> Json<PricingSnapshotView>
where
    S: PricingSource + 'static,
{
    Json(PricingSnapshotView::from_resolved(&service.current()))
}

pub(crate) async fn refresh_handler<S>(
    State(service): State<Arc<PricingService<S>>>,
) -> Json<PricingSnapshotView>
where
    S: PricingSource + 'static,
{
    let resolved = service.refresh().await;
    Json(PricingSnapshotView::from_resolved(&resolved))
}

pub(crate) async fn quote_handler<S>(
    State(service): State<Arc<PricingService<S>>>,
    Json(request): Json<JobQuoteRequest>,
) -> Json<QuoteBreakdown>
where
    S: PricingSource + 'static,
{
    Json(service.quote(&request))
}

pub(crate) async fn settlement_handler<S>(
    State(service): State<Arc<PricingService<S>>>,
    Json(input): Json<SettlementInput>,
) -> Json<Settlement>
where
    S: PricingSource + 'static,
{
    Json(service.settle(&input))
}

pub(crate) async fn payouts_handler<S>(
    State(service): State<Arc<PricingService<S>>>,
    Json(request): Json<PayoutRequest>,
) -> Json<PayoutSummary>
where
    S: PricingSource + 'static,
{
    Json(service.payouts(&request.jobs))
}

pub(crate) async fn cancellation_handler<S>(
    State(service): State<Arc<PricingService<S>>>,
    Json(ctx): Json<CancellationContext>,
) -> Json<CancellationOutcome>
where
    S: PricingSource + 'static,
{
    Json(service.evaluate_cancellation(&ctx))
}
