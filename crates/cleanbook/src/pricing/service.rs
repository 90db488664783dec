use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::cancellation::{self, CancellationContext, CancellationOutcome};
use super::quote::{self, JobQuoteRequest, QuoteBreakdown, TimeWindowOption};
use super::resolver::{PricingConfigResolver, PricingSource, ResolvedPricing};
use super::settlement::{self, PayoutSummary, Settlement, SettlementInput};

/// Caller-side owner of the current pricing snapshot. The calculators stay pure;
/// this holds the last resolved snapshot and swaps it on refresh.
pub struct PricingService<S> {
    resolver: PricingConfigResolver<S>,
    current: RwLock<Arc<ResolvedPricing>>,
}

impl<S> PricingService<S>
where
    S: PricingSource,
{
    /// Resolves once and starts serving that snapshot.
    pub async fn bootstrap(resolver: PricingConfigResolver<S>) -> Self {
        let initial = resolver.resolve().await;
        Self::with_snapshot(resolver, initial)
    }

    pub fn with_snapshot(resolver: PricingConfigResolver<S>, snapshot: ResolvedPricing) -> Self {
        Self {
            resolver,
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn current(&self) -> Arc<ResolvedPricing> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-resolves and replaces the snapshot. Concurrent refreshes race; the
    /// last one to finish wins.
    pub async fn refresh(&self) -> Arc<ResolvedPricing> {
        let resolved = Arc::new(self.resolver.resolve().await);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = resolved.clone();
        info!(source = ?resolved.source, "pricing snapshot refreshed");
        resolved
    }

    pub fn time_windows(&self) -> Vec<TimeWindowOption> {
        quote::time_window_options(&self.current().pricing)
    }

    pub fn quote(&self, request: &JobQuoteRequest) -> QuoteBreakdown {
        quote::quote_breakdown(&self.current().pricing, request)
    }

    pub fn settle(&self, input: &SettlementInput) -> Settlement {
        settlement::settle(&self.current().pricing, input)
    }

    pub fn payouts(&self, jobs: &[SettlementInput]) -> PayoutSummary {
        settlement::summarize_payouts(&self.current().pricing, jobs)
    }

    pub fn evaluate_cancellation(&self, ctx: &CancellationContext) -> CancellationOutcome {
        cancellation::evaluate(&self.current().pricing, ctx)
    }
}
