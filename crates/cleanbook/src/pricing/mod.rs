//! Pricing, payout and cancellation-policy calculators.
//!
//! Everything except the resolver is a pure function over a [`PricingConfig`]
//! snapshot. [`PricingService`] is the caller-side holder of the current
//! snapshot, and [`pricing_router`] exposes it over HTTP.

pub mod cancellation;
pub mod coerce;
pub mod config;
pub mod format;
pub mod quote;
pub mod resolver;
pub mod router;
pub mod service;
pub mod settlement;

#[cfg(test)]
mod tests;

pub use cancellation::{
    days_until, evaluate, CancellationAmounts, CancellationContext, CancellationOutcome,
};
pub use config::{
    CancellationPolicy, ConfigViolation, InvalidPricingConfig, LinenFees, PlatformFees,
    PricingConfig, TimeWindowRate, ViolationKind, ANYTIME_WINDOW, DEFAULT_PLATFORM_FEE,
};
pub use format::format_currency;
pub use quote::{
    compute_quote, quote_breakdown, time_window_options, HomeAttributes, JobQuoteRequest,
    QuoteBreakdown, TimeWindowOption,
};
pub use resolver::{
    source_from_config, ConfigSource, HttpPricingSource, PricingConfigResolver,
    PricingFetchError, PricingSource, ResolvedPricing, UnconfiguredPricingSource,
};
pub use router::{pricing_router, PayoutRequest, PricingSnapshotView};
pub use service::PricingService;
pub use settlement::{
    compute_provider_share, settle, summarize_payouts, PayoutSummary, ProviderRole, Settlement,
    SettlementInput,
};
