use chrono::NaiveDate;
use cleanbook::config::AppConfig;
use cleanbook::error::AppError;
use cleanbook::pricing::{
    source_from_config, PricingConfigResolver, PricingService, PricingSource, ResolvedPricing,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type DynPricingService = PricingService<Box<dyn PricingSource>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) pricing: Arc<DynPricingService>,
}

pub(crate) fn pricing_resolver(
    config: &AppConfig,
) -> Result<PricingConfigResolver<Box<dyn PricingSource>>, AppError> {
    let source = source_from_config(&config.pricing)?;
    Ok(PricingConfigResolver::new(source))
}

/// One-shot resolution for CLI commands.
pub(crate) async fn resolve_pricing() -> Result<ResolvedPricing, AppError> {
    let config = AppConfig::load()?;
    let resolver = pricing_resolver(&config)?;
    Ok(resolver.resolve().await)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date(" 2025-11-05 "),
            Ok(NaiveDate::from_ymd_opt(2025, 11, 5).expect("valid date"))
        );
        assert!(parse_date("11/05/2025").is_err());
    }
}
