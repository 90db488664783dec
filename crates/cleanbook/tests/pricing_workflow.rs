//! End-to-end pricing scenarios through the public crate surface: resolve a
//! snapshot, quote a booking, show the cleaner's earnings, then preview a
//! cancellation against the same snapshot.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use cleanbook::pricing::{
    compute_provider_share, compute_quote, days_until, evaluate, format_currency,
    CancellationContext, ConfigSource, HomeAttributes, JobQuoteRequest, PricingConfig,
    PricingConfigResolver, PricingFetchError, PricingSource, ProviderRole, SettlementInput,
};

struct OfflineSource;

#[async_trait]
impl PricingSource for OfflineSource {
    async fn fetch(&self) -> Result<Option<Value>, PricingFetchError> {
        Err(PricingFetchError::Unavailable("network unreachable".to_string()))
    }
}

struct FixedSource(Value);

#[async_trait]
impl PricingSource for FixedSource {
    async fn fetch(&self) -> Result<Option<Value>, PricingFetchError> {
        Ok(Some(self.0.clone()))
    }
}

#[tokio::test]
async fn offline_booking_flow_uses_default_pricing() {
    let resolved = PricingConfigResolver::new(OfflineSource).resolve().await;
    assert_eq!(resolved.source, ConfigSource::Config);
    assert_eq!(resolved.pricing, PricingConfig::standard());

    let request = JobQuoteRequest {
        home: HomeAttributes::new(1.0, 1.0),
        time_window: Some("anytime".to_string()),
        sheets: false,
        towels: false,
    };
    let price = compute_quote(&resolved.pricing, &request);
    assert_eq!(price, 150.0);

    let share = compute_provider_share(
        &resolved.pricing,
        &SettlementInput::new(price, 1, ProviderRole::MarketplaceCleaner),
    );
    assert_eq!(format_currency(share), "135.00");

    let today = NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date");
    let appointment = NaiveDate::from_ymd_opt(2025, 11, 5).expect("valid date");
    let outcome = evaluate(
        &resolved.pricing,
        &CancellationContext {
            price,
            original_price: None,
            days_until_appointment: days_until(appointment, today),
            has_cleaner_assigned: true,
            discount_applied: false,
            incentive_cleaner_percent: None,
        },
    );
    assert!(outcome.is_within_penalty_window);
    assert_eq!(outcome.estimated_refund, "75.00");
    assert_eq!(outcome.cleaner_payout, "67.50");
}

#[tokio::test]
async fn live_snapshot_with_legacy_windows_prices_the_booking() {
    let source = FixedSource(json!({
        "basePrice": 140,
        "extraBedBathFee": 45,
        "halfBathFee": 20,
        "linens": { "sheetFeePerBed": 25, "towelFee": 4 },
        "timeWindows": { "anytime": 0, "10-3": 20, "11-4": 20, "12-2": 30 },
        "cancellation": { "fee": 20, "windowDays": 5, "homeownerPenaltyDays": 2, "refundPercentage": 0.4 },
        "platform": { "feePercent": 0.1 }
    }));
    let resolved = PricingConfigResolver::new(source).resolve().await;
    assert_eq!(resolved.source, ConfigSource::Database);

    let request = JobQuoteRequest {
        home: HomeAttributes::from_raw("2", "1.5"),
        time_window: Some("12-2".to_string()),
        sheets: true,
        towels: true,
    };
    // 140 + 45 + 20 + 30 + 2 * 25 + 1.5 * 2 * 4
    assert_eq!(compute_quote(&resolved.pricing, &request), 297.0);

    // unset business-owner fee falls back to 10%
    let share = compute_provider_share(
        &resolved.pricing,
        &SettlementInput::new(297.0, 1, ProviderRole::BusinessEmployee),
    );
    assert_eq!(format_currency(share), "267.30");

    let outcome = evaluate(
        &resolved.pricing,
        &CancellationContext {
            price: 297.0,
            original_price: None,
            days_until_appointment: 4.0,
            has_cleaner_assigned: true,
            discount_applied: false,
            incentive_cleaner_percent: None,
        },
    );
    assert!(!outcome.is_within_penalty_window);
    assert!(outcome.will_charge_cancellation_fee);
    assert_eq!(outcome.estimated_refund, "297.00");
    assert_eq!(outcome.cancellation_fee.as_deref(), Some("20.00"));
}
