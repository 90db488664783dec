use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::coerce::{lenient_number, lenient_optional_number, sanitize};
use super::config::PricingConfig;
use super::format::format_currency;
use super::settlement::ProviderRole;

/// Rounding noise below half a cent is not a subsidy.
const SUBSIDY_TOLERANCE: f64 = 0.005;

/// Read projection of an appointment at the moment a client asks to cancel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationContext {
    #[serde(deserialize_with = "lenient_number")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_optional_number")]
    pub original_price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub days_until_appointment: f64,
    #[serde(default)]
    pub has_cleaner_assigned: bool,
    #[serde(default)]
    pub discount_applied: bool,
    #[serde(default, deserialize_with = "lenient_optional_number")]
    pub incentive_cleaner_percent: Option<f64>,
}

/// Whole days from `today` until the appointment, never negative.
pub fn days_until(appointment: NaiveDate, today: NaiveDate) -> f64 {
    (appointment - today).num_days().max(0) as f64
}

/// Unformatted amounts behind an outcome. `platform_keeps` may be negative when
/// a discount incentive is subsidized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationAmounts {
    pub refund: f64,
    pub cleaner_payout: f64,
    pub platform_keeps: Option<f64>,
    pub cancellation_fee: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationOutcome {
    pub is_within_penalty_window: bool,
    pub estimated_refund: String,
    pub cleaner_payout: String,
    pub refund_percent: f64,
    pub platform_keeps: Option<String>,
    pub warning_message: String,
    pub will_charge_cancellation_fee: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_fee: Option<String>,
    pub platform_subsidizes: bool,
    pub amounts: CancellationAmounts,
}

/// Refund, payout and fee consequences of cancelling now. Committing the
/// cancellation and moving money stays with the booking flow.
pub fn evaluate(config: &PricingConfig, ctx: &CancellationContext) -> CancellationOutcome {
    let policy = &config.cancellation;
    let price = sanitize(ctx.price);
    let days = sanitize(ctx.days_until_appointment);

    let is_within_penalty_window =
        ctx.has_cleaner_assigned && days <= policy.homeowner_penalty_days;
    let will_charge_cancellation_fee = ctx.has_cleaner_assigned && days <= policy.window_days;

    let refund_fraction = policy.refund_percentage.clamp(0.0, 1.0);
    let platform_fee = ProviderRole::MarketplaceCleaner.fee_fraction(&config.platform);

    let (refund, refund_percent, cleaner_payout, platform_keeps) = if !is_within_penalty_window {
        (price, 100.0, 0.0, None)
    } else if ctx.discount_applied {
        let refund = price * refund_fraction;
        let original = ctx
            .original_price
            .map(sanitize)
            .filter(|original| *original > 0.0)
            .unwrap_or(price);
        let cleaner_percent = ctx
            .incentive_cleaner_percent
            .filter(|percent| percent.is_finite())
            .map(|percent| percent.clamp(0.0, 1.0))
            .unwrap_or(1.0 - platform_fee);
        let cleaner_payout = original * (1.0 - refund_fraction) * cleaner_percent;
        let keeps = price - refund - cleaner_payout;
        (refund, refund_fraction * 100.0, cleaner_payout, Some(keeps))
    } else {
        let refund = price * refund_fraction;
        let cleaner_payout = price * (1.0 - refund_fraction) * (1.0 - platform_fee);
        (refund, refund_fraction * 100.0, cleaner_payout, None)
    };

    let cancellation_fee = if will_charge_cancellation_fee {
        sanitize(policy.fee)
    } else {
        0.0
    };

    let amounts = CancellationAmounts {
        refund,
        cleaner_payout,
        platform_keeps,
        cancellation_fee,
    };

    CancellationOutcome {
        is_within_penalty_window,
        estimated_refund: format_currency(refund),
        cleaner_payout: format_currency(cleaner_payout),
        refund_percent,
        platform_keeps: platform_keeps.map(format_currency),
        warning_message: warning_message(
            config,
            price,
            &amounts,
            is_within_penalty_window,
            will_charge_cancellation_fee,
        ),
        will_charge_cancellation_fee,
        cancellation_fee: will_charge_cancellation_fee.then(|| format_currency(cancellation_fee)),
        platform_subsidizes: platform_keeps.is_some_and(|keeps| keeps < -SUBSIDY_TOLERANCE),
        amounts,
    }
}

fn warning_message(
    config: &PricingConfig,
    price: f64,
    amounts: &CancellationAmounts,
    is_within_penalty_window: bool,
    will_charge_cancellation_fee: bool,
) -> String {
    let policy = &config.cancellation;
    let mut message = if is_within_penalty_window {
        format!(
            "This appointment is within the {}-day cancellation penalty window. \
             You will be refunded ${} ({:.0}% of ${}). \
             Your cleaner will receive ${} for the late cancellation.",
            policy.homeowner_penalty_days,
            format_currency(amounts.refund),
            policy.refund_percentage.clamp(0.0, 1.0) * 100.0,
            format_currency(price),
            format_currency(amounts.cleaner_payout),
        )
    } else {
        format!(
            "This appointment is outside the {}-day cancellation penalty window. \
             You will receive a full refund of ${}. \
             Your cleaner will receive ${}.",
            policy.homeowner_penalty_days,
            format_currency(amounts.refund),
            format_currency(amounts.cleaner_payout),
        )
    };

    if will_charge_cancellation_fee {
        message.push_str(&format!(
            " A ${} cancellation fee will be charged because a cleaner is assigned within {} days of the appointment.",
            format_currency(amounts.cancellation_fee),
            policy.window_days,
        ));
    }

    message
}
