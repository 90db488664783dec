use serde::{Deserialize, Serialize};

use super::coerce::{coerce_str, lenient_number, sanitize};
use super::config::{fallback_label, PricingConfig, ANYTIME_WINDOW};

/// Towels assumed per bathroom when the towel add-on is booked.
const TOWELS_PER_BATH: f64 = 2.0;

/// Read-only projection of a home record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeAttributes {
    #[serde(deserialize_with = "lenient_number")]
    pub num_beds: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub num_baths: f64,
}

impl HomeAttributes {
    pub fn new(num_beds: f64, num_baths: f64) -> Self {
        Self {
            num_beds: sanitize(num_beds),
            num_baths: sanitize(num_baths),
        }
    }

    /// Builds attributes from the string columns stored on home records.
    pub fn from_raw(num_beds: &str, num_baths: &str) -> Self {
        Self {
            num_beds: coerce_str(num_beds),
            num_baths: coerce_str(num_baths),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuoteRequest {
    pub home: HomeAttributes,
    #[serde(default)]
    pub time_window: Option<String>,
    #[serde(default)]
    pub sheets: bool,
    #[serde(default)]
    pub towels: bool,
}

/// Selectable arrival window as shown on the booking screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindowOption {
    pub key: String,
    pub label: String,
    pub surcharge: f64,
}

/// Itemized quote. `total` is the raw number; formatting is the caller's step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub structural: f64,
    pub surcharge: f64,
    pub linens: f64,
    pub total: f64,
    pub time_window: TimeWindowOption,
}

/// Client-facing price for a job.
pub fn compute_quote(config: &PricingConfig, request: &JobQuoteRequest) -> f64 {
    quote_breakdown(config, request).total
}

pub fn quote_breakdown(config: &PricingConfig, request: &JobQuoteRequest) -> QuoteBreakdown {
    let time_window = resolve_window(config, request.time_window.as_deref());
    let linens = linen_add_ons(config, request);
    let structural = structural_price(config, &request.home);

    QuoteBreakdown {
        structural,
        surcharge: time_window.surcharge,
        linens,
        total: time_window.surcharge + linens + structural,
        time_window,
    }
}

/// Every configured window, cheapest first.
pub fn time_window_options(config: &PricingConfig) -> Vec<TimeWindowOption> {
    let mut options: Vec<TimeWindowOption> = config
        .time_windows
        .iter()
        .map(|(key, rate)| TimeWindowOption {
            key: key.clone(),
            label: rate.label.clone(),
            surcharge: rate.surcharge,
        })
        .collect();
    options.sort_by(|a, b| {
        a.surcharge
            .total_cmp(&b.surcharge)
            .then_with(|| a.key.cmp(&b.key))
    });
    options
}

// Unknown or missing keys book as "anytime" with no surcharge.
fn resolve_window(config: &PricingConfig, key: Option<&str>) -> TimeWindowOption {
    match key.and_then(|key| config.time_window(key).map(|rate| (key, rate))) {
        Some((key, rate)) => TimeWindowOption {
            key: key.to_string(),
            label: rate.label.clone(),
            surcharge: sanitize(rate.surcharge),
        },
        None => TimeWindowOption {
            key: ANYTIME_WINDOW.to_string(),
            label: fallback_label(ANYTIME_WINDOW),
            surcharge: 0.0,
        },
    }
}

fn linen_add_ons(config: &PricingConfig, request: &JobQuoteRequest) -> f64 {
    let home = &request.home;
    let mut total = 0.0;
    if request.sheets {
        total += sanitize(home.num_beds) * config.linens.sheet_fee_per_bed;
    }
    if request.towels {
        total += sanitize(home.num_baths) * TOWELS_PER_BATH * config.linens.towel_fee;
    }
    total
}

fn structural_price(config: &PricingConfig, home: &HomeAttributes) -> f64 {
    let beds = sanitize(home.num_beds);
    let baths = sanitize(home.num_baths);

    let full_baths = baths.floor();
    let half_baths = if baths - full_baths >= 0.5 { 1.0 } else { 0.0 };
    let extra_beds = (beds - 1.0).max(0.0);
    let extra_full_baths = (full_baths - 1.0).max(0.0);

    config.base_price
        + extra_beds * config.extra_bed_bath_fee
        + extra_full_baths * config.extra_bed_bath_fee
        + half_baths * config.half_bath_fee
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(beds: f64, baths: f64) -> JobQuoteRequest {
        JobQuoteRequest {
            home: HomeAttributes::new(beds, baths),
            time_window: None,
            sheets: false,
            towels: false,
        }
    }

    #[test]
    fn half_bath_requires_at_least_half() {
        let config = PricingConfig::standard();
        assert_eq!(compute_quote(&config, &request(1.0, 1.4)), 150.0);
        assert_eq!(compute_quote(&config, &request(1.0, 1.5)), 175.0);
    }

    #[test]
    fn zero_rooms_still_cost_the_base_price() {
        let config = PricingConfig::standard();
        assert_eq!(compute_quote(&config, &request(0.0, 0.0)), 150.0);
    }

    #[test]
    fn options_are_sorted_by_surcharge() {
        let options = time_window_options(&PricingConfig::standard());
        let keys: Vec<&str> = options.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["anytime", "10-3", "11-4", "12-2"]);
    }
}
