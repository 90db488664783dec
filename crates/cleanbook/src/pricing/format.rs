use super::coerce::sanitize;

/// Display form of a currency amount. Negative and non-finite values show as `0.00`;
/// keep the raw number around when the sign matters.
pub fn format_currency(amount: f64) -> String {
    format!("{:.2}", sanitize(amount))
}
