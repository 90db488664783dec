use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::coerce::{lenient_optional_number, signed_number};

/// Platform fee applied when a snapshot leaves a role's fraction unset.
pub const DEFAULT_PLATFORM_FEE: f64 = 0.10;

/// Key used for the no-preference arrival window.
pub const ANYTIME_WINDOW: &str = "anytime";

/// Immutable pricing snapshot. A refresh always produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    #[serde(deserialize_with = "signed_number")]
    pub base_price: f64,
    #[serde(deserialize_with = "signed_number")]
    pub extra_bed_bath_fee: f64,
    #[serde(deserialize_with = "signed_number")]
    pub half_bath_fee: f64,
    pub linens: LinenFees,
    #[serde(default, deserialize_with = "normalize_time_windows")]
    pub time_windows: BTreeMap<String, TimeWindowRate>,
    pub cancellation: CancellationPolicy,
    #[serde(default)]
    pub platform: PlatformFees,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinenFees {
    #[serde(deserialize_with = "signed_number")]
    pub sheet_fee_per_bed: f64,
    #[serde(deserialize_with = "signed_number")]
    pub towel_fee: f64,
    #[serde(default, deserialize_with = "signed_number")]
    pub face_cloth_fee: f64,
}

/// Normalized time-window entry. Both wire shapes collapse into this.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeWindowRate {
    pub surcharge: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationPolicy {
    #[serde(deserialize_with = "signed_number")]
    pub fee: f64,
    #[serde(deserialize_with = "signed_number")]
    pub window_days: f64,
    #[serde(deserialize_with = "signed_number")]
    pub homeowner_penalty_days: f64,
    #[serde(deserialize_with = "signed_number")]
    pub refund_percentage: f64,
}

/// Fee fractions per provider role; `None` falls back to [`DEFAULT_PLATFORM_FEE`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformFees {
    #[serde(
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee_percent: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub business_owner_fee_percent: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub multi_cleaner_platform_fee_percent: Option<f64>,
}

impl PricingConfig {
    /// Compiled-in snapshot used whenever the remote source is unavailable.
    pub fn standard() -> Self {
        let mut time_windows = BTreeMap::new();
        let defaults = [
            (ANYTIME_WINDOW, 0.0),
            ("10-3", 25.0),
            ("11-4", 25.0),
            ("12-2", 30.0),
        ];
        for (key, surcharge) in defaults {
            time_windows.insert(
                key.to_string(),
                TimeWindowRate {
                    surcharge,
                    label: fallback_label(key),
                },
            );
        }

        Self {
            base_price: 150.0,
            extra_bed_bath_fee: 50.0,
            half_bath_fee: 25.0,
            linens: LinenFees {
                sheet_fee_per_bed: 30.0,
                towel_fee: 5.0,
                face_cloth_fee: 2.0,
            },
            time_windows,
            cancellation: CancellationPolicy {
                fee: 25.0,
                window_days: 7.0,
                homeowner_penalty_days: 3.0,
                refund_percentage: 0.5,
            },
            platform: PlatformFees {
                fee_percent: Some(0.10),
                business_owner_fee_percent: Some(0.10),
                multi_cleaner_platform_fee_percent: Some(0.13),
            },
        }
    }

    /// Surcharge and label for a window key. Unknown keys resolve to `None`.
    pub fn time_window(&self, key: &str) -> Option<&TimeWindowRate> {
        self.time_windows.get(key)
    }

    /// Checks the non-negative and fraction-bound invariants.
    pub fn validate(&self) -> Result<(), InvalidPricingConfig> {
        let mut violations = Vec::new();

        let amounts = [
            ("basePrice", self.base_price),
            ("extraBedBathFee", self.extra_bed_bath_fee),
            ("halfBathFee", self.half_bath_fee),
            ("linens.sheetFeePerBed", self.linens.sheet_fee_per_bed),
            ("linens.towelFee", self.linens.towel_fee),
            ("linens.faceClothFee", self.linens.face_cloth_fee),
            ("cancellation.fee", self.cancellation.fee),
            ("cancellation.windowDays", self.cancellation.window_days),
            (
                "cancellation.homeownerPenaltyDays",
                self.cancellation.homeowner_penalty_days,
            ),
        ];
        for (field, value) in amounts {
            if !(value >= 0.0) {
                violations.push(ConfigViolation::new(field, value, ViolationKind::Negative));
            }
        }

        for (key, rate) in &self.time_windows {
            if !(rate.surcharge >= 0.0) {
                violations.push(ConfigViolation::new(
                    format!("timeWindows.{key}.surcharge"),
                    rate.surcharge,
                    ViolationKind::Negative,
                ));
            }
        }

        let fractions = [
            (
                "cancellation.refundPercentage",
                Some(self.cancellation.refund_percentage),
            ),
            ("platform.feePercent", self.platform.fee_percent),
            (
                "platform.businessOwnerFeePercent",
                self.platform.business_owner_fee_percent,
            ),
            (
                "platform.multiCleanerPlatformFeePercent",
                self.platform.multi_cleaner_platform_fee_percent,
            ),
        ];
        for (field, value) in fractions {
            let Some(value) = value else { continue };
            if !(value >= 0.0) {
                violations.push(ConfigViolation::new(field, value, ViolationKind::Negative));
            } else if value > 1.0 {
                violations.push(ConfigViolation::new(field, value, ViolationKind::AboveOne));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(InvalidPricingConfig { violations })
        }
    }
}

/// Display label for the well-known window keys; other keys label themselves.
pub fn fallback_label(key: &str) -> String {
    match key {
        ANYTIME_WINDOW => "Anytime".to_string(),
        "10-3" => "10am - 3pm".to_string(),
        "11-4" => "11am - 4pm".to_string(),
        "12-2" => "12pm - 2pm".to_string(),
        other => other.to_string(),
    }
}

/// Wire shapes accepted for a `timeWindows` value.
#[derive(Deserialize)]
#[serde(untagged)]
enum TimeWindowValue {
    Detailed {
        #[serde(deserialize_with = "signed_number")]
        surcharge: f64,
        #[serde(default)]
        label: Option<String>,
    },
    Legacy(#[serde(deserialize_with = "signed_number")] f64),
}

fn normalize_time_windows<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, TimeWindowRate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, TimeWindowValue>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let rate = match value {
                TimeWindowValue::Detailed { surcharge, label } => TimeWindowRate {
                    surcharge,
                    label: label
                        .filter(|label| !label.trim().is_empty())
                        .unwrap_or_else(|| fallback_label(&key)),
                },
                TimeWindowValue::Legacy(surcharge) => TimeWindowRate {
                    surcharge,
                    label: fallback_label(&key),
                },
            };
            (key, rate)
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Negative,
    AboveOne,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigViolation {
    pub field: String,
    pub value: f64,
    pub kind: ViolationKind,
}

impl ConfigViolation {
    fn new(field: impl Into<String>, value: f64, kind: ViolationKind) -> Self {
        Self {
            field: field.into(),
            value,
            kind,
        }
    }
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::Negative => {
                write!(f, "{} must be non-negative (got {})", self.field, self.value)
            }
            ViolationKind::AboveOne => {
                write!(f, "{} must be at most 1 (got {})", self.field, self.value)
            }
        }
    }
}

/// Every invariant violation found in a snapshot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid pricing config: {}", summarize(.violations))]
pub struct InvalidPricingConfig {
    pub violations: Vec<ConfigViolation>,
}

fn summarize(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
