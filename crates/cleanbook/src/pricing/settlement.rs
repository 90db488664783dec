use serde::{Deserialize, Serialize};

use super::coerce::{lenient_number, sanitize};
use super::config::{PlatformFees, PricingConfig, DEFAULT_PLATFORM_FEE};

/// Who performs the job; selects which platform fee applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProviderRole {
    #[default]
    MarketplaceCleaner,
    BusinessEmployee,
    MultiCleanerTeamMember,
}

impl ProviderRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MarketplaceCleaner => "Marketplace cleaner",
            Self::BusinessEmployee => "Business employee",
            Self::MultiCleanerTeamMember => "Team cleaner",
        }
    }

    /// Fee fraction for this role. Only a missing value takes the 10% default;
    /// an explicit `0.0` stays zero.
    pub fn fee_fraction(self, fees: &PlatformFees) -> f64 {
        let configured = match self {
            Self::MarketplaceCleaner => fees.fee_percent,
            Self::BusinessEmployee => fees.business_owner_fee_percent,
            Self::MultiCleanerTeamMember => fees.multi_cleaner_platform_fee_percent,
        };
        configured
            .filter(|fraction| fraction.is_finite())
            .unwrap_or(DEFAULT_PLATFORM_FEE)
            .clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementInput {
    #[serde(deserialize_with = "lenient_number")]
    pub gross_price: f64,
    #[serde(default = "single_provider")]
    pub num_providers: u32,
    #[serde(default)]
    pub provider_role: ProviderRole,
}

fn single_provider() -> u32 {
    1
}

impl SettlementInput {
    pub fn new(gross_price: f64, num_providers: u32, provider_role: ProviderRole) -> Self {
        Self {
            gross_price,
            num_providers,
            provider_role,
        }
    }
}

/// One provider's slice of a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub provider_role: ProviderRole,
    pub num_providers: u32,
    pub fee_fraction: f64,
    pub per_provider_gross: f64,
    pub platform_fee: f64,
    pub provider_share: f64,
}

/// Amount paid to one provider before any caller-level weighting.
pub fn compute_provider_share(config: &PricingConfig, input: &SettlementInput) -> f64 {
    settle(config, input).provider_share
}

pub fn settle(config: &PricingConfig, input: &SettlementInput) -> Settlement {
    let fee_fraction = input.provider_role.fee_fraction(&config.platform);
    let num_providers = input.num_providers.max(1);
    let per_provider_gross = sanitize(input.gross_price) / f64::from(num_providers);

    Settlement {
        provider_role: input.provider_role,
        num_providers,
        fee_fraction,
        per_provider_gross,
        platform_fee: per_provider_gross * fee_fraction,
        provider_share: per_provider_gross * (1.0 - fee_fraction),
    }
}

/// Totals for one provider across a batch of jobs, as used by payroll exports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSummary {
    pub jobs: usize,
    pub gross: f64,
    pub platform_fees: f64,
    pub provider_payout: f64,
}

pub fn summarize_payouts(config: &PricingConfig, jobs: &[SettlementInput]) -> PayoutSummary {
    jobs.iter()
        .map(|job| settle(config, job))
        .fold(PayoutSummary::default(), |mut summary, settlement| {
            summary.jobs += 1;
            summary.gross += settlement.per_provider_gross;
            summary.platform_fees += settlement.platform_fee;
            summary.provider_payout += settlement.provider_share;
            summary
        })
}
