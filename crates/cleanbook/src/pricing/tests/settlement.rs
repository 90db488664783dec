use super::common::*;
use crate::pricing::{
    compute_provider_share, format_currency, settle, summarize_payouts, PlatformFees,
    ProviderRole, SettlementInput,
};

const ROLES: [ProviderRole; 3] = [
    ProviderRole::MarketplaceCleaner,
    ProviderRole::BusinessEmployee,
    ProviderRole::MultiCleanerTeamMember,
];

#[test]
fn share_and_fee_reconstruct_the_per_provider_gross() {
    let mut config = standard_config();

    for fee in [0.0, 0.05, 0.1, 0.13, 0.5, 0.99, 1.0] {
        config.platform = PlatformFees {
            fee_percent: Some(fee),
            business_owner_fee_percent: Some(fee),
            multi_cleaner_platform_fee_percent: Some(fee),
        };
        for role in ROLES {
            for providers in 1..=4 {
                let input = SettlementInput::new(237.5, providers, role);
                let share = compute_provider_share(&config, &input);
                let gross = 237.5 / f64::from(providers);
                assert!(
                    approx_eq(share + 237.5 * fee / f64::from(providers), gross),
                    "fee {fee} role {role:?} providers {providers}"
                );
            }
        }
    }
}

#[test]
fn missing_fee_defaults_to_ten_percent() {
    let mut config = standard_config();
    config.platform = PlatformFees::default();

    let input = SettlementInput::new(150.0, 1, ProviderRole::MarketplaceCleaner);
    let share = compute_provider_share(&config, &input);

    assert_eq!(format_currency(share), "135.00");
}

#[test]
fn explicit_zero_fee_is_not_replaced_by_the_default() {
    let mut config = standard_config();
    config.platform.business_owner_fee_percent = Some(0.0);

    let input = SettlementInput::new(150.0, 1, ProviderRole::BusinessEmployee);
    let settlement = settle(&config, &input);

    assert_eq!(settlement.fee_fraction, 0.0);
    assert_eq!(settlement.provider_share, 150.0);
    assert_eq!(settlement.platform_fee, 0.0);
}

#[test]
fn each_role_reads_its_own_fraction() {
    let config = standard_config();

    let marketplace = settle(
        &config,
        &SettlementInput::new(200.0, 1, ProviderRole::MarketplaceCleaner),
    );
    let employee = settle(
        &config,
        &SettlementInput::new(200.0, 1, ProviderRole::BusinessEmployee),
    );
    let team = settle(
        &config,
        &SettlementInput::new(200.0, 1, ProviderRole::MultiCleanerTeamMember),
    );

    assert_eq!(marketplace.fee_fraction, 0.10);
    assert_eq!(employee.fee_fraction, 0.10);
    assert_eq!(team.fee_fraction, 0.13);
    assert!(approx_eq(team.provider_share, 174.0));
}

#[test]
fn team_jobs_split_evenly_before_the_fee() {
    let config = standard_config();
    let input = SettlementInput::new(300.0, 3, ProviderRole::MultiCleanerTeamMember);

    let settlement = settle(&config, &input);

    assert_eq!(settlement.per_provider_gross, 100.0);
    assert!(approx_eq(settlement.provider_share, 87.0));
    assert!(approx_eq(settlement.platform_fee, 13.0));
}

#[test]
fn share_follows_the_current_config() {
    let mut config = standard_config();
    let input = SettlementInput::new(100.0, 1, ProviderRole::MarketplaceCleaner);
    let before = compute_provider_share(&config, &input);

    config.platform.fee_percent = Some(0.2);
    let after = compute_provider_share(&config, &input);

    assert!(approx_eq(before, 90.0));
    assert!(approx_eq(after, 80.0));
}

#[test]
fn payout_summary_totals_a_pay_period() {
    let config = standard_config();
    let jobs = [
        SettlementInput::new(150.0, 1, ProviderRole::BusinessEmployee),
        SettlementInput::new(250.0, 1, ProviderRole::BusinessEmployee),
        SettlementInput::new(400.0, 2, ProviderRole::MultiCleanerTeamMember),
    ];

    let summary = summarize_payouts(&config, &jobs);

    assert_eq!(summary.jobs, 3);
    assert!(approx_eq(summary.gross, 600.0));
    assert!(approx_eq(summary.platform_fees, 15.0 + 25.0 + 26.0));
    assert!(approx_eq(summary.provider_payout, 135.0 + 225.0 + 174.0));
    assert!(approx_eq(summary.gross, summary.platform_fees + summary.provider_payout));
}

#[test]
fn empty_pay_period_is_all_zero() {
    let summary = summarize_payouts(&standard_config(), &[]);
    assert_eq!(summary.jobs, 0);
    assert_eq!(summary.provider_payout, 0.0);
}

#[test]
fn repeated_settlements_are_identical() {
    let config = standard_config();
    let input = SettlementInput::new(199.99, 3, ProviderRole::MultiCleanerTeamMember);
    assert_eq!(settle(&config, &input), settle(&config, &input));
}
