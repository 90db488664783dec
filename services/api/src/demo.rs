use crate::infra::resolve_pricing;
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use cleanbook::error::AppError;
use cleanbook::pricing::{
    days_until, evaluate, format_currency, quote_breakdown, settle, time_window_options,
    CancellationContext, CancellationOutcome, HomeAttributes, JobQuoteRequest, PricingConfig,
    ProviderRole, QuoteBreakdown, ResolvedPricing, Settlement, SettlementInput,
};

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Bedrooms in the home (non-numeric values count as zero)
    #[arg(long, default_value = "1")]
    pub(crate) beds: String,
    /// Bathrooms in the home, halves allowed (e.g. 2.5)
    #[arg(long, default_value = "1")]
    pub(crate) baths: String,
    /// Arrival window key (e.g. 10-3); omitted means anytime
    #[arg(long)]
    pub(crate) window: Option<String>,
    /// Add fresh sheets for every bed
    #[arg(long)]
    pub(crate) sheets: bool,
    /// Add fresh towels for every bathroom
    #[arg(long)]
    pub(crate) towels: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RoleArg {
    Marketplace,
    Employee,
    TeamMember,
}

impl From<RoleArg> for ProviderRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Marketplace => ProviderRole::MarketplaceCleaner,
            RoleArg::Employee => ProviderRole::BusinessEmployee,
            RoleArg::TeamMember => ProviderRole::MultiCleanerTeamMember,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct SettleArgs {
    /// Job price charged to the client
    #[arg(long)]
    pub(crate) gross: f64,
    /// Cleaners sharing the job
    #[arg(long, default_value_t = 1)]
    pub(crate) providers: u32,
    /// Who performs the job
    #[arg(long, value_enum, default_value_t = RoleArg::Marketplace)]
    pub(crate) role: RoleArg,
}

#[derive(Args, Debug)]
pub(crate) struct CancelArgs {
    /// Price the client paid
    #[arg(long)]
    pub(crate) price: f64,
    /// Pre-discount price, when a discount was applied
    #[arg(long)]
    pub(crate) original_price: Option<f64>,
    /// Appointment date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) appointment: NaiveDate,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// A cleaner has accepted the job
    #[arg(long)]
    pub(crate) cleaner_assigned: bool,
    /// The client booked with a discount
    #[arg(long)]
    pub(crate) discount_applied: bool,
    /// Cleaner share fraction promised with the discount incentive
    #[arg(long)]
    pub(crate) incentive_percent: Option<f64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let resolved = resolve_pricing().await?;
    render_source(&resolved);

    let request = JobQuoteRequest {
        home: HomeAttributes::from_raw(&args.beds, &args.baths),
        time_window: args.window,
        sheets: args.sheets,
        towels: args.towels,
    };
    let breakdown = quote_breakdown(&resolved.pricing, &request);
    render_quote(&request, &breakdown);
    Ok(())
}

pub(crate) async fn run_settle(args: SettleArgs) -> Result<(), AppError> {
    let resolved = resolve_pricing().await?;
    render_source(&resolved);

    let input = SettlementInput::new(args.gross, args.providers, args.role.into());
    render_settlement(&settle(&resolved.pricing, &input));
    Ok(())
}

pub(crate) async fn run_cancel(args: CancelArgs) -> Result<(), AppError> {
    let resolved = resolve_pricing().await?;
    render_source(&resolved);

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let ctx = CancellationContext {
        price: args.price,
        original_price: args.original_price,
        days_until_appointment: days_until(args.appointment, today),
        has_cleaner_assigned: args.cleaner_assigned,
        discount_applied: args.discount_applied,
        incentive_cleaner_percent: args.incentive_percent,
    };
    render_cancellation(&evaluate(&resolved.pricing, &ctx));
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let resolved = resolve_pricing().await?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let pricing = &resolved.pricing;

    println!("Cleanbook pricing demo (evaluated {today})");
    render_source(&resolved);
    render_windows(pricing);

    let request = JobQuoteRequest {
        home: HomeAttributes::new(3.0, 2.5),
        time_window: Some("10-3".to_string()),
        sheets: true,
        towels: true,
    };
    println!("\nBooking a 3 bed / 2.5 bath home");
    let breakdown = quote_breakdown(pricing, &request);
    render_quote(&request, &breakdown);

    println!("\nSolo marketplace cleaner");
    render_settlement(&settle(
        pricing,
        &SettlementInput::new(breakdown.total, 1, ProviderRole::MarketplaceCleaner),
    ));
    println!("\nTwo-cleaner team");
    render_settlement(&settle(
        pricing,
        &SettlementInput::new(breakdown.total, 2, ProviderRole::MultiCleanerTeamMember),
    ));

    let appointment = today + chrono::Duration::days(2);
    println!("\nClient cancels for {appointment} with a cleaner assigned");
    render_cancellation(&evaluate(
        pricing,
        &CancellationContext {
            price: breakdown.total,
            original_price: None,
            days_until_appointment: days_until(appointment, today),
            has_cleaner_assigned: true,
            discount_applied: false,
            incentive_cleaner_percent: None,
        },
    ));

    Ok(())
}

fn render_source(resolved: &ResolvedPricing) {
    if resolved.is_fallback() {
        println!("Pricing: default configuration (live pricing unavailable)");
        if let Some(advisory) = &resolved.advisory {
            println!("  reason: {advisory}");
        }
    } else {
        println!("Pricing: live configuration");
    }
}

fn render_windows(pricing: &PricingConfig) {
    println!("\nArrival windows");
    for option in time_window_options(pricing) {
        println!(
            "- {} ({}): +${}",
            option.label,
            option.key,
            format_currency(option.surcharge)
        );
    }
}

fn render_quote(request: &JobQuoteRequest, breakdown: &QuoteBreakdown) {
    println!(
        "Home: {} bed / {} bath",
        request.home.num_beds, request.home.num_baths
    );
    println!("- Base + rooms: ${}", format_currency(breakdown.structural));
    println!(
        "- Arrival window {}: ${}",
        breakdown.time_window.label,
        format_currency(breakdown.surcharge)
    );
    println!("- Linens: ${}", format_currency(breakdown.linens));
    println!("Total: ${}", format_currency(breakdown.total));
}

fn render_settlement(settlement: &Settlement) {
    println!(
        "{} x{} | fee {:.0}%",
        settlement.provider_role.label(),
        settlement.num_providers,
        settlement.fee_fraction * 100.0
    );
    println!(
        "- Per cleaner: ${} gross, ${} platform fee, ${} payout",
        format_currency(settlement.per_provider_gross),
        format_currency(settlement.platform_fee),
        format_currency(settlement.provider_share)
    );
}

fn render_cancellation(outcome: &CancellationOutcome) {
    println!(
        "- Refund: ${} ({:.0}%)",
        outcome.estimated_refund, outcome.refund_percent
    );
    println!("- Cleaner payout: ${}", outcome.cleaner_payout);
    if let Some(keeps) = &outcome.platform_keeps {
        println!("- Platform keeps: ${keeps}");
    }
    if outcome.platform_subsidizes {
        println!("- Note: the platform is subsidizing this incentive");
    }
    if let Some(fee) = &outcome.cancellation_fee {
        println!("- Cancellation fee: ${fee}");
    }
    println!("{}", outcome.warning_message);
}
