use crate::demo::{
    run_cancel, run_demo, run_quote, run_settle, CancelArgs, DemoArgs, QuoteArgs, SettleArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use cleanbook::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Cleanbook Pricing",
    about = "Serve and explore cleaning-job pricing, payouts, and cancellation policy",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Quote a cleaning job for a home
    Quote(QuoteArgs),
    /// Show how a job's price is split between the platform and its cleaners
    Settle(SettleArgs),
    /// Preview the refund and payout for cancelling a booked job
    Cancel(CancelArgs),
    /// Walk through a booking, payout, and cancellation with the active pricing
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quote(args) => run_quote(args).await,
        Command::Settle(args) => run_settle(args).await,
        Command::Cancel(args) => run_cancel(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
