//! Stock Analyzer CLI
//!
//! Prompts for ticker symbols, prints a summary for each and offers price
//! charts in the terminal.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin stock-analyzer -- --period 3mo
//!
//! # More logging on stderr
//! RUST_LOG=stock_analyzer=debug cargo run --bin stock-analyzer
//! ```

use clap::Parser;
use std::io::{self, Write};
use std::time::Duration;
use stock_analyzer::{
    Period, SessionController, SessionOutcome, StockConfig, TerminalChartRenderer,
    YahooFinanceClient,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stock-analyzer")]
#[command(about = "Summarize and chart recent stock prices", long_about = None)]
struct Args {
    /// History window: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max
    #[arg(short, long, default_value = "1mo")]
    period: Period,

    /// Bar interval requested from the provider
    #[arg(short, long, default_value = "1d")]
    interval: String,

    /// Network timeout per request, in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Skip company name, sector and market cap lookups
    #[arg(long)]
    no_profile: bool,

    /// Chart width in columns
    #[arg(long, default_value_t = 100)]
    chart_width: u16,

    /// Chart height in rows
    #[arg(long, default_value_t = 24)]
    chart_height: u16,

    /// Debug logging for this crate on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    stock_utils::init_tracing(if args.verbose {
        "warn,stock_analyzer=debug"
    } else {
        stock_utils::DEFAULT_DIRECTIVE
    });

    let config = StockConfig::builder()
        .period(args.period)
        .interval(args.interval)
        .request_timeout(Duration::from_secs(args.timeout_secs))
        .fetch_profile(!args.no_profile)
        .chart_width(args.chart_width)
        .chart_height(args.chart_height)
        .build()?;
    info!(?config, "Starting stock-analyzer");

    let provider = YahooFinanceClient::new(&config)?;
    let charts = TerminalChartRenderer::new(config.chart);
    let session = SessionController::new(provider, charts, config.period);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let outcome = session.run(&mut stdin.lock(), &mut stdout).await?;
    stdout.flush()?;

    if outcome == SessionOutcome::Quit {
        info!("Exited before analysis");
    }

    Ok(())
}
