//! Interactive stock price summaries and terminal charts
//!
//! This crate fetches recent price history for a list of ticker symbols,
//! prints a short summary for each and can draw price charts in the
//! terminal. It includes:
//!
//! - A provider abstraction with a Yahoo Finance implementation
//! - Window-relative metrics (change, percent change, mean volume, 52-week band)
//! - Deterministic plain-text reports
//! - Single-symbol and normalized multi-symbol line charts
//! - An interactive session that ties the pieces together
//!
//! # Example
//!
//! ```rust,ignore
//! use stock_analyzer::{SessionController, StockConfig, TerminalChartRenderer, YahooFinanceClient};
//! use std::io;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StockConfig::default();
//!     let provider = YahooFinanceClient::new(&config)?;
//!     let charts = TerminalChartRenderer::new(config.chart);
//!     let session = SessionController::new(provider, charts, config.period);
//!
//!     session.run(&mut io::stdin().lock(), &mut io::stdout()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod report;
pub mod session;

// Re-export main types for convenience
pub use api::{MarketDataProvider, YahooFinanceClient};
pub use chart::{ChartRenderer, TerminalChartRenderer, normalize};
pub use config::{ChartConfig, StockConfig};
pub use domain::{
    CompanyProfile, Observation, ObservationSeries, Period, PriceHistory, StockSnapshot, Symbol,
};
pub use error::{Result, StockError};
pub use metrics::compute_snapshot;
pub use report::format_snapshot;
pub use session::{SessionController, SessionOutcome};
