//! Market data providers

pub mod yahoo;

use async_trait::async_trait;

use crate::domain::{Period, PriceHistory, Symbol};
use crate::error::Result;

pub use yahoo::YahooFinanceClient;

/// Source of price history and company metadata.
///
/// An `Ok` with an empty series is a valid answer meaning "no data"; callers
/// decide what to do with it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the observations for `symbol` over `period`, plus whatever
    /// static metadata the provider has.
    async fn fetch_history(&self, symbol: &Symbol, period: Period) -> Result<PriceHistory>;

    /// Short provider name for logs
    fn name(&self) -> &'static str;
}
