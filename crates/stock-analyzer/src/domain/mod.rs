//! Domain types shared by the provider, metrics, report and chart layers

pub mod models;
pub mod period;
pub mod symbol;

pub use models::{CompanyProfile, Observation, ObservationSeries, PriceHistory, StockSnapshot};
pub use period::Period;
pub use symbol::{MAX_SYMBOL_LEN, Symbol};
