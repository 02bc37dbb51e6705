use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Symbol;

/// One bar of the price history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub volume: u64,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, close: f64, volume: u64) -> Self {
        Self {
            timestamp,
            close,
            volume,
        }
    }
}

/// Chronologically ordered price history. An empty series means "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationSeries(Vec<Observation>);

impl ObservationSeries {
    /// Build a series, ordering observations by timestamp.
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.timestamp);
        Self(observations)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.0.iter()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.0.iter().map(|o| o.close).collect()
    }
}

impl From<Vec<Observation>> for ObservationSeries {
    fn from(observations: Vec<Observation>) -> Self {
        Self::new(observations)
    }
}

impl<'a> IntoIterator for &'a ObservationSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Static company metadata. Providers fill in what they know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub market_cap: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

/// Everything a provider returns for one symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub series: ObservationSeries,
    pub profile: CompanyProfile,
}

/// Presentation-ready summary of one symbol over the fetched window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub symbol: Symbol,
    pub company_name: String,
    pub sector: Option<String>,
    pub market_cap: Option<f64>,
    /// Mean volume across the window
    pub volume: f64,
    pub high_52wk: f64,
    pub low_52wk: f64,
    /// Close of the last observation in the window
    pub current_price: f64,
    /// Close of the first observation in the window
    pub previous_price: f64,
    pub change: f64,
    /// `None` when the window opened at a price of zero
    pub change_percent: Option<f64>,
    pub history: ObservationSeries,
}
