//! Configuration for stock analysis sessions

use crate::domain::Period;
use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest chart area that still leaves room for axes and labels
pub const MIN_CHART_WIDTH: u16 = 20;
pub const MIN_CHART_HEIGHT: u16 = 8;

/// Size of the terminal charts, in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 24,
        }
    }
}

/// Configuration for stock analysis sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// History window requested for every symbol
    pub period: Period,

    /// Bar interval passed to the provider (e.g. "1d", "1wk")
    pub interval: String,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Maximum provider requests per minute
    pub requests_per_minute: u32,

    /// Look up company name, sector, market cap and 52-week range
    pub fetch_profile: bool,

    /// Terminal chart dimensions
    pub chart: ChartConfig,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            period: Period::OneMonth,
            interval: "1d".to_string(),
            request_timeout: Duration::from_secs(30),
            requests_per_minute: 60,
            fetch_profile: true,
            chart: ChartConfig::default(),
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.interval.trim().is_empty() {
            return Err(StockError::Config("interval must not be empty".to_string()));
        }

        if self.requests_per_minute == 0 {
            return Err(StockError::Config(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(StockError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.chart.width < MIN_CHART_WIDTH || self.chart.height < MIN_CHART_HEIGHT {
            return Err(StockError::Config(format!(
                "chart must be at least {MIN_CHART_WIDTH}x{MIN_CHART_HEIGHT}, got {}x{}",
                self.chart.width, self.chart.height
            )));
        }

        Ok(())
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    period: Option<Period>,
    interval: Option<String>,
    request_timeout: Option<Duration>,
    requests_per_minute: Option<u32>,
    fetch_profile: Option<bool>,
    chart_width: Option<u16>,
    chart_height: Option<u16>,
}

impl StockConfigBuilder {
    /// Set the history window
    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    /// Set the bar interval
    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the provider request budget
    pub fn requests_per_minute(mut self, limit: u32) -> Self {
        self.requests_per_minute = Some(limit);
        self
    }

    /// Enable or disable company profile lookups
    pub fn fetch_profile(mut self, enabled: bool) -> Self {
        self.fetch_profile = Some(enabled);
        self
    }

    /// Set chart width in columns
    pub fn chart_width(mut self, width: u16) -> Self {
        self.chart_width = Some(width);
        self
    }

    /// Set chart height in rows
    pub fn chart_height(mut self, height: u16) -> Self {
        self.chart_height = Some(height);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            period: self.period.unwrap_or(defaults.period),
            interval: self.interval.unwrap_or(defaults.interval),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            requests_per_minute: self
                .requests_per_minute
                .unwrap_or(defaults.requests_per_minute),
            fetch_profile: self.fetch_profile.unwrap_or(defaults.fetch_profile),
            chart: ChartConfig {
                width: self.chart_width.unwrap_or(defaults.chart.width),
                height: self.chart_height.unwrap_or(defaults.chart.height),
            },
        };

        config.validate()?;
        Ok(config)
    }
}
