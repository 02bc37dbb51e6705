//! Yahoo Finance API client
//!
//! Price history comes from the chart API through `yahoo_finance_api`.
//! Company metadata comes from the `quoteSummary` API, which needs a
//! session cookie and a crumb token; both are obtained lazily and reused.

use crate::api::MarketDataProvider;
use crate::config::StockConfig;
use crate::domain::{CompanyProfile, Observation, ObservationSeries, Period, PriceHistory, Symbol};
use crate::error::{Result, StockError};
use async_trait::async_trait;
use chrono::DateTime;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const SUMMARY_MODULES: &str = "price,assetProfile,summaryDetail";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    connector: yahoo::YahooConnector,
    http: Client,
    rate_limiter: SharedRateLimiter,
    crumb: RwLock<Option<String>>,
    interval: String,
    request_timeout: Duration,
    fetch_profile: bool,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client from the session configuration
    pub fn new(config: &StockConfig) -> Result<Self> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| StockError::Provider(e.to_string()))?;

        let http = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        let per_minute = NonZeroU32::new(config.requests_per_minute).ok_or_else(|| {
            StockError::Config("requests_per_minute must be greater than 0".to_string())
        })?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Ok(Self {
            connector,
            http,
            rate_limiter,
            crumb: RwLock::new(None),
            interval: config.interval.clone(),
            request_timeout: config.request_timeout,
            fetch_profile: config.fetch_profile,
        })
    }

    /// Get historical closes and volumes for a symbol over a range
    pub async fn get_history(&self, symbol: &Symbol, period: Period) -> Result<ObservationSeries> {
        self.rate_limiter.until_ready().await;
        debug!(%symbol, %period, interval = %self.interval, "Fetching quote history");

        let request = self
            .connector
            .get_quote_range(symbol.as_str(), &self.interval, period.as_str());
        let response = tokio::time::timeout(self.request_timeout, request)
            .await
            .map_err(|_| StockError::Timeout {
                seconds: self.request_timeout.as_secs(),
            })?
            .map_err(|e| classify_yahoo_error(symbol, &e))?;

        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) => match classify_yahoo_error(symbol, &e) {
                // The chart API answers an empty window with an error rather
                // than an empty list
                StockError::NoData { .. } => Vec::new(),
                other => return Err(other),
            },
        };

        let observations = quotes
            .iter()
            .filter_map(|q| {
                let timestamp = DateTime::from_timestamp(q.timestamp as i64, 0)?;
                q.close
                    .is_finite()
                    .then(|| Observation::new(timestamp, q.close, q.volume))
            })
            .collect();

        Ok(ObservationSeries::new(observations))
    }

    /// Get company name, sector, market cap and 52-week range
    pub async fn get_company_profile(&self, symbol: &Symbol) -> Result<CompanyProfile> {
        let crumb = self.crumb().await?;

        self.rate_limiter.until_ready().await;
        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}");
        debug!(%url, "Fetching company profile");

        let response = self
            .http
            .get(&url)
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(StockError::NotFound {
                    symbol: symbol.to_string(),
                });
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                // Stale crumb; the next lookup fetches a fresh one
                self.invalidate_crumb().await;
                return Err(StockError::Provider(format!(
                    "quoteSummary rejected credentials ({})",
                    response.status()
                )));
            }
            status if !status.is_success() => {
                return Err(StockError::Provider(format!(
                    "quoteSummary HTTP error: {status}"
                )));
            }
            _ => {}
        }

        let body = response.text().await?;
        parse_quote_summary(&body)
    }

    async fn crumb(&self) -> Result<String> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        let mut slot = self.crumb.write().await;
        if let Some(crumb) = slot.as_ref() {
            return Ok(crumb.clone());
        }

        // Only the Set-Cookie header matters here; this endpoint answers 404
        if let Err(e) = self.http.get(COOKIE_URL).send().await {
            debug!(error = %e, "Cookie request failed, trying crumb anyway");
        }

        self.rate_limiter.until_ready().await;
        let response = self.http.get(CRUMB_URL).send().await?;
        if !response.status().is_success() {
            return Err(StockError::Provider(format!(
                "crumb request failed: {}",
                response.status()
            )));
        }

        let crumb = response.text().await?.trim().to_string();
        if !is_plausible_crumb(&crumb) {
            return Err(StockError::Parse("unexpected crumb payload".to_string()));
        }

        *slot = Some(crumb.clone());
        Ok(crumb)
    }

    async fn invalidate_crumb(&self) {
        *self.crumb.write().await = None;
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn fetch_history(&self, symbol: &Symbol, period: Period) -> Result<PriceHistory> {
        let series = self.get_history(symbol, period).await?;

        // Metadata only decorates the report; without it the fallbacks apply
        let profile = if self.fetch_profile && !series.is_empty() {
            match self.get_company_profile(symbol).await {
                Ok(profile) => profile,
                Err(e) => {
                    warn!(%symbol, error = %e, "Company profile unavailable");
                    CompanyProfile::default()
                }
            }
        } else {
            CompanyProfile::default()
        };

        Ok(PriceHistory { series, profile })
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}

/// Map a connector error onto our taxonomy.
///
/// The connector's error type does not expose HTTP status codes, so this
/// goes by the debug rendering, which carries the variant and payload.
fn classify_yahoo_error(symbol: &Symbol, err: &yahoo::YahooError) -> StockError {
    let detail = format!("{err:?}");
    classify_detail(symbol, &detail, &err.to_string())
}

fn classify_detail(symbol: &Symbol, detail: &str, message: &str) -> StockError {
    if detail.contains("404") || detail.contains("Not Found") || detail.contains("No data found")
    {
        StockError::NotFound {
            symbol: symbol.to_string(),
        }
    } else if detail.contains("EmptyDataSet") || detail.contains("NoQuotes") || detail.contains("NoResult")
    {
        StockError::NoData {
            symbol: symbol.to_string(),
        }
    } else if detail.contains("Deserialize") || detail.contains("InvalidJson") {
        StockError::Parse(message.to_string())
    } else {
        StockError::Provider(message.to_string())
    }
}

fn is_plausible_crumb(crumb: &str) -> bool {
    !crumb.is_empty() && crumb.len() <= 64 && !crumb.contains(char::is_whitespace) && !crumb.contains('<')
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryEnvelope {
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    #[serde(default)]
    result: Option<Vec<SummaryResult>>,
    #[serde(default)]
    error: Option<SummaryError>,
}

#[derive(Debug, Deserialize)]
struct SummaryError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    asset_profile: Option<AssetProfileModule>,
    #[serde(default)]
    summary_detail: Option<SummaryDetailModule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    market_cap: Option<RawNumber>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfileModule {
    #[serde(default)]
    sector: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetailModule {
    #[serde(default)]
    market_cap: Option<RawNumber>,
    #[serde(default)]
    fifty_two_week_high: Option<RawNumber>,
    #[serde(default)]
    fifty_two_week_low: Option<RawNumber>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`, or `{}` when unknown
#[derive(Debug, Default, Deserialize)]
struct RawNumber {
    #[serde(default)]
    raw: Option<f64>,
}

fn raw(value: Option<&RawNumber>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| v.is_finite())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Turn a `quoteSummary` response body into a profile
fn parse_quote_summary(body: &str) -> Result<CompanyProfile> {
    let envelope: QuoteSummaryEnvelope = serde_json::from_str(body)?;
    let summary = envelope.quote_summary;

    if let Some(err) = summary.error {
        let description = err
            .description
            .or(err.code)
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(StockError::Provider(description));
    }

    let result = summary
        .result
        .and_then(|mut results| (!results.is_empty()).then(|| results.swap_remove(0)))
        .unwrap_or_default();

    let price = result.price.unwrap_or_default();
    let detail = result.summary_detail.unwrap_or_default();

    Ok(CompanyProfile {
        long_name: non_blank(price.long_name).or_else(|| non_blank(price.short_name)),
        sector: non_blank(result.asset_profile.and_then(|p| p.sector)),
        market_cap: raw(detail.market_cap.as_ref()).or_else(|| raw(price.market_cap.as_ref())),
        fifty_two_week_high: raw(detail.fifty_two_week_high.as_ref()),
        fifty_two_week_low: raw(detail.fifty_two_week_low.as_ref()),
    })
}
