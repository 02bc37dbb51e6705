//! Summary metrics derived from a price history

use crate::domain::{CompanyProfile, ObservationSeries, PriceHistory, StockSnapshot, Symbol};
use crate::error::{Result, StockError};

/// Build the snapshot for `symbol` from its history and profile.
///
/// "Previous" price is the first close of the fetched window, not the prior
/// trading day, so the change reads as performance over the whole window.
pub fn compute_snapshot(
    symbol: &Symbol,
    series: ObservationSeries,
    profile: CompanyProfile,
) -> Result<StockSnapshot> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(StockError::NoData {
            symbol: symbol.to_string(),
        });
    };

    let previous_price = first.close;
    let current_price = last.close;
    let change = current_price - previous_price;

    Ok(StockSnapshot {
        symbol: symbol.clone(),
        company_name: profile.long_name.unwrap_or_else(|| symbol.to_string()),
        sector: profile.sector,
        market_cap: profile.market_cap,
        volume: mean_volume(&series),
        high_52wk: profile.fifty_two_week_high.unwrap_or(current_price),
        low_52wk: profile.fifty_two_week_low.unwrap_or(current_price),
        current_price,
        previous_price,
        change,
        change_percent: percent_change(previous_price, current_price),
        history: series,
    })
}

/// Convenience wrapper for a provider response
pub fn snapshot_from_history(symbol: &Symbol, history: PriceHistory) -> Result<StockSnapshot> {
    compute_snapshot(symbol, history.series, history.profile)
}

/// Percent move from `from` to `to`; `None` when `from` is zero.
pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    let pct = (to - from) / from * 100.0;
    pct.is_finite().then_some(pct)
}

/// Arithmetic mean of the per-bar volumes; zero for an empty series.
pub fn mean_volume(series: &ObservationSeries) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let total: f64 = series.iter().map(|o| o.volume as f64).sum();
    total / series.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use chrono::{Duration, TimeZone, Utc};

    fn series(closes: &[f64], volumes: &[u64]) -> ObservationSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap();
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, &volume))| {
                Observation::new(start + Duration::days(i as i64), close, volume)
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn sym(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    #[test]
    fn test_change_over_window() {
        let snapshot = compute_snapshot(
            &sym("AAPL"),
            series(&[100.0, 90.0, 80.0], &[10, 20, 30]),
            CompanyProfile::default(),
        )
        .unwrap();

        assert_eq!(snapshot.current_price, 80.0);
        assert_eq!(snapshot.previous_price, 100.0);
        assert!((snapshot.change - -20.0).abs() < 1e-9);
        assert!((snapshot.change_percent.unwrap() - -20.0).abs() < 1e-9);
        assert!((snapshot.volume - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_series_is_no_data() {
        let err = compute_snapshot(
            &sym("AAPL"),
            ObservationSeries::default(),
            CompanyProfile::default(),
        )
        .unwrap_err();

        assert!(matches!(err, StockError::NoData { ref symbol } if symbol == "AAPL"));
    }

    #[test]
    fn test_missing_profile_falls_back() {
        let snapshot = compute_snapshot(
            &sym("MSFT"),
            series(&[400.0, 410.5], &[1, 1]),
            CompanyProfile::default(),
        )
        .unwrap();

        assert_eq!(snapshot.company_name, "MSFT");
        assert!(snapshot.sector.is_none());
        assert!(snapshot.market_cap.is_none());
        assert_eq!(snapshot.high_52wk, 410.5);
        assert_eq!(snapshot.low_52wk, 410.5);
    }

    #[test]
    fn test_profile_passes_through() {
        let profile = CompanyProfile {
            long_name: Some("Microsoft Corporation".to_string()),
            sector: Some("Technology".to_string()),
            market_cap: Some(3.1e12),
            fifty_two_week_high: Some(468.35),
            fifty_two_week_low: Some(344.79),
        };
        let snapshot = compute_snapshot(&sym("MSFT"), series(&[400.0], &[5]), profile).unwrap();

        assert_eq!(snapshot.company_name, "Microsoft Corporation");
        assert_eq!(snapshot.sector.as_deref(), Some("Technology"));
        assert_eq!(snapshot.market_cap, Some(3.1e12));
        assert_eq!(snapshot.high_52wk, 468.35);
        assert_eq!(snapshot.low_52wk, 344.79);
    }

    #[test]
    fn test_single_observation_has_zero_change() {
        let snapshot =
            compute_snapshot(&sym("F"), series(&[12.5], &[100]), CompanyProfile::default())
                .unwrap();
        assert_eq!(snapshot.change, 0.0);
        assert_eq!(snapshot.change_percent, Some(0.0));
    }

    #[test]
    fn test_zero_opening_price_has_no_percent() {
        let snapshot = compute_snapshot(
            &sym("ZERO"),
            series(&[0.0, 5.0], &[1, 1]),
            CompanyProfile::default(),
        )
        .unwrap();

        assert_eq!(snapshot.change, 5.0);
        assert!(snapshot.change_percent.is_none());
    }

    #[test]
    fn test_mean_volume_handles_large_values() {
        let s = series(&[1.0, 1.0], &[u64::MAX / 2, u64::MAX / 2]);
        assert!(mean_volume(&s) > 0.0);
        assert_eq!(mean_volume(&ObservationSeries::default()), 0.0);
    }
}
