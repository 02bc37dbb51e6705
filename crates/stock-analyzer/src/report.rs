//! Plain-text rendering of stock snapshots

use crate::domain::StockSnapshot;

/// Width of the rule framing each report header
pub const RULE_WIDTH: usize = 60;

/// Render the summary block for one snapshot.
///
/// The text starts with a blank line and ends with a newline, ready to be
/// written as-is.
pub fn format_snapshot(snapshot: &StockSnapshot) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("{} - {}\n", snapshot.symbol, snapshot.company_name));
    out.push_str(&rule);
    out.push('\n');

    out.push_str(&format!("Current Price: ${:.2}\n", snapshot.current_price));
    out.push_str(&format!(
        "Change: ${:+.2} ({})\n",
        snapshot.change,
        format_percent(snapshot.change_percent)
    ));
    out.push_str(&format!(
        "Sector: {}\n",
        snapshot.sector.as_deref().unwrap_or("N/A")
    ));
    match snapshot.market_cap {
        Some(cap) => out.push_str(&format!("Market Cap: ${}\n", format_thousands(cap))),
        None => out.push_str("Market Cap: N/A\n"),
    }
    out.push_str(&format!("52-Week High: ${:.2}\n", snapshot.high_52wk));
    out.push_str(&format!("52-Week Low: ${:.2}\n", snapshot.low_52wk));
    out.push_str(&format!(
        "Average Volume: {}\n",
        format_thousands(snapshot.volume)
    ));

    out
}

fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{p:+.2}%"),
        None => "N/A".to_string(),
    }
}

/// Round to a whole number and group digits in threes: `1234567.6` → `1,234,568`.
///
/// Exact halves round to even, so `2.5` prints as `2`.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 && digits.bytes().any(|b| b != b'0') {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, ObservationSeries, Symbol};
    use chrono::{TimeZone, Utc};

    fn snapshot() -> StockSnapshot {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        StockSnapshot {
            symbol: Symbol::parse("AAPL").unwrap(),
            company_name: "Apple Inc.".to_string(),
            sector: Some("Technology".to_string()),
            market_cap: Some(2_950_000_000_000.0),
            volume: 54_321_987.4,
            high_52wk: 199.62,
            low_52wk: 164.084,
            current_price: 189.5,
            previous_price: 170.0,
            change: 19.5,
            change_percent: Some(11.470_588),
            history: ObservationSeries::new(vec![Observation::new(ts, 189.5, 1)]),
        }
    }

    #[test]
    fn test_full_report() {
        let text = format_snapshot(&snapshot());
        let rule = "=".repeat(60);
        let expected = format!(
            "\n{rule}\nAAPL - Apple Inc.\n{rule}\n\
             Current Price: $189.50\n\
             Change: $+19.50 (+11.47%)\n\
             Sector: Technology\n\
             Market Cap: $2,950,000,000,000\n\
             52-Week High: $199.62\n\
             52-Week Low: $164.08\n\
             Average Volume: 54,321,987\n"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_missing_metadata_prints_na() {
        let mut snap = snapshot();
        snap.sector = None;
        snap.market_cap = None;

        let text = format_snapshot(&snap);
        assert!(text.contains("Sector: N/A\n"));
        assert!(text.contains("Market Cap: N/A\n"));
        assert!(!text.contains("Market Cap: $"));
    }

    #[test]
    fn test_negative_change_and_missing_percent() {
        let mut snap = snapshot();
        snap.change = -20.0;
        snap.change_percent = Some(-20.0);
        assert!(format_snapshot(&snap).contains("Change: $-20.00 (-20.00%)\n"));

        snap.change_percent = None;
        assert!(format_snapshot(&snap).contains("Change: $-20.00 (N/A)\n"));
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(999.6), "1,000");
        assert_eq!(format_thousands(1_234_567.0), "1,234,567");
        assert_eq!(format_thousands(-1_234.0), "-1,234");
        assert_eq!(format_thousands(-0.2), "0");
        assert_eq!(format_thousands(-0.5), "0");
    }

    #[test]
    fn test_format_thousands_ties_round_to_even() {
        assert_eq!(format_thousands(2.5), "2");
        assert_eq!(format_thousands(3.5), "4");
        assert_eq!(format_thousands(2_500_000.5), "2,500,000");
        assert_eq!(format_thousands(-1_234.5), "-1,234");
    }
}
