//! Line charts of closing prices, drawn as text
//!
//! The terminal renderer draws a ratatui [`Chart`] into an off-screen
//! [`Buffer`] and writes the rows out as plain lines. That keeps the output
//! usable in pipes and logs, and lets the session keep reading prompts from
//! the same terminal afterwards.

use std::io::Write;

use chrono::DateTime;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Widget},
};
use tracing::warn;

use crate::config::{ChartConfig, MIN_CHART_HEIGHT, MIN_CHART_WIDTH};
use crate::domain::{ObservationSeries, StockSnapshot};
use crate::error::{Result, StockError};

const COMPARISON_TITLE: &str = "Stock Performance Comparison (Normalized)";
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Per-series styling, cycled when comparing many symbols. Markers differ as
/// well as colors so the series stay distinguishable without color.
const PALETTE: [(Color, Marker, &str); 5] = [
    (Color::Cyan, Marker::Braille, "⣿"),
    (Color::Yellow, Marker::Dot, "•"),
    (Color::Magenta, Marker::Block, "█"),
    (Color::Green, Marker::Bar, "▄"),
    (Color::Red, Marker::HalfBlock, "▀"),
];

/// Draws price charts to an output sink
pub trait ChartRenderer {
    /// Closing price over time for one symbol
    fn render_price(&self, snapshot: &StockSnapshot, out: &mut dyn Write) -> Result<()>;

    /// Every snapshot's closes rebased to 100 at its first observation, on
    /// shared axes. Snapshots without history are skipped.
    fn render_comparison(&self, snapshots: &[StockSnapshot], out: &mut dyn Write) -> Result<()>;
}

impl<T: ChartRenderer + ?Sized> ChartRenderer for &T {
    fn render_price(&self, snapshot: &StockSnapshot, out: &mut dyn Write) -> Result<()> {
        (**self).render_price(snapshot, out)
    }

    fn render_comparison(&self, snapshots: &[StockSnapshot], out: &mut dyn Write) -> Result<()> {
        (**self).render_comparison(snapshots, out)
    }
}

/// Rebase `closes` so the first value becomes 100.
///
/// Returns `None` for an empty series or one that starts at zero.
pub fn normalize(closes: &[f64]) -> Option<Vec<f64>> {
    let base = *closes.first()?;
    if base == 0.0 || !base.is_finite() {
        return None;
    }
    Some(closes.iter().map(|c| c / base * 100.0).collect())
}

/// Renders charts as text into a fixed-size cell grid
#[derive(Debug, Clone, Default)]
pub struct TerminalChartRenderer {
    config: ChartConfig,
}

/// One line on the chart
struct PlotLine {
    name: Option<String>,
    points: Vec<(f64, f64)>,
}

impl TerminalChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    fn draw(&self, title: &str, y_title: &str, lines: &[PlotLine], out: &mut dyn Write) -> Result<()> {
        let ChartConfig { width, height } = self.config;
        if width < MIN_CHART_WIDTH || height < MIN_CHART_HEIGHT {
            return Err(StockError::Chart(format!(
                "{width}x{height} is too small, need at least {MIN_CHART_WIDTH}x{MIN_CHART_HEIGHT}"
            )));
        }

        let (x_bounds, y_bounds) = bounds(lines);

        let datasets: Vec<Dataset<'_>> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let (color, marker, _) = PALETTE[i % PALETTE.len()];
                let dataset = Dataset::default()
                    .marker(marker)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(color))
                    .data(&line.points);
                match &line.name {
                    Some(name) => dataset.name(name.clone()),
                    None => dataset,
                }
            })
            .collect();

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {title} ")),
            )
            .x_axis(
                Axis::default()
                    .title("Date")
                    .bounds(x_bounds)
                    .labels(date_labels(x_bounds)),
            )
            .y_axis(
                Axis::default()
                    .title(y_title)
                    .bounds(y_bounds)
                    .labels(value_labels(y_bounds)),
            )
            .legend_position(Some(LegendPosition::TopLeft))
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);

        write_buffer(&buf, out)
    }
}

impl ChartRenderer for TerminalChartRenderer {
    fn render_price(&self, snapshot: &StockSnapshot, out: &mut dyn Write) -> Result<()> {
        if snapshot.history.is_empty() {
            return Err(StockError::Chart(format!(
                "no price history for {}",
                snapshot.symbol
            )));
        }

        let title = format!(
            "{} - {} Stock Price",
            snapshot.symbol, snapshot.company_name
        );
        let line = PlotLine {
            name: None,
            points: price_points(&snapshot.history),
        };

        writeln!(out)?;
        self.draw(&title, "Price ($)", &[line], out)
    }

    fn render_comparison(&self, snapshots: &[StockSnapshot], out: &mut dyn Write) -> Result<()> {
        let mut lines = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots.iter().filter(|s| !s.history.is_empty()) {
            let Some(normalized) = normalize(&snapshot.history.closes()) else {
                warn!(symbol = %snapshot.symbol, "Series starts at zero, cannot normalize");
                continue;
            };
            let (_, _, glyph) = PALETTE[lines.len() % PALETTE.len()];
            let points = snapshot
                .history
                .iter()
                .zip(normalized)
                .map(|(o, v)| (o.timestamp.timestamp() as f64, v))
                .collect();
            lines.push(PlotLine {
                name: Some(format!("{} {glyph}", snapshot.symbol)),
                points,
            });
        }

        writeln!(out)?;
        if lines.is_empty() {
            writeln!(out, "No price history to compare.")?;
            return Ok(());
        }
        self.draw(COMPARISON_TITLE, "Normalized Price (%)", &lines, out)
    }
}

fn price_points(series: &ObservationSeries) -> Vec<(f64, f64)> {
    series
        .iter()
        .map(|o| (o.timestamp.timestamp() as f64, o.close))
        .collect()
}

/// Axis bounds covering every point, with a little headroom on the value axis
fn bounds(lines: &[PlotLine]) -> ([f64; 2], [f64; 2]) {
    let points = || lines.iter().flat_map(|l| l.points.iter());

    let x_min = points().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = points().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let y_min = points().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let y_max = points().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    if !x_min.is_finite() || !y_min.is_finite() {
        return ([0.0, 1.0], [0.0, 1.0]);
    }

    let x = if x_max > x_min {
        [x_min, x_max]
    } else {
        [x_min - SECONDS_PER_DAY, x_max + SECONDS_PER_DAY]
    };

    let y_range = y_max - y_min;
    let y_pad = if y_range > 0.0 {
        y_range * 0.05
    } else {
        (y_max.abs() * 0.05).max(1.0)
    };

    (x, [y_min - y_pad, y_max + y_pad])
}

fn date_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|secs| {
            let label = DateTime::from_timestamp(secs as i64, 0)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            Span::raw(label)
        })
        .collect()
}

fn value_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Span::raw(format!("{v:.2}")))
        .collect()
}

fn write_buffer(buf: &Buffer, out: &mut dyn Write) -> Result<()> {
    let width = usize::from(buf.area.width.max(1));
    for row in buf.content.chunks(width) {
        let line: String = row.iter().map(|cell| cell.symbol()).collect();
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, Symbol};
    use chrono::{Duration, TimeZone, Utc};

    fn snapshot(symbol: &str, closes: &[f64]) -> StockSnapshot {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 21, 0, 0).unwrap();
        let history = ObservationSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| Observation::new(start + Duration::days(i as i64), c, 1_000))
                .collect(),
        );
        let current = closes.last().copied().unwrap_or_default();
        StockSnapshot {
            symbol: Symbol::parse(symbol).unwrap(),
            company_name: format!("{symbol} Corp"),
            sector: None,
            market_cap: None,
            volume: 1_000.0,
            high_52wk: current,
            low_52wk: current,
            current_price: current,
            previous_price: closes.first().copied().unwrap_or_default(),
            change: 0.0,
            change_percent: Some(0.0),
            history,
        }
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&TerminalChartRenderer, &mut Vec<u8>) -> Result<()>,
    {
        let renderer = TerminalChartRenderer::new(ChartConfig {
            width: 80,
            height: 20,
        });
        let mut out = Vec::new();
        f(&renderer, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(&[50.0, 100.0, 150.0]),
            Some(vec![100.0, 200.0, 300.0])
        );
        assert_eq!(normalize(&[80.0]), Some(vec![100.0]));
        assert_eq!(normalize(&[]), None);
        assert_eq!(normalize(&[0.0, 10.0]), None);
    }

    #[test]
    fn test_price_chart_layout() {
        let snap = snapshot("AAPL", &[100.0, 102.0, 101.0, 105.0]);
        let text = render(|r, out| r.render_price(&snap, out));

        assert!(text.contains("AAPL - AAPL Corp Stock Price"));
        assert!(text.contains("Price ($)"));
        assert!(text.contains("Date"));
        // leading blank line, then one line per row
        assert_eq!(text.lines().count(), 21);
    }

    #[test]
    fn test_comparison_chart_has_legend() {
        let snaps = vec![
            snapshot("AAPL", &[100.0, 110.0, 120.0]),
            snapshot("MSFT", &[400.0, 380.0, 420.0]),
        ];
        let text = render(|r, out| r.render_comparison(&snaps, out));

        assert!(text.contains(COMPARISON_TITLE));
        assert!(text.contains("Normalized Price (%)"));
        assert!(text.contains("AAPL"));
        assert!(text.contains("MSFT"));
    }

    #[test]
    fn test_comparison_skips_empty_history() {
        let snaps = vec![snapshot("AAPL", &[100.0, 110.0]), snapshot("EMPTY", &[])];
        let text = render(|r, out| r.render_comparison(&snaps, out));

        assert!(text.contains("AAPL"));
        assert!(!text.contains("EMPTY"));
    }

    #[test]
    fn test_comparison_without_history() {
        let snaps = vec![snapshot("NONE", &[])];
        let text = render(|r, out| r.render_comparison(&snaps, out));
        assert!(text.contains("No price history to compare."));
    }

    #[test]
    fn test_price_chart_without_history_is_chart_error() {
        let snap = snapshot("NONE", &[]);
        let renderer = TerminalChartRenderer::default();
        let mut out = Vec::new();

        let err = renderer.render_price(&snap, &mut out).unwrap_err();
        assert!(matches!(err, StockError::Chart(ref msg) if msg.contains("NONE")));
        assert!(out.is_empty());
    }

    #[test]
    fn test_undersized_chart_is_chart_error() {
        let renderer = TerminalChartRenderer::new(ChartConfig {
            width: 10,
            height: 4,
        });
        let snap = snapshot("AAPL", &[100.0, 101.0]);
        let mut out = Vec::new();

        let err = renderer.render_price(&snap, &mut out).unwrap_err();
        assert!(matches!(err, StockError::Chart(_)));
        assert_eq!(err.to_string(), "Chart error: 10x4 is too small, need at least 20x8");
    }

    #[test]
    fn test_flat_single_point_bounds() {
        let line = PlotLine {
            name: None,
            points: vec![(1_000.0, 50.0)],
        };
        let (x, y) = bounds(&[line]);
        assert!(x[0] < x[1]);
        assert!(y[0] < 50.0 && y[1] > 50.0);
    }
}
