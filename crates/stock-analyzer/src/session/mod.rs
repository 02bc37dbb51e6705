//! Interactive analysis session
//!
//! A session collects ticker symbols one line at a time, then fetches,
//! summarizes and optionally charts each of them in the order entered:
//!
//! ```text
//! COLLECTING -> ANALYZING -> (FETCHING -> REPORTING -> CHARTING?)* -> COMPARING? -> DONE
//! ```
//!
//! Input and output are injected so the same controller drives a real
//! terminal or an in-memory script.

pub mod command;
pub mod state;

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::api::MarketDataProvider;
use crate::chart::ChartRenderer;
use crate::domain::{Period, StockSnapshot, Symbol};
use crate::error::{Result, StockError};
use crate::metrics::snapshot_from_history;
use crate::report::format_snapshot;

pub use command::{InputCommand, is_affirmative};
pub use state::SessionState;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// User typed `quit` or input ended while collecting
    Quit,
    /// `done` with an empty working set
    NothingToAnalyze,
    /// Analysis ran; `analyzed` of `requested` symbols produced a snapshot
    Completed { analyzed: usize, requested: usize },
}

/// Drives one interactive session
pub struct SessionController<P, C> {
    provider: P,
    charts: C,
    period: Period,
}

impl<P, C> SessionController<P, C>
where
    P: MarketDataProvider,
    C: ChartRenderer,
{
    pub fn new(provider: P, charts: C, period: Period) -> Self {
        Self {
            provider,
            charts,
            period,
        }
    }

    /// Run the whole session against `input` and `out`.
    ///
    /// Fetch and chart failures are reported inline and the session carries
    /// on. Anything else, such as a broken output sink, ends the run.
    pub async fn run<R, W>(&self, input: &mut R, out: &mut W) -> Result<SessionOutcome>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(out, "=== INFINITE STOCK ANALYZER ===")?;
        writeln!(out, "Enter stock symbols one by one")?;
        writeln!(out, "Type 'done' when finished, 'quit' to exit\n")?;

        let Some(mut state) = self.collect_symbols(input, out)? else {
            info!("Session ended by user");
            return Ok(SessionOutcome::Quit);
        };

        if state.is_empty() {
            writeln!(out, "No symbols to analyze.")?;
            return Ok(SessionOutcome::NothingToAnalyze);
        }

        self.analyze(&mut state, input, out).await?;
        self.compare(&state, input, out)?;

        let analyzed = state.snapshots().len();
        let requested = state.symbols().len();
        writeln!(out, "\n🎯 Analysis Complete!")?;
        writeln!(
            out,
            "Successfully analyzed {analyzed} out of {requested} stocks"
        )?;
        info!(analyzed, requested, "Session complete");

        Ok(SessionOutcome::Completed {
            analyzed,
            requested,
        })
    }

    /// COLLECTING: returns `None` when the user quits.
    pub fn collect_symbols<R, W>(&self, input: &mut R, out: &mut W) -> Result<Option<SessionState>>
    where
        R: BufRead,
        W: Write,
    {
        let mut state = SessionState::new();

        loop {
            let Some(line) = prompt(input, out, "Enter stock symbol: ")? else {
                // End of input counts as quit
                writeln!(out)?;
                return Ok(None);
            };

            match InputCommand::parse(&line) {
                InputCommand::Quit => return Ok(None),
                InputCommand::Done => return Ok(Some(state)),
                InputCommand::Skip => {}
                InputCommand::Symbol(raw) => match state.add_symbol(&raw) {
                    Ok(symbol) => {
                        let symbol = symbol.clone();
                        writeln!(
                            out,
                            "✓ Added {symbol} (Total: {} symbols)",
                            state.symbols().len()
                        )?;
                    }
                    Err(StockError::DuplicateSymbol(symbol)) => {
                        writeln!(out, "✓ {symbol} already in list")?;
                    }
                    Err(e) => {
                        debug!(error = %e, "Rejected symbol");
                        writeln!(out, "Invalid symbol format")?;
                    }
                },
            }
        }
    }

    /// ANALYZING: fetch, report and optionally chart each symbol in order.
    async fn analyze<R, W>(&self, state: &mut SessionState, input: &mut R, out: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let symbols = state.symbols().to_vec();
        writeln!(out, "\n📊 Analyzing {} stocks...", symbols.len())?;
        info!(
            count = symbols.len(),
            period = %self.period,
            provider = self.provider.name(),
            "Analyzing symbols"
        );

        for symbol in &symbols {
            let snapshot = match self.fetch_snapshot(symbol).await {
                Ok(snapshot) => snapshot,
                Err(e) if !e.is_fetch_failure() => return Err(e),
                Err(e) => {
                    warn!(%symbol, error = %e, "Fetch failed");
                    if !matches!(e, StockError::NoData { .. }) {
                        writeln!(out, "Error processing {symbol}: {e}")?;
                    }
                    writeln!(out, "❌ Could not fetch data for {symbol}")?;
                    continue;
                }
            };

            out.write_all(format_snapshot(&snapshot).as_bytes())?;

            let question = format!("\nPlot chart for {symbol}? (y/n): ");
            if prompt(input, out, &question)?.is_some_and(|a| is_affirmative(&a)) {
                if let Err(e) = self.charts.render_price(&snapshot, out) {
                    report_chart_error(out, &e)?;
                }
            }

            state.record_snapshot(snapshot);
        }

        Ok(())
    }

    /// COMPARING: offered only when at least two symbols succeeded.
    fn compare<R, W>(&self, state: &SessionState, input: &mut R, out: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let snapshots = state.snapshots();
        if snapshots.len() <= 1 {
            return Ok(());
        }

        let question = format!(
            "\nCompare all {} stocks on one chart? (y/n): ",
            snapshots.len()
        );
        if prompt(input, out, &question)?.is_some_and(|a| is_affirmative(&a)) {
            if let Err(e) = self.charts.render_comparison(snapshots, out) {
                report_chart_error(out, &e)?;
            }
        }

        Ok(())
    }

    async fn fetch_snapshot(&self, symbol: &Symbol) -> Result<StockSnapshot> {
        debug!(%symbol, "Fetching");
        let history = self.provider.fetch_history(symbol, self.period).await?;
        snapshot_from_history(symbol, history)
    }
}

/// Write `text`, flush, and read one line. `None` at end of input.
fn prompt<R, W>(input: &mut R, out: &mut W, text: &str) -> Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    write!(out, "{text}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn report_chart_error<W: Write>(out: &mut W, err: &StockError) -> Result<()> {
    warn!(error = %err, "Chart rendering failed");
    writeln!(out, "Could not draw chart: {err}")?;
    Ok(())
}
