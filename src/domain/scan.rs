//! Scan cycle orchestration.
//!
//! One cycle runs two strictly sequential phases:
//! - entry: every universe code -> fetch -> indicators -> entry rules -> open on BUY
//! - exit: the OPEN positions carried into this cycle -> fetch ->
//!   indicators -> exit rules -> close on exit
//!
//! Positions opened in the entry phase are not exit-evaluated until the next
//! cycle. The cycle works on a copy of the ledger and only commits it back
//! when every step succeeded, so a failed cycle leaves the caller's ledger
//! untouched.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::entry::{DecisionKind, EntryDecision, evaluate_entry};
use super::error::SwingError;
use super::exit::{ExitOutcome, evaluate_exit};
use super::ledger::{Ledger, PositionId};
use super::position::{ExitReason, Position};
use super::series::{EnrichedSeries, Series};
use super::strategy::StrategyParams;
use super::universe::Universe;
use crate::ports::data_port::DataPort;

/// One line of the universe trace (also used for the BUY table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRow {
    pub code: String,
    pub decision: DecisionKind,
    pub price: Option<f64>,
    pub rsi_medium: Option<f64>,
    pub volume_multiple: Option<f64>,
    pub oversold: Option<bool>,
    pub trend: Option<bool>,
    pub volume_spike: Option<bool>,
    pub candle: Option<bool>,
    pub bars: usize,
}

impl ScanRow {
    pub fn from_decision(decision: &EntryDecision, bars: usize) -> Self {
        let ev = decision.evidence.as_ref();
        ScanRow {
            code: decision.code.clone(),
            decision: decision.kind,
            price: ev.map(|e| e.price),
            rsi_medium: ev.and_then(|e| e.rsi_medium),
            volume_multiple: ev.and_then(|e| e.volume_multiple),
            oversold: ev.map(|e| e.checks.oversold),
            trend: ev.map(|e| e.checks.trend),
            volume_spike: ev.map(|e| e.checks.volume),
            candle: ev.map(|e| e.checks.candle),
            bars,
        }
    }

    pub fn is_buy(&self) -> bool {
        self.decision == DecisionKind::Buy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellRow {
    pub code: String,
    pub decision: DecisionKind,
    pub entry_price: f64,
    pub exit_price: f64,
    pub reason: ExitReason,
    pub return_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub buys: Vec<ScanRow>,
    pub sells: Vec<SellRow>,
    pub trace: Vec<ScanRow>,
    /// Universe codes with no usable data in the entry phase.
    pub skipped: Vec<String>,
    /// Open positions whose exit check was deferred for lack of data.
    pub deferred: Vec<String>,
    pub universe_size: usize,
    pub run_at: NaiveDateTime,
}

/// Fetch and validate one series. Source failures become `None`.
fn fetch_series(data: &dyn DataPort, code: &str, lookback: usize) -> Option<Series> {
    let bars = match data.fetch_ohlcv(code, lookback) {
        Ok(bars) => bars,
        Err(e) => {
            warn!(code, error = %e, "fetch failed, treating as no data");
            return None;
        }
    };
    if bars.is_empty() {
        debug!(code, "no bars returned");
        return None;
    }
    match Series::new(code, bars) {
        Ok(series) => Some(series),
        Err(e) => {
            warn!(code, error = %e, "discarding malformed series");
            None
        }
    }
}

/// Indicators + entry rules for a single code, without touching any ledger.
pub fn scan_instrument(
    data: &dyn DataPort,
    code: &str,
    params: &StrategyParams,
    lookback: usize,
) -> Option<(EnrichedSeries, EntryDecision)> {
    let enriched = fetch_series(data, code, lookback)?.enrich(params);
    let decision = evaluate_entry(&enriched, params);
    Some((enriched, decision))
}

fn entry_phase(
    universe: &Universe,
    data: &dyn DataPort,
    ledger: &mut Ledger,
    params: &StrategyParams,
    lookback: usize,
    now: NaiveDateTime,
    report: &mut CycleReport,
) -> Result<(), SwingError> {
    for code in &universe.codes {
        let Some((enriched, decision)) = scan_instrument(data, code, params, lookback) else {
            report.skipped.push(code.clone());
            continue;
        };
        let row = ScanRow::from_decision(&decision, enriched.len());
        debug!(code, decision = %decision.kind, bars = enriched.len(), "entry evaluated");

        if let (true, Some(evidence)) = (decision.is_buy(), decision.evidence) {
            let id = ledger.open(code, evidence.price, now, params)?;
            info!(code, price = evidence.price, position = id.0, "BUY");
            report.buys.push(row.clone());
        }
        report.trace.push(row);
    }
    Ok(())
}

/// Only records below `carried` (those that existed before the entry phase)
/// are eligible.
fn exit_phase(
    data: &dyn DataPort,
    ledger: &mut Ledger,
    carried: usize,
    params: &StrategyParams,
    lookback: usize,
    now: NaiveDateTime,
    report: &mut CycleReport,
) -> Result<(), SwingError> {
    // Working set is fixed before any close happens.
    let open: Vec<(PositionId, Position)> = ledger
        .open_positions()
        .into_iter()
        .filter(|(id, _)| id.0 < carried)
        .map(|(id, p)| (id, p.clone()))
        .collect();

    for (id, position) in open {
        let enriched = fetch_series(data, &position.code, lookback)
            .unwrap_or_else(|| Series::empty(position.code.clone()))
            .enrich(params);

        match evaluate_exit(&position, &enriched, params) {
            ExitOutcome::NoData => {
                warn!(code = %position.code, "no data for open position, exit deferred");
                report.deferred.push(position.code.clone());
            }
            ExitOutcome::Hold { price } => {
                debug!(code = %position.code, price, "holding");
            }
            ExitOutcome::Exit { reason, price } => {
                ledger.close(id, price, reason, now)?;
                info!(code = %position.code, price, %reason, "SELL");
                report.sells.push(SellRow {
                    code: position.code.clone(),
                    decision: DecisionKind::Sell,
                    entry_price: position.entry_price,
                    exit_price: price,
                    reason,
                    return_pct: position.unrealized_return(price) * 100.0,
                });
            }
        }
    }
    Ok(())
}

/// Run one full cycle against `ledger`. On error the ledger is unchanged.
pub fn run_cycle(
    universe: &Universe,
    data: &dyn DataPort,
    ledger: &mut Ledger,
    params: &StrategyParams,
    lookback: usize,
    now: NaiveDateTime,
) -> Result<CycleReport, SwingError> {
    info!(
        codes = universe.count(),
        open_positions = ledger.open_count(),
        "starting scan cycle"
    );

    let mut working = ledger.clone();
    let mut report = CycleReport {
        universe_size: universe.count(),
        run_at: now,
        ..CycleReport::default()
    };

    let carried = working.len();
    entry_phase(universe, data, &mut working, params, lookback, now, &mut report)?;
    exit_phase(data, &mut working, carried, params, lookback, now, &mut report)?;

    *ledger = working;
    info!(
        buys = report.buys.len(),
        sells = report.sells.len(),
        scanned = report.trace.len(),
        skipped = report.skipped.len(),
        "scan cycle complete"
    );
    Ok(report)
}
