//! Per-instrument bar series and its indicator-enriched form.

use crate::domain::error::SwingError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::snapshot::{IndicatorSnapshot, build_snapshots};
use crate::domain::strategy::StrategyParams;

/// Time-ascending bars for one instrument. Dates are strictly increasing;
/// gaps (non-trading days) are allowed and never filled.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub code: String,
    pub bars: Vec<OhlcvBar>,
}

impl Series {
    pub fn new(code: impl Into<String>, bars: Vec<OhlcvBar>) -> Result<Self, SwingError> {
        let code = code.into();
        if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(SwingError::MalformedSeries {
                code,
                reason: format!(
                    "dates not strictly increasing: {} followed by {}",
                    pair[0].date, pair[1].date
                ),
            });
        }
        Ok(Self { code, bars })
    }

    pub fn empty(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            bars: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&OhlcvBar> {
        self.bars.last()
    }

    /// Run the indicator engine over this series.
    pub fn enrich(self, params: &StrategyParams) -> EnrichedSeries {
        let snapshots = build_snapshots(&self.bars, params);
        EnrichedSeries {
            code: self.code,
            bars: self.bars,
            snapshots,
        }
    }
}

/// A series paired with one indicator snapshot per bar.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSeries {
    pub code: String,
    pub bars: Vec<OhlcvBar>,
    pub snapshots: Vec<IndicatorSnapshot>,
}

impl EnrichedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar with its snapshot.
    pub fn latest(&self) -> Option<(&OhlcvBar, &IndicatorSnapshot)> {
        self.bars.last().zip(self.snapshots.last())
    }

    /// The bar before the most recent one.
    pub fn previous_bar(&self) -> Option<&OhlcvBar> {
        self.bars.len().checked_sub(2).map(|i| &self.bars[i])
    }
}
