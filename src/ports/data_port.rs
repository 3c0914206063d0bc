//! Bar source port trait.

use crate::domain::error::SwingError;
use crate::domain::ohlcv::OhlcvBar;

pub trait DataPort {
    /// The most recent `lookback` daily bars for `code`, oldest first.
    /// An empty vector means the source has nothing for this code.
    fn fetch_ohlcv(&self, code: &str, lookback: usize) -> Result<Vec<OhlcvBar>, SwingError>;
}

impl<T: DataPort + ?Sized> DataPort for &T {
    fn fetch_ohlcv(&self, code: &str, lookback: usize) -> Result<Vec<OhlcvBar>, SwingError> {
        (**self).fetch_ohlcv(code, lookback)
    }
}

impl<T: DataPort + ?Sized> DataPort for Box<T> {
    fn fetch_ohlcv(&self, code: &str, lookback: usize) -> Result<Vec<OhlcvBar>, SwingError> {
        (**self).fetch_ohlcv(code, lookback)
    }
}
