//! Retry and pacing wrapper around any bar source.
//!
//! Each fetch gets up to `attempts` tries; an empty result or an error
//! triggers the next try. A fixed delay is slept after every fetch so a
//! rate-limited vendor is not hammered while the universe is walked.

use crate::domain::error::SwingError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use std::thread;
use std::time::Duration;
use tracing::debug;

pub struct ThrottledDataPort<D> {
    inner: D,
    attempts: usize,
    delay: Duration,
}

impl<D: DataPort> ThrottledDataPort<D> {
    pub fn new(inner: D, attempts: usize, delay: Duration) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
            delay,
        }
    }

    fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

impl<D: DataPort> DataPort for ThrottledDataPort<D> {
    fn fetch_ohlcv(&self, code: &str, lookback: usize) -> Result<Vec<OhlcvBar>, SwingError> {
        let mut last = Ok(Vec::new());
        for attempt in 1..=self.attempts {
            last = self.inner.fetch_ohlcv(code, lookback);
            match &last {
                Ok(bars) if !bars.is_empty() => break,
                Ok(_) => debug!(code, attempt, "empty fetch"),
                Err(e) => debug!(code, attempt, error = %e, "fetch attempt failed"),
            }
        }
        self.pause();
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Hands out canned responses in order, then empties.
    struct ScriptedPort {
        responses: RefCell<VecDeque<Result<Vec<OhlcvBar>, SwingError>>>,
        calls: RefCell<usize>,
    }

    impl ScriptedPort {
        fn new(responses: Vec<Result<Vec<OhlcvBar>, SwingError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                calls: RefCell::new(0),
            }
        }
    }

    impl DataPort for ScriptedPort {
        fn fetch_ohlcv(&self, _code: &str, _lookback: usize) -> Result<Vec<OhlcvBar>, SwingError> {
            *self.calls.borrow_mut() += 1;
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(Ok(Vec::new()))
        }
    }

    fn one_bar() -> Vec<OhlcvBar> {
        vec![OhlcvBar {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            open: 10.0,
            high: 11.0,
            low: 9.0,
            close: 10.5,
            volume: 100,
        }]
    }

    fn failure() -> SwingError {
        SwingError::DataSource {
            code: "X".into(),
            reason: "timeout".into(),
        }
    }

    #[test]
    fn first_success_is_returned_without_retry() {
        let port = ThrottledDataPort::new(ScriptedPort::new(vec![Ok(one_bar())]), 2, Duration::ZERO);
        assert_eq!(port.fetch_ohlcv("X", 10).unwrap().len(), 1);
        assert_eq!(*port.inner.calls.borrow(), 1);
    }

    #[test]
    fn empty_then_data_retries_once() {
        let port = ThrottledDataPort::new(
            ScriptedPort::new(vec![Ok(Vec::new()), Ok(one_bar())]),
            2,
            Duration::ZERO,
        );
        assert_eq!(port.fetch_ohlcv("X", 10).unwrap().len(), 1);
        assert_eq!(*port.inner.calls.borrow(), 2);
    }

    #[test]
    fn error_then_data_recovers() {
        let port = ThrottledDataPort::new(
            ScriptedPort::new(vec![Err(failure()), Ok(one_bar())]),
            2,
            Duration::ZERO,
        );
        assert!(port.fetch_ohlcv("X", 10).is_ok());
    }

    #[test]
    fn attempts_are_bounded_and_last_result_wins() {
        let port = ThrottledDataPort::new(
            ScriptedPort::new(vec![Err(failure()), Err(failure()), Ok(one_bar())]),
            2,
            Duration::ZERO,
        );
        assert!(port.fetch_ohlcv("X", 10).is_err());
        assert_eq!(*port.inner.calls.borrow(), 2);
    }

    #[test]
    fn zero_attempts_still_fetches_once() {
        let port = ThrottledDataPort::new(ScriptedPort::new(vec![Ok(one_bar())]), 0, Duration::ZERO);
        assert_eq!(port.fetch_ohlcv("X", 10).unwrap().len(), 1);
    }
}
