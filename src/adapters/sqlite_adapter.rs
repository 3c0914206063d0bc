//! SQLite adapter: daily bars and the position ledger in one database file.

use crate::domain::error::SwingError;
use crate::domain::ledger::Ledger;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::position::{ExitReason, Position, PositionStatus};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::ledger_port::LedgerPort;
use chrono::{NaiveDate, NaiveDateTime};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

const DATE_FMT: &str = "%Y-%m-%d";
const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_error(e: r2d2::Error) -> SwingError {
    SwingError::storage(e)
}

fn query_error(e: rusqlite::Error) -> SwingError {
    SwingError::storage(e)
}

fn conversion_error(text: &str, e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(text.len(), rusqlite::types::Type::Text, Box::new(e))
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SwingError> {
        let db_path = config
            .get_string("sqlite", "path")
            .ok_or_else(|| SwingError::config_missing("sqlite", "path"))?;

        let pool_size = config.get_int("sqlite", "pool_size", 4).max(1) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_error)?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    pub fn in_memory() -> Result<Self, SwingError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_error)?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), SwingError> {
        let conn = self.pool.get().map_err(pool_error)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS ohlcv (
                code TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume INTEGER NOT NULL,
                PRIMARY KEY (code, date)
            );
            CREATE TABLE IF NOT EXISTS positions (
                seq INTEGER PRIMARY KEY,
                code TEXT NOT NULL,
                entry_price REAL NOT NULL,
                entry_time TEXT NOT NULL,
                stop_loss REAL NOT NULL,
                target_price REAL NOT NULL,
                status TEXT NOT NULL,
                exit_price REAL,
                exit_reason TEXT,
                exit_time TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_positions_status ON positions(status);",
        )
        .map_err(query_error)?;

        Ok(())
    }

    pub fn insert_bars(&self, code: &str, bars: &[OhlcvBar]) -> Result<(), SwingError> {
        let mut conn = self.pool.get().map_err(pool_error)?;
        let tx = conn.transaction().map_err(query_error)?;

        for bar in bars {
            tx.execute(
                "INSERT OR REPLACE INTO ohlcv (code, date, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    code,
                    bar.date.format(DATE_FMT).to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                ],
            )
            .map_err(query_error)?;
        }

        tx.commit().map_err(query_error)?;
        Ok(())
    }
}

impl DataPort for SqliteAdapter {
    fn fetch_ohlcv(&self, code: &str, lookback: usize) -> Result<Vec<OhlcvBar>, SwingError> {
        let to_source = |e: rusqlite::Error| SwingError::DataSource {
            code: code.to_string(),
            reason: e.to_string(),
        };
        let conn = self.pool.get().map_err(pool_error)?;

        // Newest `lookback` rows, flipped back to oldest first below.
        let mut stmt = conn
            .prepare(
                "SELECT date, open, high, low, close, volume
                 FROM ohlcv
                 WHERE code = ?1
                 ORDER BY date DESC
                 LIMIT ?2",
            )
            .map_err(to_source)?;

        let rows = stmt
            .query_map(params![code, lookback as i64], |row| {
                let date_str: String = row.get(0)?;
                let date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
                    .map_err(|e| conversion_error(&date_str, e))?;
                Ok(OhlcvBar {
                    date,
                    open: row.get(1)?,
                    high: row.get(2)?,
                    low: row.get(3)?,
                    close: row.get(4)?,
                    volume: row.get(5)?,
                })
            })
            .map_err(to_source)?;

        let mut bars = Vec::new();
        for row in rows {
            bars.push(row.map_err(to_source)?);
        }
        bars.reverse();
        Ok(bars)
    }
}

fn parse_timestamp(text: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FMT).map_err(|e| conversion_error(text, e))
}

fn row_to_position(row: &rusqlite::Row<'_>) -> rusqlite::Result<Position> {
    let entry_time: String = row.get(2)?;
    let status: String = row.get(5)?;
    let exit_reason: Option<String> = row.get(7)?;
    let exit_time: Option<String> = row.get(8)?;

    let status = match status.as_str() {
        "OPEN" => PositionStatus::Open,
        "CLOSED" => PositionStatus::Closed,
        other => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                format!("unknown status {other}").into(),
            ));
        }
    };
    let exit_reason = exit_reason
        .map(|r| {
            r.parse::<ExitReason>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, e.into())
            })
        })
        .transpose()?;

    Ok(Position {
        code: row.get(0)?,
        entry_price: row.get(1)?,
        entry_time: parse_timestamp(&entry_time)?,
        stop_loss: row.get(3)?,
        target_price: row.get(4)?,
        status,
        exit_price: row.get(6)?,
        exit_reason,
        exit_time: exit_time.as_deref().map(parse_timestamp).transpose()?,
    })
}

impl LedgerPort for SqliteAdapter {
    fn load(&self) -> Result<Ledger, SwingError> {
        let conn = self.pool.get().map_err(pool_error)?;
        let mut stmt = conn
            .prepare(
                "SELECT code, entry_price, entry_time, stop_loss, target_price, status,
                        exit_price, exit_reason, exit_time
                 FROM positions
                 ORDER BY seq ASC",
            )
            .map_err(query_error)?;

        let rows = stmt.query_map([], row_to_position).map_err(query_error)?;
        let mut positions = Vec::new();
        for row in rows {
            positions.push(row.map_err(query_error)?);
        }
        Ledger::from_positions(positions)
    }

    /// Replaces the whole table in one transaction.
    fn save(&self, ledger: &Ledger) -> Result<(), SwingError> {
        let mut conn = self.pool.get().map_err(pool_error)?;
        let tx = conn.transaction().map_err(query_error)?;

        tx.execute("DELETE FROM positions", []).map_err(query_error)?;
        for (seq, p) in ledger.positions().iter().enumerate() {
            tx.execute(
                "INSERT INTO positions (seq, code, entry_price, entry_time, stop_loss,
                     target_price, status, exit_price, exit_reason, exit_time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    seq as i64,
                    p.code,
                    p.entry_price,
                    p.entry_time.format(TIMESTAMP_FMT).to_string(),
                    p.stop_loss,
                    p.target_price,
                    p.status.to_string(),
                    p.exit_price,
                    p.exit_reason.map(|r| r.to_string()),
                    p.exit_time.map(|t| t.format(TIMESTAMP_FMT).to_string()),
                ],
            )
            .map_err(query_error)?;
        }

        tx.commit().map_err(query_error)?;
        Ok(())
    }
}
