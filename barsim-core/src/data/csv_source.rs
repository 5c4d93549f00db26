//! CSV bar source.
//!
//! Expected header: `timestamp,symbol,open,high,low,close,volume`. Timestamps
//! are RFC 3339 strings or integer unix seconds.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::provider::{filter_range, BarSupplier, DataError, Timeframe};
use crate::domain::Bar;

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    symbol: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Supplier backed by a CSV file, re-read on every request.
#[derive(Debug, Clone)]
pub struct CsvBarSource {
    path: PathBuf,
}

impl CsvBarSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row of the file, in file order.
    pub fn load_all(&self) -> Result<Vec<Bar>, DataError> {
        let file = std::fs::File::open(&self.path).map_err(|source| DataError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        read_bars(file)
    }
}

impl BarSupplier for CsvBarSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn get_historical_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _timeframe: Timeframe,
    ) -> Result<Vec<Bar>, DataError> {
        let bars = self.load_all()?;
        Ok(filter_range(&bars, symbol, start, end))
    }
}

/// Parse bars from any CSV reader.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut bars = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        let row = row?;
        bars.push(Bar {
            timestamp: parse_timestamp(&row.timestamp)?,
            symbol: row.symbol,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    Ok(bars)
}

/// Write bars as CSV with RFC 3339 timestamps.
pub fn write_bars<W: std::io::Write>(writer: W, bars: &[Bar]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["timestamp", "symbol", "open", "high", "low", "close", "volume"])?;
    for bar in bars {
        wtr.write_record([
            bar.timestamp.to_rfc3339(),
            bar.symbol.clone(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }
    wtr.flush().map_err(|source| DataError::Io {
        path: "<writer>".into(),
        source,
    })?;
    Ok(())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DataError> {
    if let Ok(secs) = raw.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| DataError::InvalidTimestamp(raw.to_string()));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DataError::InvalidTimestamp(raw.to_string()))
}
