//! CSV file data adapter: one `<SYMBOL>.csv` per symbol under a base directory.

use crate::domain::error::GridTraderError;
use crate::domain::ohlcv::{parse_timestamp, OhlcvBar};
use crate::ports::data_port::DataPort;
use chrono::NaiveDateTime;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }
}

fn field(record: &csv::StringRecord, idx: usize, name: &str, row: usize) -> Result<f64, GridTraderError> {
    record
        .get(idx)
        .ok_or_else(|| GridTraderError::Data {
            reason: format!("row {row}: missing {name} column"),
        })?
        .trim()
        .parse()
        .map_err(|e| GridTraderError::Data {
            reason: format!("row {row}: invalid {name} value: {e}"),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<OhlcvBar>, GridTraderError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(GridTraderError::NoData {
                symbol: symbol.to_string(),
            });
        }
        let content = fs::read_to_string(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (i, result) in rdr.records().enumerate() {
            let row = i + 2;
            let record = result.map_err(|e| GridTraderError::Data {
                reason: format!("{}: CSV parse error: {e}", path.display()),
            })?;

            let raw_ts = record.get(0).ok_or_else(|| GridTraderError::Data {
                reason: format!("row {row}: missing timestamp column"),
            })?;
            let timestamp = parse_timestamp(raw_ts).ok_or_else(|| GridTraderError::Data {
                reason: format!("row {row}: invalid timestamp '{raw_ts}'"),
            })?;

            if start.is_some_and(|s| timestamp < s) || end.is_some_and(|e| timestamp > e) {
                continue;
            }

            bars.push(OhlcvBar {
                timestamp,
                open: field(&record, 1, "open", row)?,
                high: field(&record, 2, "high", row)?,
                low: field(&record, 3, "low", row)?,
                close: field(&record, 4, "close", row)?,
                volume: field(&record, 5, "volume", row)?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        tracing::debug!(symbol, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, GridTraderError> {
        let mut symbols = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}
