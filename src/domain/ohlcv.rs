//! OHLCV bar representation and series helpers.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;

use super::error::GridTraderError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcvBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, the `T`-separated form, or a bare date
/// (taken as midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Merge consecutive groups of `factor` bars into one bar each.
///
/// Groups are aligned to the end of the slice so the most recent bar always
/// closes a group; a short leading group is dropped.
pub fn resample(bars: &[OhlcvBar], factor: usize) -> Vec<OhlcvBar> {
    if factor <= 1 {
        return bars.to_vec();
    }
    let skip = bars.len() % factor;
    bars[skip..]
        .chunks_exact(factor)
        .map(|chunk| {
            let first = &chunk[0];
            let last = &chunk[chunk.len() - 1];
            OhlcvBar {
                timestamp: last.timestamp,
                open: first.open,
                high: chunk.iter().map(|b| b.high).fold(f64::MIN, f64::max),
                low: chunk.iter().map(|b| b.low).fold(f64::MAX, f64::min),
                close: last.close,
                volume: chunk.iter().map(|b| b.volume).sum(),
            }
        })
        .collect()
}

/// Simple moving average of the last `period` closes, if enough bars exist.
pub fn sma_close(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }
    let tail = &bars[bars.len() - period..];
    Some(tail.iter().map(|b| b.close).sum::<f64>() / period as f64)
}

/// Smallest positive spacing between consecutive bars.
pub fn bar_interval(bars: &[OhlcvBar]) -> Option<TimeDelta> {
    bars.windows(2)
        .map(|w| w[1].timestamp - w[0].timestamp)
        .filter(|d| *d > TimeDelta::zero())
        .min()
}

/// Reject series that are out of order or carry non-positive prices.
pub fn check_series(symbol: &str, bars: &[OhlcvBar]) -> Result<(), GridTraderError> {
    if bars.is_empty() {
        return Err(GridTraderError::NoData {
            symbol: symbol.to_string(),
        });
    }
    for (i, w) in bars.windows(2).enumerate() {
        if w[1].timestamp <= w[0].timestamp {
            return Err(GridTraderError::Data {
                reason: format!(
                    "{symbol}: timestamps not strictly increasing at row {} ({} then {})",
                    i + 1,
                    w[0].timestamp,
                    w[1].timestamp
                ),
            });
        }
    }
    if let Some(bad) = bars
        .iter()
        .find(|b| b.close <= 0.0 || b.low <= 0.0 || b.high < b.low)
    {
        return Err(GridTraderError::Data {
            reason: format!("{symbol}: malformed bar at {}", bad.timestamp),
        });
    }
    Ok(())
}
