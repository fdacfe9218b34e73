#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use gridtrader::domain::capital::LevelCaps;
use gridtrader::domain::error::GridTraderError;
use gridtrader::domain::execution::ExecutionConfig;
use gridtrader::domain::grid::{GridLevelProvider, GridLevels, GridUnavailable, GridZone, ZoneSlot};
pub use gridtrader::domain::ohlcv::OhlcvBar;
use gridtrader::domain::strategy::{GridStrategy, OrderMode};
use gridtrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<OhlcvBar>, GridTraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(GridTraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| start.is_none_or(|s| b.timestamp >= s))
                    .filter(|b| end.is_none_or(|e| b.timestamp <= e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, GridTraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn hour(i: i64) -> NaiveDateTime {
    t0() + TimeDelta::hours(i)
}

pub fn make_bar(i: i64, close: f64) -> OhlcvBar {
    OhlcvBar {
        timestamp: hour(i),
        open: close,
        high: close,
        low: close,
        close,
        volume: 1.0,
    }
}

pub fn make_bar_with_range(i: i64, low: f64, high: f64, close: f64, volume: f64) -> OhlcvBar {
    OhlcvBar {
        timestamp: hour(i),
        open: close,
        high,
        low,
        close,
        volume,
    }
}

/// Hourly bars from a list of closes.
pub fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i as i64, c))
        .collect()
}

/// Same grid on every bar, except for the listed bar indices.
pub struct FixedGrid {
    pub support_1: ZoneSlot,
    pub support_2: ZoneSlot,
    pub resistance_1: ZoneSlot,
    pub resistance_2: ZoneSlot,
    pub gaps: Vec<NaiveDateTime>,
}

impl FixedGrid {
    /// S1 [100, 110], R1 [120, 125], R2 [128, 132]; no S2.
    pub fn single_support() -> Self {
        FixedGrid {
            support_1: ZoneSlot::Present(GridZone::new(105.0, 100.0, 110.0)),
            support_2: ZoneSlot::Absent,
            resistance_1: ZoneSlot::Present(GridZone::new(122.5, 120.0, 125.0)),
            resistance_2: ZoneSlot::Present(GridZone::new(130.0, 128.0, 132.0)),
            gaps: Vec::new(),
        }
    }

    /// S1 [100, 110], S2 [90, 95], R1 [120, 125], R2 [128, 132].
    pub fn two_supports() -> Self {
        FixedGrid {
            support_2: ZoneSlot::Present(GridZone::new(92.5, 90.0, 95.0)),
            ..Self::single_support()
        }
    }

    pub fn with_gaps(mut self, bars: &[i64]) -> Self {
        self.gaps = bars.iter().map(|&i| hour(i)).collect();
        self
    }
}

impl GridLevelProvider for FixedGrid {
    fn compute(&self, _symbol: &str, ts: NaiveDateTime) -> Result<GridLevels, GridUnavailable> {
        if self.gaps.contains(&ts) {
            return Err(GridUnavailable::NoClusters);
        }
        Ok(GridLevels {
            timestamp: ts,
            support_1: self.support_1,
            support_2: self.support_2,
            resistance_1: self.resistance_1,
            resistance_2: self.resistance_2,
            analysis_quality: 1.0,
        })
    }
}

/// Fee-free strategy with a 20% / 30% split and a short validity.
pub fn make_strategy(mode: OrderMode) -> GridStrategy {
    let mut strategy = GridStrategy {
        caps: LevelCaps {
            support_1_pct: 20.0,
            support_2_pct: 30.0,
        },
        order_validity_bars: 3,
        order_mode: mode,
        execution: ExecutionConfig {
            fee_pct: 0.0,
            min_notional: 10.0,
        },
        ..GridStrategy::default()
    };
    strategy.grid.min_bars = 1;
    strategy
}
