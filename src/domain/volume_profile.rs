//! Volume-profile grid: weighted multi-timeframe volume histograms clustered
//! into support and resistance zones.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::error::GridTraderError;
use super::grid::{GridLevelProvider, GridLevels, GridUnavailable, GridZone, ZoneSlot};
use super::ohlcv::{resample, sma_close, OhlcvBar};

/// One lookback window of the profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeframeSpec {
    /// Number of base bars merged into one.
    pub factor: usize,
    /// Resampled bars looked back over.
    pub lookback: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridConfig {
    pub timeframes: Vec<TimeframeSpec>,
    pub bins: usize,
    pub min_bars: usize,
    pub cluster_quantile: f64,
    pub zone_width_pct: f64,
    pub ma_period: usize,
    pub ma_nudge_max_pct: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            timeframes: vec![
                TimeframeSpec {
                    factor: 1,
                    lookback: 120,
                    weight: 1.0,
                },
                TimeframeSpec {
                    factor: 4,
                    lookback: 60,
                    weight: 0.7,
                },
                TimeframeSpec {
                    factor: 24,
                    lookback: 20,
                    weight: 0.5,
                },
            ],
            bins: 48,
            min_bars: 10,
            cluster_quantile: 0.7,
            zone_width_pct: 1.0,
            ma_period: 20,
            ma_nudge_max_pct: 2.0,
        }
    }
}

/// Parse `factor:lookback:weight` triples separated by commas.
pub fn parse_timeframes(raw: &str) -> Result<Vec<TimeframeSpec>, GridTraderError> {
    let invalid = |reason: String| GridTraderError::ConfigInvalid {
        section: "grid".into(),
        key: "timeframes".into(),
        reason,
    };

    let mut specs = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let parts: Vec<&str> = item.split(':').map(str::trim).collect();
        let [factor, lookback, weight] = parts.as_slice() else {
            return Err(invalid(format!(
                "'{item}' is not factor:lookback:weight"
            )));
        };
        let factor: usize = factor
            .parse()
            .map_err(|_| invalid(format!("bad factor in '{item}'")))?;
        let lookback: usize = lookback
            .parse()
            .map_err(|_| invalid(format!("bad lookback in '{item}'")))?;
        let weight: f64 = weight
            .parse()
            .map_err(|_| invalid(format!("bad weight in '{item}'")))?;
        if factor == 0 || lookback == 0 || weight <= 0.0 {
            return Err(invalid(format!(
                "'{item}' needs positive factor, lookback and weight"
            )));
        }
        specs.push(TimeframeSpec {
            factor,
            lookback,
            weight,
        });
    }
    if specs.is_empty() {
        return Err(invalid("at least one timeframe is required".into()));
    }
    Ok(specs)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cluster {
    low: f64,
    high: f64,
    volume: f64,
}

/// Grid provider over one symbol's bar history.
///
/// `compute` only sees bars stamped at or before the requested time.
#[derive(Debug, Clone)]
pub struct VolumeProfileProvider {
    symbol: String,
    bars: Vec<OhlcvBar>,
    config: GridConfig,
}

impl VolumeProfileProvider {
    pub fn new(symbol: impl Into<String>, bars: Vec<OhlcvBar>, config: GridConfig) -> Self {
        VolumeProfileProvider {
            symbol: symbol.into(),
            bars,
            config,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    fn history(&self, timestamp: NaiveDateTime) -> &[OhlcvBar] {
        let end = self.bars.partition_point(|b| b.timestamp <= timestamp);
        &self.bars[..end]
    }

    fn windows(&self, history: &[OhlcvBar]) -> Result<Vec<(Vec<OhlcvBar>, f64)>, GridUnavailable> {
        let mut windows = Vec::with_capacity(self.config.timeframes.len());
        for tf in &self.config.timeframes {
            let mut series = resample(history, tf.factor);
            if series.len() > tf.lookback {
                series.drain(..series.len() - tf.lookback);
            }
            if series.len() < self.config.min_bars {
                return Err(GridUnavailable::InsufficientBars {
                    timeframe: tf.factor,
                    have: series.len(),
                    need: self.config.min_bars,
                });
            }
            windows.push((series, tf.weight));
        }
        Ok(windows)
    }

    fn clusters(&self, windows: &[(Vec<OhlcvBar>, f64)]) -> Option<(Vec<Cluster>, f64)> {
        let all = windows.iter().flat_map(|(series, _)| series.iter());
        let lo = all.clone().map(|b| b.low).fold(f64::MAX, f64::min);
        let hi = all.map(|b| b.high).fold(f64::MIN, f64::max);
        let bins = self.config.bins.max(1);
        if hi <= lo {
            return None;
        }
        let width = (hi - lo) / bins as f64;
        let bin_of = |price: f64| (((price - lo) / width).floor().max(0.0) as usize).min(bins - 1);

        let mut histogram = vec![0.0; bins];
        for (series, weight) in windows {
            for bar in series {
                let (first, last) = (bin_of(bar.low), bin_of(bar.high));
                let share = bar.volume * weight / (last - first + 1) as f64;
                for slot in &mut histogram[first..=last] {
                    *slot += share;
                }
            }
        }
        let total: f64 = histogram.iter().sum();
        if total <= 0.0 {
            return None;
        }

        let mut sorted = histogram.clone();
        sorted.sort_by(f64::total_cmp);
        let q = self.config.cluster_quantile.clamp(0.0, 1.0);
        let idx = ((q * (bins - 1) as f64).ceil() as usize).min(bins - 1);
        let threshold = sorted[idx];

        let mut clusters = Vec::new();
        let mut run: Option<(usize, f64)> = None;
        for (i, &vol) in histogram.iter().enumerate() {
            let hot = vol > 0.0 && vol >= threshold;
            match (hot, run) {
                (true, None) => run = Some((i, vol)),
                (true, Some((start, acc))) => run = Some((start, acc + vol)),
                (false, Some((start, acc))) => {
                    clusters.push(Cluster {
                        low: lo + start as f64 * width,
                        high: lo + i as f64 * width,
                        volume: acc,
                    });
                    run = None;
                }
                (false, None) => {}
            }
        }
        if let Some((start, acc)) = run {
            clusters.push(Cluster {
                low: lo + start as f64 * width,
                high: hi,
                volume: acc,
            });
        }
        Some((clusters, total))
    }

    fn zone_at(&self, edge: f64, sma: Option<f64>) -> GridZone {
        let center = match sma {
            Some(ma) => nudge_toward(edge, ma, self.config.ma_nudge_max_pct),
            None => edge,
        };
        GridZone::around(center, self.config.zone_width_pct)
    }
}

/// Move `center` halfway toward `ma` when they are within `max_pct` percent.
pub fn nudge_toward(center: f64, ma: f64, max_pct: f64) -> f64 {
    if center <= 0.0 {
        return center;
    }
    let gap_pct = (ma - center).abs() / center * 100.0;
    if gap_pct <= max_pct {
        (center + ma) / 2.0
    } else {
        center
    }
}

impl GridLevelProvider for VolumeProfileProvider {
    fn compute(
        &self,
        symbol: &str,
        timestamp: NaiveDateTime,
    ) -> Result<GridLevels, GridUnavailable> {
        if symbol != self.symbol {
            return Err(GridUnavailable::InsufficientBars {
                timeframe: 1,
                have: 0,
                need: self.config.min_bars,
            });
        }
        let history = self.history(timestamp);
        let Some(last) = history.last() else {
            return Err(GridUnavailable::InsufficientBars {
                timeframe: 1,
                have: 0,
                need: self.config.min_bars,
            });
        };
        let price = last.close;

        let windows = self.windows(history)?;
        let (clusters, total) = self.clusters(&windows).ok_or(GridUnavailable::NoClusters)?;

        let mut below: Vec<Cluster> = clusters.iter().copied().filter(|c| c.high < price).collect();
        let mut above: Vec<Cluster> = clusters.iter().copied().filter(|c| c.low > price).collect();
        below.sort_by(|a, b| b.high.total_cmp(&a.high));
        above.sort_by(|a, b| a.low.total_cmp(&b.low));
        below.truncate(2);
        above.truncate(2);
        if below.is_empty() && above.is_empty() {
            return Err(GridUnavailable::NoClusters);
        }

        let sma = sma_close(history, self.config.ma_period);
        let supports: Vec<GridZone> = below.iter().map(|c| self.zone_at(c.low, sma)).collect();
        let resistances: Vec<GridZone> = above.iter().map(|c| self.zone_at(c.high, sma)).collect();

        let chosen: f64 = below.iter().chain(&above).map(|c| c.volume).sum();
        let mut levels = GridLevels::empty(timestamp);
        levels.support_1 = ZoneSlot::from(supports.first().copied());
        levels.support_2 = ZoneSlot::from(supports.get(1).copied());
        levels.resistance_1 = ZoneSlot::from(resistances.first().copied());
        levels.resistance_2 = ZoneSlot::from(resistances.get(1).copied());
        levels.analysis_quality =
            (0.5 * levels.zone_count() as f64 / 4.0 + 0.5 * chosen / total).clamp(0.0, 1.0);
        Ok(levels)
    }
}
