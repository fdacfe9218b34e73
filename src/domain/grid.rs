//! Grid zones, level names and the grid level provider seam.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::GridTraderError;

/// A price band around a support or resistance center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridZone {
    pub price: f64,
    pub zone_low: f64,
    pub zone_high: f64,
}

impl GridZone {
    pub fn new(price: f64, zone_low: f64, zone_high: f64) -> Self {
        GridZone {
            price,
            zone_low,
            zone_high,
        }
    }

    /// Zone centered on `price` spanning `width_pct` percent in total.
    pub fn around(price: f64, width_pct: f64) -> Self {
        let half = width_pct / 200.0;
        GridZone {
            price,
            zone_low: price * (1.0 - half),
            zone_high: price * (1.0 + half),
        }
    }

    pub fn width(&self) -> f64 {
        self.zone_high - self.zone_low
    }

    /// Relative depth of `price` inside the zone: 0 at the floor, 1 at the
    /// ceiling, clamped outside.
    pub fn depth(&self, price: f64) -> f64 {
        if self.width() <= 0.0 {
            return 0.0;
        }
        ((price - self.zone_low) / self.width()).clamp(0.0, 1.0)
    }
}

/// One of the four zone slots of a grid snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ZoneSlot {
    Present(GridZone),
    Absent,
}

impl ZoneSlot {
    pub fn zone(&self) -> Option<&GridZone> {
        match self {
            ZoneSlot::Present(zone) => Some(zone),
            ZoneSlot::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ZoneSlot::Present(_))
    }
}

impl From<Option<GridZone>> for ZoneSlot {
    fn from(zone: Option<GridZone>) -> Self {
        match zone {
            Some(z) => ZoneSlot::Present(z),
            None => ZoneSlot::Absent,
        }
    }
}

/// Buy levels. Only support zones carry capital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum LevelName {
    #[serde(rename = "support_1")]
    Support1,
    #[serde(rename = "support_2")]
    Support2,
}

impl LevelName {
    pub const ALL: [LevelName; 2] = [LevelName::Support1, LevelName::Support2];

    pub fn index(self) -> usize {
        match self {
            LevelName::Support1 => 0,
            LevelName::Support2 => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LevelName::Support1 => "support_1",
            LevelName::Support2 => "support_2",
        }
    }
}

impl fmt::Display for LevelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelName {
    type Err = GridTraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "support_1" | "s1" => Ok(LevelName::Support1),
            "support_2" | "s2" => Ok(LevelName::Support2),
            other => Err(GridTraderError::UnknownLevel {
                name: other.to_string(),
            }),
        }
    }
}

/// Take-profit targets, one per resistance zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TargetName {
    R1,
    R2,
}

impl TargetName {
    pub const ALL: [TargetName; 2] = [TargetName::R1, TargetName::R2];

    pub fn index(self) -> usize {
        match self {
            TargetName::R1 => 0,
            TargetName::R2 => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetName::R1 => "R1",
            TargetName::R2 => "R2",
        }
    }
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetName {
    type Err = GridTraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "R1" | "RESISTANCE_1" => Ok(TargetName::R1),
            "R2" | "RESISTANCE_2" => Ok(TargetName::R2),
            _ => Err(GridTraderError::UnknownTarget {
                name: s.trim().to_string(),
            }),
        }
    }
}

/// Grid snapshot for one timestamp: up to two supports and two resistances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLevels {
    pub timestamp: NaiveDateTime,
    pub support_1: ZoneSlot,
    pub support_2: ZoneSlot,
    pub resistance_1: ZoneSlot,
    pub resistance_2: ZoneSlot,
    pub analysis_quality: f64,
}

impl GridLevels {
    pub fn empty(timestamp: NaiveDateTime) -> Self {
        GridLevels {
            timestamp,
            support_1: ZoneSlot::Absent,
            support_2: ZoneSlot::Absent,
            resistance_1: ZoneSlot::Absent,
            resistance_2: ZoneSlot::Absent,
            analysis_quality: 0.0,
        }
    }

    pub fn support(&self, level: LevelName) -> &ZoneSlot {
        match level {
            LevelName::Support1 => &self.support_1,
            LevelName::Support2 => &self.support_2,
        }
    }

    pub fn resistance(&self, target: TargetName) -> &ZoneSlot {
        match target {
            TargetName::R1 => &self.resistance_1,
            TargetName::R2 => &self.resistance_2,
        }
    }

    pub fn zone_count(&self) -> usize {
        [
            &self.support_1,
            &self.support_2,
            &self.resistance_1,
            &self.resistance_2,
        ]
        .iter()
        .filter(|slot| slot.is_present())
        .count()
    }
}

/// Why a grid could not be computed for a bar.
#[derive(Debug, Clone, PartialEq)]
pub enum GridUnavailable {
    InsufficientBars {
        timeframe: usize,
        have: usize,
        need: usize,
    },
    NoClusters,
}

impl fmt::Display for GridUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridUnavailable::InsufficientBars {
                timeframe,
                have,
                need,
            } => write!(
                f,
                "timeframe x{timeframe} has {have} bars, needs {need}"
            ),
            GridUnavailable::NoClusters => f.write_str("no volume cluster on either side"),
        }
    }
}

/// Source of grid zones, recomputed every bar.
pub trait GridLevelProvider {
    fn compute(
        &self,
        symbol: &str,
        timestamp: NaiveDateTime,
    ) -> Result<GridLevels, GridUnavailable>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn zone_around_splits_width() {
        let z = GridZone::around(100.0, 2.0);
        assert!((z.zone_low - 99.0).abs() < 1e-9);
        assert!((z.zone_high - 101.0).abs() < 1e-9);
    }

    #[test]
    fn depth_is_clamped() {
        let z = GridZone::new(110.0, 100.0, 120.0);
        assert!((z.depth(110.0) - 0.5).abs() < 1e-12);
        assert_eq!(z.depth(90.0), 0.0);
        assert_eq!(z.depth(130.0), 1.0);
        let flat = GridZone::new(100.0, 100.0, 100.0);
        assert_eq!(flat.depth(100.0), 0.0);
    }

    #[test]
    fn level_names_parse() {
        assert_eq!("support_1".parse::<LevelName>().unwrap(), LevelName::Support1);
        assert_eq!("S2".parse::<LevelName>().unwrap(), LevelName::Support2);
        assert!(matches!(
            "support_3".parse::<LevelName>(),
            Err(GridTraderError::UnknownLevel { .. })
        ));
    }

    #[test]
    fn target_names_parse() {
        assert_eq!("r1".parse::<TargetName>().unwrap(), TargetName::R1);
        assert_eq!("resistance_2".parse::<TargetName>().unwrap(), TargetName::R2);
        assert!(matches!(
            "R3".parse::<TargetName>(),
            Err(GridTraderError::UnknownTarget { .. })
        ));
    }

    #[test]
    fn zone_count_handles_partial_grids() {
        let mut grid = GridLevels::empty(ts());
        assert_eq!(grid.zone_count(), 0);
        grid.support_1 = ZoneSlot::Present(GridZone::around(95.0, 1.0));
        grid.resistance_2 = ZoneSlot::Present(GridZone::around(120.0, 1.0));
        assert_eq!(grid.zone_count(), 2);
        assert!(grid.support(LevelName::Support1).is_present());
        assert!(grid.support(LevelName::Support2).zone().is_none());
        assert!(grid.resistance(TargetName::R2).is_present());
    }

    #[test]
    fn absent_slot_serializes_as_null() {
        let mut grid = GridLevels::empty(ts());
        grid.support_1 = ZoneSlot::Present(GridZone::new(100.0, 99.0, 101.0));
        let json = serde_json::to_value(&grid).unwrap();
        assert!(json["support_2"].is_null());
        assert!((json["support_1"]["zone_low"].as_f64().unwrap() - 99.0).abs() < 1e-12);
    }
}
