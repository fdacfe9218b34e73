//! Grid strategy parameters.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::capital::LevelCaps;
use crate::domain::error::GridTraderError;
use crate::domain::execution::{ExecutionConfig, PolicyKind, DEFAULT_DECAY_K};
use crate::domain::volume_profile::GridConfig;

/// How a support touch turns into a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderMode {
    /// Reserve capital as a limit order at the top of the zone.
    Pending,
    /// Buy straight from free capital when price is in the zone.
    Immediate,
}

impl fmt::Display for OrderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderMode::Pending => f.write_str("pending"),
            OrderMode::Immediate => f.write_str("immediate"),
        }
    }
}

impl FromStr for OrderMode {
    type Err = GridTraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderMode::Pending),
            "immediate" => Ok(OrderMode::Immediate),
            other => Err(GridTraderError::ConfigInvalid {
                section: "strategy".into(),
                key: "order_mode".into(),
                reason: format!("unknown order mode '{other}' (expected pending or immediate)"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridStrategy {
    pub name: String,
    pub caps: LevelCaps,
    /// Percent below the stop anchor.
    pub stop_loss_pct: f64,
    pub order_validity_bars: u32,
    pub order_mode: OrderMode,
    pub policy: PolicyKind,
    pub execution: ExecutionConfig,
    pub decay_k: f64,
    pub grid: GridConfig,
}

impl Default for GridStrategy {
    fn default() -> Self {
        GridStrategy {
            name: "grid".into(),
            caps: LevelCaps::default(),
            stop_loss_pct: 5.0,
            order_validity_bars: 24,
            order_mode: OrderMode::Pending,
            policy: PolicyKind::Simple,
            execution: ExecutionConfig::default(),
            decay_k: DEFAULT_DECAY_K,
            grid: GridConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = GridStrategy::default();
        assert_eq!(s.caps.support_1_pct, 20.0);
        assert_eq!(s.caps.support_2_pct, 30.0);
        assert_eq!(s.stop_loss_pct, 5.0);
        assert_eq!(s.order_validity_bars, 24);
        assert_eq!(s.order_mode, OrderMode::Pending);
        assert_eq!(s.policy, PolicyKind::Simple);
        assert_eq!(s.decay_k, 3.0);
    }

    #[test]
    fn order_mode_parsing() {
        assert_eq!("Pending".parse::<OrderMode>().unwrap(), OrderMode::Pending);
        assert_eq!(" immediate ".parse::<OrderMode>().unwrap(), OrderMode::Immediate);
        assert!(matches!(
            "market".parse::<OrderMode>(),
            Err(GridTraderError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn order_mode_display_round_trips() {
        for mode in [OrderMode::Pending, OrderMode::Immediate] {
            assert_eq!(mode.to_string().parse::<OrderMode>().unwrap(), mode);
        }
    }
}
