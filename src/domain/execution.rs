//! Execution policies: how much to buy or sell when price touches a zone.
//!
//! Both policies share the booking logic in the provided trait methods and
//! differ only in the fraction they return. `Simple` is all-or-nothing;
//! `Progressive` scales with an exponential decay of the distance from the
//! favorable edge of the zone.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::capital::{CapitalAccount, Funding};
use super::error::GridTraderError;
use super::grid::{GridLevels, GridZone, LevelName, TargetName};
use super::ledger::{Entry, PositionLedger, Sale};
use super::position::{PositionId, QTY_TOLERANCE, Target};

pub const DEFAULT_DECAY_K: f64 = 3.0;

/// Fee and size floor shared by both policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExecutionConfig {
    /// Proportional fee on every notional, in percent.
    pub fee_pct: f64,
    /// Smallest notional worth transacting.
    pub min_notional: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            fee_pct: 0.1,
            min_notional: 10.0,
        }
    }
}

/// Quantity bought with `spend` after the fee is taken off the notional.
pub fn net_quantity(spend: f64, price: f64, fee_pct: f64) -> f64 {
    spend * (1.0 - fee_pct / 100.0) / price
}

/// `min(1, exp(-k*d))` with `d` the clamped depth above the zone floor.
pub fn buy_weight(price: f64, zone: &GridZone, k: f64) -> f64 {
    (-k * zone.depth(price)).exp().min(1.0)
}

/// `min(1, exp(-k*(1-d)))`, accelerating toward the zone ceiling.
pub fn sell_weight(price: f64, zone: &GridZone, k: f64) -> f64 {
    (-k * (1.0 - zone.depth(price))).exp().min(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Simple,
    Progressive,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Simple => f.write_str("simple"),
            PolicyKind::Progressive => f.write_str("progressive"),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = GridTraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(PolicyKind::Simple),
            "progressive" => Ok(PolicyKind::Progressive),
            other => Err(GridTraderError::ConfigInvalid {
                section: "execution".into(),
                key: "policy".into(),
                reason: format!("unknown policy '{other}' (expected simple or progressive)"),
            }),
        }
    }
}

/// A zone touch that may turn into a purchase.
#[derive(Debug, Clone)]
pub struct BuyRequest<'a> {
    pub level: LevelName,
    pub price: f64,
    pub time: NaiveDateTime,
    pub zone: &'a GridZone,
    pub grid: &'a GridLevels,
    /// Capital this touch may draw on.
    pub budget: f64,
    pub funding: Funding,
    pub stop_loss_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyFill {
    pub position_id: PositionId,
    pub level: LevelName,
    pub price: f64,
    pub amount: f64,
    pub quantity: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Liquidation {
    pub reason: String,
    pub sales: Vec<Sale>,
    pub total_revenue: f64,
}

pub trait ExecutionPolicy {
    fn kind(&self) -> PolicyKind;

    fn config(&self) -> &ExecutionConfig;

    /// Fraction of the budget to deploy at `price`, or `None` if the price
    /// is above the zone.
    fn buy_fraction(&self, price: f64, zone: &GridZone) -> Option<f64>;

    /// Fraction of a target's unsold allocation to sell at `price`, or `None`
    /// if the target is not reached.
    fn sell_fraction(&self, price: f64, target: &Target) -> Option<f64>;

    fn buy(
        &self,
        account: &mut CapitalAccount,
        ledger: &mut PositionLedger,
        req: BuyRequest<'_>,
    ) -> Option<BuyFill> {
        let cfg = self.config();
        if req.price <= 0.0 || req.budget < cfg.min_notional {
            return None;
        }
        let weight = self.buy_fraction(req.price, req.zone)?;
        let mut amount = req.budget * weight;
        if req.budget - amount < cfg.min_notional {
            amount = req.budget;
        } else if amount < cfg.min_notional {
            return None;
        }
        if amount <= 0.0 {
            return None;
        }

        let quantity = net_quantity(amount, req.price, cfg.fee_pct);
        let position = ledger.open_position(
            account,
            Entry {
                level: req.level,
                price: req.price,
                quantity,
                capital_spent: amount,
                weight,
                time: req.time,
                grid: req.grid,
                stop_loss_pct: req.stop_loss_pct,
                funding: req.funding,
            },
        );

        Some(BuyFill {
            position_id: position.id,
            level: req.level,
            price: req.price,
            amount,
            quantity,
            weight,
        })
    }

    fn sell(
        &self,
        account: &mut CapitalAccount,
        ledger: &mut PositionLedger,
        id: PositionId,
        target: TargetName,
        price: f64,
        time: NaiveDateTime,
    ) -> Result<Option<Sale>, GridTraderError> {
        let cfg = *self.config();
        let position = ledger.position(id)?;
        let Some(weight) = self.sell_fraction(price, position.target(target)) else {
            return Ok(None);
        };
        let unsold = position.unsold_allocation(target);
        if unsold <= QTY_TOLERANCE {
            return Ok(None);
        }

        let mut quantity = unsold * weight;
        if (unsold - quantity) * price < cfg.min_notional {
            quantity = unsold;
        } else if quantity * price < cfg.min_notional {
            return Ok(None);
        }

        ledger.record_sale(account, id, Some(target), quantity, price, cfg.fee_pct, time)
    }

    /// Sell everything left in each position at market, targets ignored.
    fn stop_loss(
        &self,
        account: &mut CapitalAccount,
        ledger: &mut PositionLedger,
        ids: &[PositionId],
        price: f64,
        time: NaiveDateTime,
        reason: &str,
    ) -> Result<Liquidation, GridTraderError> {
        let fee_pct = self.config().fee_pct;
        let mut sales = Vec::with_capacity(ids.len());
        for &id in ids {
            let remaining = ledger.position(id)?.remaining_quantity();
            if let Some(sale) = ledger.record_sale(account, id, None, remaining, price, fee_pct, time)? {
                sales.push(sale);
            }
        }
        let total_revenue = sales.iter().map(|s| s.revenue).sum();
        Ok(Liquidation {
            reason: reason.to_string(),
            sales,
            total_revenue,
        })
    }
}

/// Buys the whole budget once price is inside or below the zone; sells the
/// whole target allocation once the target is reached.
#[derive(Debug, Clone)]
pub struct SimpleExecutor {
    config: ExecutionConfig,
}

impl SimpleExecutor {
    pub fn new(config: ExecutionConfig) -> Self {
        SimpleExecutor { config }
    }
}

impl ExecutionPolicy for SimpleExecutor {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Simple
    }

    fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    fn buy_fraction(&self, price: f64, zone: &GridZone) -> Option<f64> {
        (price <= zone.zone_high).then_some(1.0)
    }

    fn sell_fraction(&self, price: f64, target: &Target) -> Option<f64> {
        target.is_reached(price).then_some(1.0)
    }
}

/// Scales every transaction with an exponential decay weight, so a single
/// zone visit may fill across several bars.
#[derive(Debug, Clone)]
pub struct ProgressiveExecutor {
    config: ExecutionConfig,
    decay_k: f64,
}

impl ProgressiveExecutor {
    pub fn new(config: ExecutionConfig, decay_k: f64) -> Self {
        ProgressiveExecutor { config, decay_k }
    }
}

impl ExecutionPolicy for ProgressiveExecutor {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Progressive
    }

    fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    fn buy_fraction(&self, price: f64, zone: &GridZone) -> Option<f64> {
        (price <= zone.zone_high).then(|| buy_weight(price, zone, self.decay_k))
    }

    fn sell_fraction(&self, price: f64, target: &Target) -> Option<f64> {
        if !target.is_reached(price) {
            return None;
        }
        let zone = GridZone::new(target.price, target.zone_low, target.zone_high);
        Some(sell_weight(price, &zone, self.decay_k))
    }
}

pub fn build_policy(
    kind: PolicyKind,
    config: ExecutionConfig,
    decay_k: f64,
) -> Box<dyn ExecutionPolicy> {
    match kind {
        PolicyKind::Simple => Box::new(SimpleExecutor::new(config)),
        PolicyKind::Progressive => Box::new(ProgressiveExecutor::new(config, decay_k)),
    }
}
