//! Position ledger: opens positions, books partial sales, answers which
//! positions are due for take-profit or stop-loss.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::capital::{CapitalAccount, Funding};
use super::error::GridTraderError;
use super::grid::{GridLevels, LevelName, TargetName};
use super::position::{Position, PositionId, QTY_TOLERANCE, Target};

/// Default exit bands relative to entry when a resistance zone is missing.
const DEFAULT_R1_BAND: (f64, f64) = (1.10, 1.12);
const DEFAULT_R2_BAND: (f64, f64) = (1.18, 1.22);

/// Everything needed to book a purchase.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub level: LevelName,
    pub price: f64,
    pub quantity: f64,
    pub capital_spent: f64,
    pub weight: f64,
    pub time: NaiveDateTime,
    pub grid: &'a GridLevels,
    pub stop_loss_pct: f64,
    pub funding: Funding,
}

/// A booked sale, partial or full.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sale {
    pub position_id: PositionId,
    pub level: LevelName,
    /// `None` for liquidations that ignore targets.
    pub target: Option<TargetName>,
    pub price: f64,
    pub quantity: f64,
    pub fee: f64,
    pub revenue: f64,
    pub cost_basis: f64,
    pub closed: bool,
}

impl Sale {
    pub fn pnl(&self) -> f64 {
        self.revenue - self.cost_basis
    }
}

/// R1/R2 split of the original size, in percent, by entry level.
pub fn allocation_split(level: LevelName) -> (f64, f64) {
    match level {
        LevelName::Support1 => (50.0, 50.0),
        LevelName::Support2 => (70.0, 30.0),
    }
}

/// Stop price below the deepest known support, fixed at entry.
pub fn stop_loss_price(grid: &GridLevels, entry_price: f64, stop_loss_pct: f64) -> f64 {
    let anchor = grid
        .support_2
        .zone()
        .or(grid.support_1.zone())
        .map(|z| z.zone_low)
        .unwrap_or(entry_price);
    anchor * (1.0 - stop_loss_pct / 100.0)
}

fn build_target(
    name: TargetName,
    grid: &GridLevels,
    entry_price: f64,
    allocation_pct: f64,
) -> Target {
    let (zone_low, zone_high) = match grid.resistance(name).zone() {
        Some(zone) => (zone.zone_low, zone.zone_high),
        None => {
            let (lo, hi) = match name {
                TargetName::R1 => DEFAULT_R1_BAND,
                TargetName::R2 => DEFAULT_R2_BAND,
            };
            (entry_price * lo, entry_price * hi)
        }
    };
    Target {
        name,
        price: zone_low,
        zone_low,
        zone_high,
        allocation_pct,
        sold_quantity: 0.0,
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PositionLedger {
    positions: Vec<Position>,
    next_id: PositionId,
}

impl PositionLedger {
    pub fn new() -> Self {
        PositionLedger {
            positions: Vec::new(),
            next_id: 1,
        }
    }

    /// Book a purchase and debit its cost in the same step.
    pub fn open_position(&mut self, account: &mut CapitalAccount, entry: Entry<'_>) -> &Position {
        let (r1_pct, r2_pct) = allocation_split(entry.level);
        let id = self.next_id.max(1);
        self.next_id = id + 1;

        account.invest(entry.level, entry.capital_spent, entry.funding);

        let position = Position {
            id,
            level: entry.level,
            entry_price: entry.price,
            entry_time: entry.time,
            quantity: entry.quantity,
            capital_spent: entry.capital_spent,
            weight: entry.weight,
            sold_quantity: 0.0,
            revenue: 0.0,
            stop_loss_price: stop_loss_price(entry.grid, entry.price, entry.stop_loss_pct),
            targets: [
                build_target(TargetName::R1, entry.grid, entry.price, r1_pct),
                build_target(TargetName::R2, entry.grid, entry.price, r2_pct),
            ],
            closed_at: None,
        };
        tracing::debug!(
            id,
            level = %entry.level,
            price = entry.price,
            quantity = entry.quantity,
            spent = entry.capital_spent,
            "position opened"
        );
        self.positions.push(position);
        &self.positions[self.positions.len() - 1]
    }

    /// Sell `quantity` of a position at `price`, net of `fee_pct`.
    ///
    /// With a target, the quantity is capped by that target's unsold
    /// allocation; without one, by the whole remaining quantity.
    #[allow(clippy::too_many_arguments)]
    pub fn record_sale(
        &mut self,
        account: &mut CapitalAccount,
        id: PositionId,
        target: Option<TargetName>,
        quantity: f64,
        price: f64,
        fee_pct: f64,
        time: NaiveDateTime,
    ) -> Result<Option<Sale>, GridTraderError> {
        let position = self
            .positions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GridTraderError::UnknownPosition { id })?;

        let cap = match target {
            Some(name) => position.unsold_allocation(name),
            None => position.remaining_quantity(),
        };
        let mut qty = quantity.min(cap);
        if qty <= QTY_TOLERANCE {
            return Ok(None);
        }
        // snap to the remainder so a position can actually reach `closed`
        if position.remaining_quantity() - qty <= QTY_TOLERANCE {
            qty = position.remaining_quantity();
        }

        let cost_basis = position.capital_spent * qty / position.quantity;
        let gross = qty * price;
        let fee = gross * fee_pct / 100.0;
        let revenue = gross - fee;

        position.sold_quantity += qty;
        position.revenue += revenue;
        if let Some(name) = target {
            position.targets[name.index()].sold_quantity += qty;
        }
        let closed = position.is_closed();
        if closed {
            position.sold_quantity = position.quantity;
            position.closed_at = Some(time);
        }
        let level = position.level;

        account.divest(level, cost_basis, revenue);

        Ok(Some(Sale {
            position_id: id,
            level,
            target,
            price,
            quantity: qty,
            fee,
            revenue,
            cost_basis,
            closed,
        }))
    }

    /// Positions whose `target` price has been reached and whose allocation
    /// there is not yet exhausted.
    pub fn find_sell_eligible(&self, price: f64, target: TargetName) -> Vec<&Position> {
        self.positions
            .iter()
            .filter(|p| !p.is_closed())
            .filter(|p| p.target(target).is_reached(price))
            .filter(|p| p.unsold_allocation(target) > QTY_TOLERANCE)
            .collect()
    }

    pub fn find_stop_loss_triggered(&self, price: f64) -> Vec<&Position> {
        self.positions
            .iter()
            .filter(|p| p.should_stop_loss(price))
            .collect()
    }

    pub fn position(&self, id: PositionId) -> Result<&Position, GridTraderError> {
        self.positions
            .iter()
            .find(|p| p.id == id)
            .ok_or(GridTraderError::UnknownPosition { id })
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn open_positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter().filter(|p| !p.is_closed())
    }

    pub fn closed_positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter().filter(|p| p.is_closed())
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.open_positions().map(|p| p.market_value(price)).sum()
    }

    pub fn open_cost_basis(&self) -> f64 {
        self.positions.iter().map(Position::open_cost_basis).sum()
    }

    pub fn realized_pnl(&self) -> f64 {
        self.positions.iter().map(Position::realized_pnl).sum()
    }
}
