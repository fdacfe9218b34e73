//! Grid positions and their partial take-profit targets.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::grid::{LevelName, TargetName};

/// Quantities closer than this are treated as equal.
pub const QTY_TOLERANCE: f64 = 1e-8;

pub type PositionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    Open,
    Partial,
    Closed,
}

/// A scheduled partial exit at one resistance zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Target {
    pub name: TargetName,
    pub price: f64,
    pub zone_low: f64,
    pub zone_high: f64,
    /// Share of the original position size, in percent.
    pub allocation_pct: f64,
    pub sold_quantity: f64,
}

impl Target {
    pub fn allocation_quantity(&self, total_quantity: f64) -> f64 {
        total_quantity * self.allocation_pct / 100.0
    }

    pub fn is_reached(&self, price: f64) -> bool {
        price >= self.price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub id: PositionId,
    pub level: LevelName,
    pub entry_price: f64,
    pub entry_time: NaiveDateTime,
    pub quantity: f64,
    pub capital_spent: f64,
    /// Fraction of the available budget deployed by the buy that opened it.
    pub weight: f64,
    pub sold_quantity: f64,
    pub revenue: f64,
    /// Fixed at entry.
    pub stop_loss_price: f64,
    pub targets: [Target; 2],
    pub closed_at: Option<NaiveDateTime>,
}

impl Position {
    pub fn status(&self) -> PositionStatus {
        if self.sold_quantity <= QTY_TOLERANCE {
            PositionStatus::Open
        } else if self.quantity - self.sold_quantity <= QTY_TOLERANCE {
            PositionStatus::Closed
        } else {
            PositionStatus::Partial
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status() == PositionStatus::Closed
    }

    pub fn remaining_quantity(&self) -> f64 {
        (self.quantity - self.sold_quantity).max(0.0)
    }

    pub fn target(&self, name: TargetName) -> &Target {
        &self.targets[name.index()]
    }

    /// Quantity still scheduled for `name`, capped by what is left overall.
    pub fn unsold_allocation(&self, name: TargetName) -> f64 {
        let target = self.target(name);
        let scheduled = target.allocation_quantity(self.quantity) - target.sold_quantity;
        scheduled.min(self.remaining_quantity()).max(0.0)
    }

    pub fn sold_pct_at(&self, name: TargetName) -> f64 {
        let allocated = self.target(name).allocation_quantity(self.quantity);
        if allocated <= 0.0 {
            return 0.0;
        }
        self.target(name).sold_quantity / allocated * 100.0
    }

    /// Entry cost attributed to the quantity not yet sold.
    pub fn open_cost_basis(&self) -> f64 {
        if self.quantity <= 0.0 {
            return 0.0;
        }
        self.capital_spent * self.remaining_quantity() / self.quantity
    }

    /// Revenue minus the entry cost of the quantity sold so far.
    pub fn realized_pnl(&self) -> f64 {
        self.revenue - (self.capital_spent - self.open_cost_basis())
    }

    /// Cumulative revenue minus full entry cost.
    pub fn profit_loss(&self) -> f64 {
        self.revenue - self.capital_spent
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.remaining_quantity() * price
    }

    pub fn should_stop_loss(&self, price: f64) -> bool {
        !self.is_closed() && price <= self.stop_loss_price
    }
}
