//! Capital account: the single owner of cash, invested and locked totals.
//!
//! Locks are reservations inside the cash balance. Only [`CapitalAccount::invest`]
//! withdraws cash and only [`CapitalAccount::divest`] returns it.

use serde::Serialize;

use super::error::GridTraderError;
use super::grid::LevelName;

const DUST: f64 = 1e-9;

/// Where the money for a purchase comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Funding {
    /// Unreserved available capital.
    Free,
    /// Capital previously reserved by a pending order at the same level.
    Reserved,
}

/// Per-level share of initial capital, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelCaps {
    pub support_1_pct: f64,
    pub support_2_pct: f64,
}

impl Default for LevelCaps {
    fn default() -> Self {
        LevelCaps {
            support_1_pct: 20.0,
            support_2_pct: 30.0,
        }
    }
}

impl LevelCaps {
    pub fn pct(&self, level: LevelName) -> f64 {
        match level {
            LevelName::Support1 => self.support_1_pct,
            LevelName::Support2 => self.support_2_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalAccount {
    initial_capital: f64,
    cash: f64,
    caps: LevelCaps,
    invested: [f64; 2],
    locked: [f64; 2],
}

impl CapitalAccount {
    pub fn new(initial_capital: f64, caps: LevelCaps) -> Self {
        CapitalAccount {
            initial_capital,
            cash: initial_capital,
            caps,
            invested: [0.0; 2],
            locked: [0.0; 2],
        }
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    /// Cash balance, reservations included.
    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn invested(&self, level: LevelName) -> f64 {
        self.invested[level.index()]
    }

    pub fn locked(&self, level: LevelName) -> f64 {
        self.locked[level.index()]
    }

    pub fn total_locked(&self) -> f64 {
        self.locked.iter().sum()
    }

    /// Cash not promised to any pending order.
    pub fn free_cash(&self) -> f64 {
        self.cash - self.total_locked()
    }

    pub fn theoretical_cap(&self, level: LevelName) -> f64 {
        self.initial_capital * self.caps.pct(level) / 100.0
    }

    /// Capital a level may still deploy:
    /// `min(cap - invested - locked_here, cash - locked_everywhere)`, floored at 0.
    pub fn available_capital(&self, level: LevelName) -> f64 {
        let headroom =
            self.theoretical_cap(level) - self.invested(level) - self.locked(level);
        headroom.min(self.free_cash()).max(0.0)
    }

    /// Reserve `amount` for a pending order without touching cash.
    pub fn lock(&mut self, level: LevelName, amount: f64) -> Result<(), GridTraderError> {
        let available = self.available_capital(level);
        if amount > available + DUST {
            return Err(GridTraderError::CapitalOverCommitted {
                level: level.to_string(),
                requested: amount,
                available,
            });
        }
        self.locked[level.index()] += amount;
        Ok(())
    }

    /// Hand a reservation back to the available pool.
    pub fn release(&mut self, level: LevelName, amount: f64) {
        let slot = &mut self.locked[level.index()];
        *slot = (*slot - amount).max(0.0);
        if *slot < DUST {
            *slot = 0.0;
        }
    }

    /// Withdraw `amount` from cash into the level's invested total.
    pub fn invest(&mut self, level: LevelName, amount: f64, funding: Funding) {
        if funding == Funding::Reserved {
            self.release(level, amount);
        }
        self.cash -= amount;
        self.invested[level.index()] += amount;
        if self.cash < 0.0 {
            tracing::warn!(
                cash = self.cash,
                %level,
                amount,
                "cash balance went negative"
            );
        }
    }

    /// Return sale proceeds to cash and drop `cost_basis` from the level's
    /// invested total.
    pub fn divest(&mut self, level: LevelName, cost_basis: f64, proceeds: f64) {
        let slot = &mut self.invested[level.index()];
        *slot = (*slot - cost_basis).max(0.0);
        if *slot < DUST {
            *slot = 0.0;
        }
        self.cash += proceeds;
    }
}
