//! Pending limit buy orders that reserve capital until filled or expired.
//!
//! An order leaves `Pending` exactly once. Its funds move from `Locked` to
//! `Released` in the same step.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use super::capital::{CapitalAccount, Funding};
use super::error::GridTraderError;
use super::execution::{BuyFill, BuyRequest, ExecutionPolicy};
use super::grid::{GridLevels, GridZone, LevelName};
use super::ledger::PositionLedger;

pub type OrderId = u64;

const AMOUNT_DUST: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Buy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Filled,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FundStatus {
    Locked,
    Released,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingOrder {
    pub id: OrderId,
    pub side: OrderSide,
    pub level: LevelName,
    pub target_price: f64,
    pub zone: GridZone,
    /// Amount reserved at creation.
    pub locked_amount: f64,
    /// Part of the reservation not yet spent. Kept after settlement so
    /// `filled_amount` stays meaningful.
    pub remaining_amount: f64,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub status: OrderStatus,
    pub fund_status: FundStatus,
    pub settled_at: Option<NaiveDateTime>,
}

impl PendingOrder {
    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        self.status == OrderStatus::Pending && now < self.expires_at
    }

    pub fn filled_amount(&self) -> f64 {
        self.locked_amount - self.remaining_amount
    }

    /// Leave `Pending` and hand back whatever is still reserved.
    fn settle(&mut self, status: OrderStatus, now: NaiveDateTime) -> f64 {
        let residual = self.remaining_amount;
        self.status = status;
        self.fund_status = FundStatus::Released;
        self.settled_at = Some(now);
        residual
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderFill {
    pub order_id: OrderId,
    pub fill: BuyFill,
    /// True when this fill used up the order.
    pub completed: bool,
}

/// Reservation handed back when an order leaves `Pending` unfilled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub order_id: OrderId,
    pub level: LevelName,
    pub released: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingOrderBook {
    orders: Vec<PendingOrder>,
    next_id: OrderId,
    validity: TimeDelta,
    min_notional: f64,
}

impl PendingOrderBook {
    pub fn new(validity: TimeDelta, min_notional: f64) -> Self {
        PendingOrderBook {
            orders: Vec::new(),
            next_id: 1,
            validity,
            min_notional,
        }
    }

    /// Reserve all capital the level can still deploy as one buy order.
    ///
    /// Returns `None` when that amount is zero or below the minimum notional.
    pub fn create_buy_order(
        &mut self,
        account: &mut CapitalAccount,
        level: LevelName,
        target_price: f64,
        zone: GridZone,
        now: NaiveDateTime,
    ) -> Result<Option<&PendingOrder>, GridTraderError> {
        let amount = account.available_capital(level);
        if amount <= 0.0 || amount < self.min_notional {
            return Ok(None);
        }
        account.lock(level, amount)?;

        let id = self.next_id;
        self.next_id += 1;
        self.orders.push(PendingOrder {
            id,
            side: OrderSide::Buy,
            level,
            target_price,
            zone,
            locked_amount: amount,
            remaining_amount: amount,
            created_at: now,
            expires_at: now
                .checked_add_signed(self.validity)
                .unwrap_or(NaiveDateTime::MAX),
            status: OrderStatus::Pending,
            fund_status: FundStatus::Locked,
            settled_at: None,
        });
        tracing::debug!(id, %level, amount, target_price, "buy order created");
        Ok(self.orders.last())
    }

    /// Fill every live order whose limit is at or above `price`.
    ///
    /// The policy decides how much of the reservation each touch spends; an
    /// order only becomes `Filled` once nothing is left of it.
    #[allow(clippy::too_many_arguments)]
    pub fn try_fill(
        &mut self,
        account: &mut CapitalAccount,
        ledger: &mut PositionLedger,
        policy: &dyn ExecutionPolicy,
        price: f64,
        now: NaiveDateTime,
        grid: &GridLevels,
        stop_loss_pct: f64,
    ) -> Vec<OrderFill> {
        let mut fills = Vec::new();
        for order in self
            .orders
            .iter_mut()
            .filter(|o| o.is_active(now) && o.target_price >= price)
        {
            let zone = order.zone;
            let Some(fill) = policy.buy(
                account,
                ledger,
                BuyRequest {
                    level: order.level,
                    price,
                    time: now,
                    zone: &zone,
                    grid,
                    budget: order.remaining_amount,
                    funding: Funding::Reserved,
                    stop_loss_pct,
                },
            ) else {
                continue;
            };

            order.remaining_amount = (order.remaining_amount - fill.amount).max(0.0);
            let completed = order.remaining_amount <= AMOUNT_DUST;
            if completed {
                let residual = order.settle(OrderStatus::Filled, now);
                account.release(order.level, residual);
            }
            tracing::debug!(
                order = order.id,
                position = fill.position_id,
                amount = fill.amount,
                completed,
                "order filled"
            );
            fills.push(OrderFill {
                order_id: order.id,
                fill,
                completed,
            });
        }
        fills
    }

    /// Mark every pending order past its expiry as expired and release its
    /// reservation. No cash moves.
    pub fn expire(&mut self, account: &mut CapitalAccount, now: NaiveDateTime) -> Vec<Settlement> {
        let mut expired = Vec::new();
        for order in self
            .orders
            .iter_mut()
            .filter(|o| o.status == OrderStatus::Pending && now >= o.expires_at)
        {
            let released = order.settle(OrderStatus::Expired, now);
            account.release(order.level, released);
            expired.push(Settlement {
                order_id: order.id,
                level: order.level,
                released,
            });
        }
        expired
    }

    /// Cancel one pending order. Returns false if it had already settled.
    pub fn cancel(
        &mut self,
        account: &mut CapitalAccount,
        id: OrderId,
        now: NaiveDateTime,
    ) -> Result<bool, GridTraderError> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(GridTraderError::UnknownOrder { id })?;
        if order.status != OrderStatus::Pending {
            return Ok(false);
        }
        let residual = order.settle(OrderStatus::Cancelled, now);
        account.release(order.level, residual);
        Ok(true)
    }

    pub fn cancel_all(
        &mut self,
        account: &mut CapitalAccount,
        now: NaiveDateTime,
    ) -> Vec<Settlement> {
        let mut cancelled = Vec::new();
        for order in self
            .orders
            .iter_mut()
            .filter(|o| o.status == OrderStatus::Pending)
        {
            let released = order.settle(OrderStatus::Cancelled, now);
            account.release(order.level, released);
            cancelled.push(Settlement {
                order_id: order.id,
                level: order.level,
                released,
            });
        }
        cancelled
    }

    pub fn has_active_order(&self, level: LevelName, now: NaiveDateTime) -> bool {
        self.orders
            .iter()
            .any(|o| o.level == level && o.is_active(now))
    }

    pub fn order(&self, id: OrderId) -> Result<&PendingOrder, GridTraderError> {
        self.orders
            .iter()
            .find(|o| o.id == id)
            .ok_or(GridTraderError::UnknownOrder { id })
    }

    pub fn orders(&self) -> &[PendingOrder] {
        &self.orders
    }

    /// Sum of reservations still held by pending orders.
    pub fn locked_total(&self) -> f64 {
        self.orders
            .iter()
            .filter(|o| o.fund_status == FundStatus::Locked)
            .map(|o| o.remaining_amount)
            .sum()
    }
}
