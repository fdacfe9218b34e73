//! Per-bar snapshots and the trade events recorded in them.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::grid::{GridLevels, LevelName, TargetName};
use super::order_book::OrderId;
use super::position::{Position, PositionId, PositionStatus};

/// Something that happened during one bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TradeEvent {
    Buy {
        position_id: PositionId,
        order_id: Option<OrderId>,
        level: LevelName,
        price: f64,
        amount: f64,
        quantity: f64,
        weight: f64,
    },
    Sell {
        position_id: PositionId,
        level: LevelName,
        target: TargetName,
        price: f64,
        quantity: f64,
        revenue: f64,
        pnl: f64,
        closed: bool,
    },
    StopLoss {
        position_id: PositionId,
        level: LevelName,
        price: f64,
        quantity: f64,
        revenue: f64,
        pnl: f64,
        reason: String,
    },
    CreateOrder {
        order_id: OrderId,
        level: LevelName,
        target_price: f64,
        amount: f64,
        expires_at: NaiveDateTime,
    },
    ExpireOrder {
        order_id: OrderId,
        level: LevelName,
        released: f64,
    },
    CancelOrder {
        order_id: OrderId,
        level: LevelName,
        released: f64,
    },
}

impl TradeEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            TradeEvent::Buy { .. } => "buy",
            TradeEvent::Sell { .. } => "sell",
            TradeEvent::StopLoss { .. } => "stop_loss",
            TradeEvent::CreateOrder { .. } => "create_order",
            TradeEvent::ExpireOrder { .. } => "expire_order",
            TradeEvent::CancelOrder { .. } => "cancel_order",
        }
    }
}

/// Reporting view of an open position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionView {
    pub id: PositionId,
    pub level: LevelName,
    pub status: PositionStatus,
    pub entry_price: f64,
    pub quantity: f64,
    pub remaining_quantity: f64,
    pub stop_loss_price: f64,
    pub r1_price: f64,
    pub r2_price: f64,
    pub r1_sold_pct: f64,
    pub r2_sold_pct: f64,
    pub unrealized_pnl: f64,
}

impl PositionView {
    pub fn of(position: &Position, price: f64) -> Self {
        PositionView {
            id: position.id,
            level: position.level,
            status: position.status(),
            entry_price: position.entry_price,
            quantity: position.quantity,
            remaining_quantity: position.remaining_quantity(),
            stop_loss_price: position.stop_loss_price,
            r1_price: position.target(TargetName::R1).price,
            r2_price: position.target(TargetName::R2).price,
            r1_sold_pct: position.sold_pct_at(TargetName::R1),
            r2_sold_pct: position.sold_pct_at(TargetName::R2),
            unrealized_pnl: position.market_value(price) - position.open_cost_basis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSnapshot {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub cash: f64,
    pub locked: f64,
    pub total_value: f64,
    pub grid: GridLevels,
    pub open_positions: Vec<PositionView>,
    pub events: Vec<TradeEvent>,
}
