//! Bar-by-bar grid simulation.
//!
//! Each processed bar runs: grid refresh, order expiry, order fills, order
//! creation (or direct buys), stop-loss sweep, take-profit sweep, snapshot.
//! A bar without a grid is skipped entirely.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use super::capital::{CapitalAccount, Funding};
use super::error::GridTraderError;
use super::execution::{build_policy, BuyRequest, ExecutionPolicy, PolicyKind};
use super::grid::{GridLevelProvider, GridLevels, LevelName, TargetName};
use super::ledger::PositionLedger;
use super::metrics::{periods_per_year, EquityPoint, Metrics};
use super::ohlcv::{bar_interval, check_series, OhlcvBar};
use super::order_book::PendingOrderBook;
use super::position::{Position, PositionId};
use super::snapshot::{BarSnapshot, PositionView, TradeEvent};
use super::strategy::{GridStrategy, OrderMode};

const DEFAULT_BAR_INTERVAL_HOURS: i64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub initial_capital: f64,
    /// Annual rate as a fraction, used for Sharpe and Sortino.
    pub risk_free_rate: f64,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl BacktestConfig {
    pub fn new(symbol: impl Into<String>, initial_capital: f64) -> Self {
        BacktestConfig {
            symbol: symbol.into(),
            initial_capital,
            risk_free_rate: 0.0,
            start: None,
            end: None,
        }
    }

    fn in_window(&self, timestamp: NaiveDateTime) -> bool {
        self.start.is_none_or(|s| timestamp >= s) && self.end.is_none_or(|e| timestamp <= e)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    pub bars_processed: usize,
    pub bars_skipped: usize,
    pub buys: usize,
    pub sells: usize,
    pub stop_losses: usize,
    pub orders_created: usize,
    pub orders_expired: usize,
    pub orders_cancelled: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub strategy: String,
    pub policy: PolicyKind,
    pub order_mode: OrderMode,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub final_cash: f64,
    /// Percent.
    pub total_return_pct: f64,
    pub counters: RunCounters,
    pub positions_opened: usize,
    pub positions_closed: usize,
    /// Share of closed positions with positive profit, in percent.
    pub win_rate_pct: f64,
    pub metrics: Metrics,
    pub equity_curve: Vec<EquityPoint>,
    pub snapshots: Vec<BarSnapshot>,
    pub positions: Vec<Position>,
}

/// Mutable state of one symbol's run. The account, ledger and order book are
/// owned here and only mutated through their own methods.
pub struct GridSimulation {
    symbol: String,
    strategy: GridStrategy,
    policy: Box<dyn ExecutionPolicy>,
    account: CapitalAccount,
    ledger: PositionLedger,
    book: PendingOrderBook,
    counters: RunCounters,
    equity_curve: Vec<EquityPoint>,
    snapshots: Vec<BarSnapshot>,
    last_price: Option<f64>,
}

impl GridSimulation {
    pub fn new(
        symbol: impl Into<String>,
        strategy: GridStrategy,
        initial_capital: f64,
        bar_interval: TimeDelta,
    ) -> Self {
        let policy = build_policy(strategy.policy, strategy.execution, strategy.decay_k);
        // saturate instead of overflowing on absurd validity settings
        let validity = i32::try_from(strategy.order_validity_bars)
            .ok()
            .and_then(|bars| bar_interval.checked_mul(bars))
            .unwrap_or(TimeDelta::MAX);
        GridSimulation {
            symbol: symbol.into(),
            account: CapitalAccount::new(initial_capital, strategy.caps),
            ledger: PositionLedger::new(),
            book: PendingOrderBook::new(validity, strategy.execution.min_notional),
            policy,
            strategy,
            counters: RunCounters::default(),
            equity_curve: Vec::new(),
            snapshots: Vec::new(),
            last_price: None,
        }
    }

    pub fn account(&self) -> &CapitalAccount {
        &self.account
    }

    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    pub fn book(&self) -> &PendingOrderBook {
        &self.book
    }

    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    pub fn total_value(&self, price: f64) -> f64 {
        self.account.cash() + self.ledger.market_value(price)
    }

    /// Process one bar. Returns `None` when the bar was skipped.
    pub fn step(
        &mut self,
        bar: &OhlcvBar,
        provider: &dyn GridLevelProvider,
    ) -> Result<Option<&BarSnapshot>, GridTraderError> {
        let now = bar.timestamp;
        let price = bar.close;
        self.last_price = Some(price);

        let grid = match provider.compute(&self.symbol, now) {
            Ok(grid) => grid,
            Err(reason) => {
                tracing::debug!(%now, %reason, "no grid, skipping bar");
                self.counters.bars_skipped += 1;
                return Ok(None);
            }
        };
        self.counters.bars_processed += 1;

        let mut events = Vec::new();
        self.expire_orders(now, &mut events);
        self.fill_orders(price, now, &grid, &mut events);
        match self.strategy.order_mode {
            OrderMode::Pending => self.create_missing_orders(now, &grid, &mut events)?,
            OrderMode::Immediate => self.buy_in_zone(price, now, &grid, &mut events),
        }
        self.stop_loss_sweep(price, now, &mut events)?;
        self.take_profit_sweep(price, now, &mut events)?;

        let total_value = self.total_value(price);
        self.equity_curve.push(EquityPoint {
            timestamp: now,
            equity: total_value,
        });
        self.snapshots.push(BarSnapshot {
            timestamp: now,
            price,
            cash: self.account.cash(),
            locked: self.account.total_locked(),
            total_value,
            grid,
            open_positions: self
                .ledger
                .open_positions()
                .map(|p| PositionView::of(p, price))
                .collect(),
            events,
        });
        Ok(self.snapshots.last())
    }

    fn expire_orders(&mut self, now: NaiveDateTime, events: &mut Vec<TradeEvent>) {
        for s in self.book.expire(&mut self.account, now) {
            self.counters.orders_expired += 1;
            events.push(TradeEvent::ExpireOrder {
                order_id: s.order_id,
                level: s.level,
                released: s.released,
            });
        }
    }

    fn fill_orders(
        &mut self,
        price: f64,
        now: NaiveDateTime,
        grid: &GridLevels,
        events: &mut Vec<TradeEvent>,
    ) {
        let fills = self.book.try_fill(
            &mut self.account,
            &mut self.ledger,
            self.policy.as_ref(),
            price,
            now,
            grid,
            self.strategy.stop_loss_pct,
        );
        for f in fills {
            self.counters.buys += 1;
            events.push(TradeEvent::Buy {
                position_id: f.fill.position_id,
                order_id: Some(f.order_id),
                level: f.fill.level,
                price: f.fill.price,
                amount: f.fill.amount,
                quantity: f.fill.quantity,
                weight: f.fill.weight,
            });
        }
    }

    fn create_missing_orders(
        &mut self,
        now: NaiveDateTime,
        grid: &GridLevels,
        events: &mut Vec<TradeEvent>,
    ) -> Result<(), GridTraderError> {
        for level in LevelName::ALL {
            let Some(zone) = grid.support(level).zone() else {
                continue;
            };
            if self.book.has_active_order(level, now) {
                continue;
            }
            if let Some(order) =
                self.book
                    .create_buy_order(&mut self.account, level, zone.zone_high, *zone, now)?
            {
                self.counters.orders_created += 1;
                events.push(TradeEvent::CreateOrder {
                    order_id: order.id,
                    level,
                    target_price: order.target_price,
                    amount: order.locked_amount,
                    expires_at: order.expires_at,
                });
            }
        }
        Ok(())
    }

    fn buy_in_zone(
        &mut self,
        price: f64,
        now: NaiveDateTime,
        grid: &GridLevels,
        events: &mut Vec<TradeEvent>,
    ) {
        for level in LevelName::ALL {
            let Some(zone) = grid.support(level).zone() else {
                continue;
            };
            let budget = self.account.available_capital(level);
            let fill = self.policy.buy(
                &mut self.account,
                &mut self.ledger,
                BuyRequest {
                    level,
                    price,
                    time: now,
                    zone,
                    grid,
                    budget,
                    funding: Funding::Free,
                    stop_loss_pct: self.strategy.stop_loss_pct,
                },
            );
            if let Some(fill) = fill {
                self.counters.buys += 1;
                events.push(TradeEvent::Buy {
                    position_id: fill.position_id,
                    order_id: None,
                    level,
                    price,
                    amount: fill.amount,
                    quantity: fill.quantity,
                    weight: fill.weight,
                });
            }
        }
    }

    fn stop_loss_sweep(
        &mut self,
        price: f64,
        now: NaiveDateTime,
        events: &mut Vec<TradeEvent>,
    ) -> Result<(), GridTraderError> {
        let ids: Vec<PositionId> = self
            .ledger
            .find_stop_loss_triggered(price)
            .iter()
            .map(|p| p.id)
            .collect();
        if ids.is_empty() {
            return Ok(());
        }
        let reason = format!("price {price:.4} at or below stop");
        let liquidation = self.policy.stop_loss(
            &mut self.account,
            &mut self.ledger,
            &ids,
            price,
            now,
            &reason,
        )?;
        tracing::debug!(
            %now,
            positions = liquidation.sales.len(),
            revenue = liquidation.total_revenue,
            "stop loss"
        );
        for sale in &liquidation.sales {
            self.counters.stop_losses += 1;
            events.push(TradeEvent::StopLoss {
                position_id: sale.position_id,
                level: sale.level,
                price: sale.price,
                quantity: sale.quantity,
                revenue: sale.revenue,
                pnl: sale.pnl(),
                reason: liquidation.reason.clone(),
            });
        }
        Ok(())
    }

    fn take_profit_sweep(
        &mut self,
        price: f64,
        now: NaiveDateTime,
        events: &mut Vec<TradeEvent>,
    ) -> Result<(), GridTraderError> {
        for target in TargetName::ALL {
            let ids: Vec<PositionId> = self
                .ledger
                .find_sell_eligible(price, target)
                .iter()
                .map(|p| p.id)
                .collect();
            for id in ids {
                let sale =
                    self.policy
                        .sell(&mut self.account, &mut self.ledger, id, target, price, now)?;
                if let Some(sale) = sale {
                    self.counters.sells += 1;
                    events.push(TradeEvent::Sell {
                        position_id: sale.position_id,
                        level: sale.level,
                        target,
                        price: sale.price,
                        quantity: sale.quantity,
                        revenue: sale.revenue,
                        pnl: sale.pnl(),
                        closed: sale.closed,
                    });
                }
            }
        }
        Ok(())
    }

    /// Cancel leftover orders and assemble the result. Open positions stay
    /// open and are valued at the last seen close.
    pub fn finish(mut self, end: NaiveDateTime, risk_free_rate: f64) -> BacktestResult {
        let cancelled = self.book.cancel_all(&mut self.account, end);
        if !cancelled.is_empty() {
            self.counters.orders_cancelled += cancelled.len();
            let events = cancelled.iter().map(|s| TradeEvent::CancelOrder {
                order_id: s.order_id,
                level: s.level,
                released: s.released,
            });
            if let Some(last) = self.snapshots.last_mut() {
                last.events.extend(events);
                last.locked = self.account.total_locked();
            }
        }

        let initial_capital = self.account.initial_capital();
        let final_capital = self
            .last_price
            .map(|p| self.total_value(p))
            .unwrap_or(self.account.cash());

        let interval = bar_interval_of(&self.equity_curve);
        let metrics = Metrics::compute(
            initial_capital,
            &self.equity_curve,
            self.ledger.positions(),
            periods_per_year(interval),
            risk_free_rate,
        );

        let positions_closed = self.ledger.closed_positions().count();
        let winners = self
            .ledger
            .closed_positions()
            .filter(|p| p.profit_loss() > 0.0)
            .count();
        let win_rate_pct = if positions_closed > 0 {
            winners as f64 / positions_closed as f64 * 100.0
        } else {
            0.0
        };
        let total_return_pct = if initial_capital > 0.0 {
            (final_capital - initial_capital) / initial_capital * 100.0
        } else {
            0.0
        };

        BacktestResult {
            symbol: self.symbol,
            strategy: self.strategy.name,
            policy: self.strategy.policy,
            order_mode: self.strategy.order_mode,
            initial_capital,
            final_capital,
            final_cash: self.account.cash(),
            total_return_pct,
            counters: self.counters,
            positions_opened: self.ledger.positions().len(),
            positions_closed,
            win_rate_pct,
            metrics,
            equity_curve: self.equity_curve,
            snapshots: self.snapshots,
            positions: self.ledger.positions().to_vec(),
        }
    }
}

fn bar_interval_of(curve: &[EquityPoint]) -> TimeDelta {
    curve
        .windows(2)
        .map(|w| w[1].timestamp - w[0].timestamp)
        .filter(|d| *d > TimeDelta::zero())
        .min()
        .unwrap_or(TimeDelta::hours(DEFAULT_BAR_INTERVAL_HOURS))
}

/// Replay `bars` through the strategy.
///
/// `bars` is the full history handed to the grid provider; only bars inside
/// the configured window are replayed.
pub fn run_backtest(
    config: &BacktestConfig,
    strategy: &GridStrategy,
    bars: &[OhlcvBar],
    provider: &dyn GridLevelProvider,
) -> Result<BacktestResult, GridTraderError> {
    check_series(&config.symbol, bars)?;
    if bars.len() < strategy.grid.min_bars {
        return Err(GridTraderError::InsufficientData {
            symbol: config.symbol.clone(),
            bars: bars.len(),
            minimum: strategy.grid.min_bars,
        });
    }

    let interval =
        bar_interval(bars).unwrap_or(TimeDelta::hours(DEFAULT_BAR_INTERVAL_HOURS));
    let mut sim = GridSimulation::new(
        config.symbol.clone(),
        strategy.clone(),
        config.initial_capital,
        interval,
    );

    tracing::info!(
        symbol = %config.symbol,
        bars = bars.len(),
        policy = %strategy.policy,
        mode = %strategy.order_mode,
        "starting backtest"
    );

    let mut last_time = None;
    for bar in bars.iter().filter(|b| config.in_window(b.timestamp)) {
        sim.step(bar, provider)?;
        last_time = Some(bar.timestamp);
    }
    let Some(end) = last_time else {
        return Err(GridTraderError::NoData {
            symbol: config.symbol.clone(),
        });
    };

    let result = sim.finish(end, config.risk_free_rate);
    tracing::info!(
        symbol = %result.symbol,
        processed = result.counters.bars_processed,
        skipped = result.counters.bars_skipped,
        final_capital = result.final_capital,
        return_pct = result.total_return_pct,
        "backtest finished"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::ExecutionConfig;
    use crate::domain::grid::{GridUnavailable, GridZone, ZoneSlot};
    use crate::domain::order_book::OrderStatus;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn t(i: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + TimeDelta::hours(i)
    }

    fn bar(i: i64, close: f64) -> OhlcvBar {
        OhlcvBar {
            timestamp: t(i),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    /// Same zones on every bar; skips bars listed in `gaps`.
    struct StaticGrid {
        gaps: Vec<NaiveDateTime>,
    }

    impl GridLevelProvider for StaticGrid {
        fn compute(&self, _: &str, ts: NaiveDateTime) -> Result<GridLevels, GridUnavailable> {
            if self.gaps.contains(&ts) {
                return Err(GridUnavailable::NoClusters);
            }
            let mut g = GridLevels::empty(ts);
            g.support_1 = ZoneSlot::Present(GridZone::new(105.0, 100.0, 110.0));
            g.resistance_1 = ZoneSlot::Present(GridZone::new(127.5, 125.0, 130.0));
            g.resistance_2 = ZoneSlot::Present(GridZone::new(132.5, 130.0, 135.0));
            g.analysis_quality = 0.6;
            Ok(g)
        }
    }

    fn strategy(mode: OrderMode) -> GridStrategy {
        GridStrategy {
            order_mode: mode,
            order_validity_bars: 3,
            execution: ExecutionConfig {
                fee_pct: 0.0,
                min_notional: 10.0,
            },
            grid: crate::domain::volume_profile::GridConfig {
                min_bars: 2,
                ..Default::default()
            },
            ..GridStrategy::default()
        }
    }

    fn config() -> BacktestConfig {
        BacktestConfig::new("TEST", 5_000.0)
    }

    #[test]
    fn pending_order_fills_then_targets_close_position() {
        let bars = vec![bar(0, 115.0), bar(1, 105.0), bar(2, 130.0)];
        let provider = StaticGrid { gaps: vec![] };
        let result = run_backtest(&config(), &strategy(OrderMode::Pending), &bars, &provider).unwrap();

        // cap 20% of 5000 = 1000; once invested nothing is left to reserve
        assert_eq!(result.counters.orders_created, 1);
        assert_eq!(result.counters.buys, 1);
        assert_eq!(result.counters.sells, 2);
        assert_eq!(result.positions_closed, 1);
        let qty = 1_000.0 / 105.0;
        assert_relative_eq!(result.final_cash, 5_000.0 - 1_000.0 + qty * 130.0, epsilon = 1e-6);
        assert_relative_eq!(result.win_rate_pct, 100.0);

        let kinds: Vec<&str> = result.snapshots[0].events.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["create_order"]);
    }

    #[test]
    fn skipped_bars_produce_no_snapshot() {
        let bars = vec![bar(0, 115.0), bar(1, 116.0), bar(2, 117.0)];
        let provider = StaticGrid { gaps: vec![t(1)] };
        let result = run_backtest(&config(), &strategy(OrderMode::Pending), &bars, &provider).unwrap();
        assert_eq!(result.counters.bars_skipped, 1);
        assert_eq!(result.counters.bars_processed, 2);
        assert_eq!(result.snapshots.len(), 2);
        assert_eq!(result.equity_curve.len(), 2);
        assert_eq!(result.snapshots[1].timestamp, t(2));
    }

    #[test]
    fn unfilled_order_expires_and_is_recreated() {
        let bars: Vec<OhlcvBar> = (0..5).map(|i| bar(i, 120.0)).collect();
        let provider = StaticGrid { gaps: vec![] };
        let mut sim = GridSimulation::new("TEST", strategy(OrderMode::Pending), 5_000.0, TimeDelta::hours(1));

        for b in &bars[..3] {
            sim.step(b, &provider).unwrap();
        }
        assert_eq!(sim.counters().orders_created, 1);
        assert_relative_eq!(sim.account().available_capital(LevelName::Support1), 0.0);

        let snap = sim.step(&bars[3], &provider).unwrap().unwrap();
        let kinds: Vec<&str> = snap.events.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["expire_order", "create_order"]);
        assert_eq!(sim.book().orders()[0].status, OrderStatus::Expired);
        assert_eq!(sim.counters().orders_expired, 1);
    }

    #[test]
    fn validity_beyond_i32_does_not_wrap_negative() {
        let mut strat = strategy(OrderMode::Pending);
        strat.order_validity_bars = u32::MAX;
        let provider = StaticGrid { gaps: vec![] };
        let mut sim = GridSimulation::new("TEST", strat, 5_000.0, TimeDelta::hours(1));

        for i in 0..3 {
            sim.step(&bar(i, 120.0), &provider).unwrap();
        }
        let order = &sim.book().orders()[0];
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.expires_at > order.created_at);
        assert_eq!(sim.counters().orders_expired, 0);
        assert_eq!(sim.counters().orders_created, 1);
    }

    #[test]
    fn validity_past_calendar_end_saturates() {
        let mut strat = strategy(OrderMode::Pending);
        strat.order_validity_bars = 100_000_000;
        let provider = StaticGrid { gaps: vec![] };
        let mut sim = GridSimulation::new("TEST", strat, 5_000.0, TimeDelta::days(1));

        sim.step(&bar(0, 120.0), &provider).unwrap();
        sim.step(&bar(24, 120.0), &provider).unwrap();
        let order = &sim.book().orders()[0];
        assert_eq!(order.expires_at, NaiveDateTime::MAX);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(sim.counters().orders_expired, 0);
    }

    #[test]
    fn zero_min_notional_opens_no_empty_positions() {
        let mut strat = strategy(OrderMode::Pending);
        strat.execution.min_notional = 0.0;
        let bars: Vec<OhlcvBar> = (0..6).map(|i| bar(i, 105.0)).collect();
        let provider = StaticGrid { gaps: vec![] };
        let result = run_backtest(&config(), &strat, &bars, &provider).unwrap();

        assert_eq!(result.counters.buys, 1);
        assert_eq!(result.counters.orders_created, 1);
        assert_eq!(result.positions_opened, 1);
    }

    #[test]
    fn leftover_orders_are_cancelled_at_end() {
        let bars = vec![bar(0, 120.0), bar(1, 121.0)];
        let provider = StaticGrid { gaps: vec![] };
        let result = run_backtest(&config(), &strategy(OrderMode::Pending), &bars, &provider).unwrap();
        assert_eq!(result.counters.orders_cancelled, 1);
        let last = result.snapshots.last().unwrap();
        assert_eq!(last.events.last().unwrap().kind(), "cancel_order");
        assert_eq!(last.locked, 0.0);
        assert_relative_eq!(result.final_capital, 5_000.0);
    }

    #[test]
    fn immediate_mode_buys_without_orders() {
        let bars = vec![bar(0, 108.0), bar(1, 109.0)];
        let provider = StaticGrid { gaps: vec![] };
        let result =
            run_backtest(&config(), &strategy(OrderMode::Immediate), &bars, &provider).unwrap();
        assert_eq!(result.counters.orders_created, 0);
        assert_eq!(result.counters.buys, 1);
        assert_eq!(result.positions_opened, 1);
    }

    #[test]
    fn stop_loss_liquidates_at_market() {
        // stop anchor is support_1 low 100, 5% below -> 95
        let bars = vec![bar(0, 105.0), bar(1, 94.0)];
        let provider = StaticGrid { gaps: vec![] };
        let result =
            run_backtest(&config(), &strategy(OrderMode::Immediate), &bars, &provider).unwrap();
        assert_eq!(result.counters.stop_losses, 1);
        assert_eq!(result.positions_closed, 1);
        assert_relative_eq!(result.win_rate_pct, 0.0);
        assert!(result.final_capital < 5_000.0);
    }

    #[test]
    fn window_filters_replayed_bars() {
        let bars: Vec<OhlcvBar> = (0..6).map(|i| bar(i, 120.0)).collect();
        let provider = StaticGrid { gaps: vec![] };
        let cfg = BacktestConfig {
            start: Some(t(2)),
            end: Some(t(3)),
            ..config()
        };
        let result = run_backtest(&cfg, &strategy(OrderMode::Pending), &bars, &provider).unwrap();
        assert_eq!(result.snapshots.len(), 2);
    }

    #[test]
    fn empty_window_is_no_data() {
        let bars: Vec<OhlcvBar> = (0..3).map(|i| bar(i, 120.0)).collect();
        let provider = StaticGrid { gaps: vec![] };
        let cfg = BacktestConfig {
            start: Some(t(10)),
            ..config()
        };
        let err = run_backtest(&cfg, &strategy(OrderMode::Pending), &bars, &provider).unwrap_err();
        assert!(matches!(err, GridTraderError::NoData { .. }));
    }

    #[test]
    fn too_few_bars_is_insufficient_data() {
        let bars = vec![bar(0, 120.0)];
        let provider = StaticGrid { gaps: vec![] };
        let err = run_backtest(&config(), &strategy(OrderMode::Pending), &bars, &provider).unwrap_err();
        assert!(matches!(err, GridTraderError::InsufficientData { bars: 1, minimum: 2, .. }));
    }
}
