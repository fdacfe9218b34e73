//! Property tests for simulation invariants.
//!
//! Uses proptest to verify:
//! 1. Capital conservation: free cash, reservations and open cost basis
//!    always add up to initial capital plus realized pnl
//! 2. Level caps: no level ever holds more than its share of initial capital
//! 3. Orders never spend more than they reserved
//! 4. Sold quantities only grow and settled orders stay settled
//! 5. Execution weights stay within (0, 1]

mod common;

use chrono::TimeDelta;
use common::*;
use gridtrader::domain::backtest::GridSimulation;
use gridtrader::domain::execution::{buy_weight, sell_weight, PolicyKind};
use gridtrader::domain::grid::{GridZone, LevelName};
use gridtrader::domain::strategy::{GridStrategy, OrderMode};
use proptest::prelude::*;
use std::collections::HashMap;

const EPS: f64 = 1e-6;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        (80.0..140.0_f64).prop_map(|p| (p * 100.0).round() / 100.0),
        2..60,
    )
}

fn arb_mode() -> impl Strategy<Value = OrderMode> {
    prop_oneof![Just(OrderMode::Pending), Just(OrderMode::Immediate)]
}

fn arb_policy() -> impl Strategy<Value = PolicyKind> {
    prop_oneof![Just(PolicyKind::Simple), Just(PolicyKind::Progressive)]
}

fn strategy_for(mode: OrderMode, policy: PolicyKind, fee_pct: f64) -> GridStrategy {
    let mut strategy = make_strategy(mode);
    strategy.policy = policy;
    strategy.execution.fee_pct = fee_pct;
    strategy
}

// ── 1-3. Accounting across whole runs ────────────────────────────────

proptest! {
    /// free_cash + locked + open cost basis == initial + realized pnl, after every bar.
    #[test]
    fn capital_is_conserved(
        closes in arb_closes(),
        mode in arb_mode(),
        policy in arb_policy(),
        fee_pct in 0.0..0.5_f64,
    ) {
        let grid = FixedGrid::two_supports();
        let mut sim = GridSimulation::new(
            "PROP",
            strategy_for(mode, policy, fee_pct),
            10_000.0,
            TimeDelta::hours(1),
        );
        for bar in make_bars(&closes) {
            sim.step(&bar, &grid).unwrap();
            let account = sim.account();
            let ledger = sim.ledger();
            let lhs = account.free_cash() + account.total_locked() + ledger.open_cost_basis();
            let rhs = account.initial_capital() + ledger.realized_pnl();
            prop_assert!((lhs - rhs).abs() < EPS, "lhs {lhs} != rhs {rhs}");
            prop_assert!((account.total_locked() - sim.book().locked_total()).abs() < EPS);
        }
    }

    /// invested + locked never exceeds a level's cap and free cash never goes negative.
    #[test]
    fn level_caps_hold(
        closes in arb_closes(),
        mode in arb_mode(),
        policy in arb_policy(),
    ) {
        let grid = FixedGrid::two_supports();
        let mut sim = GridSimulation::new(
            "PROP",
            strategy_for(mode, policy, 0.1),
            10_000.0,
            TimeDelta::hours(1),
        );
        for bar in make_bars(&closes) {
            sim.step(&bar, &grid).unwrap();
            let account = sim.account();
            for level in LevelName::ALL {
                let used = account.invested(level) + account.locked(level);
                prop_assert!(used <= account.theoretical_cap(level) + EPS);
                prop_assert!(account.available_capital(level) >= 0.0);
            }
            prop_assert!(account.free_cash() >= -EPS);
        }
    }

    /// No order spends more than it locked, and settled orders hold nothing.
    #[test]
    fn orders_never_overfill(
        closes in arb_closes(),
        policy in arb_policy(),
    ) {
        let grid = FixedGrid::two_supports();
        let mut sim = GridSimulation::new(
            "PROP",
            strategy_for(OrderMode::Pending, policy, 0.0),
            10_000.0,
            TimeDelta::hours(1),
        );
        for bar in make_bars(&closes) {
            sim.step(&bar, &grid).unwrap();
        }
        for order in sim.book().orders() {
            prop_assert!(order.remaining_amount >= 0.0);
            prop_assert!(order.filled_amount() <= order.locked_amount + EPS);
        }
        let spent: f64 = sim.ledger().positions().iter().map(|p| p.capital_spent).sum();
        let filled: f64 = sim.book().orders().iter().map(|o| o.filled_amount()).sum();
        prop_assert!((spent - filled).abs() < EPS);
    }

    /// Sales at a target never exceed that target's allocation.
    #[test]
    fn targets_never_oversell(
        closes in arb_closes(),
        mode in arb_mode(),
        policy in arb_policy(),
    ) {
        let grid = FixedGrid::two_supports();
        let mut sim = GridSimulation::new(
            "PROP",
            strategy_for(mode, policy, 0.0),
            10_000.0,
            TimeDelta::hours(1),
        );
        for bar in make_bars(&closes) {
            sim.step(&bar, &grid).unwrap();
        }
        for position in sim.ledger().positions() {
            prop_assert!(position.sold_quantity <= position.quantity + EPS);
            for target in &position.targets {
                prop_assert!(
                    target.sold_quantity <= target.allocation_quantity(position.quantity) + EPS
                );
            }
        }
    }
}

// ── 4. Monotonic bookkeeping, checked after every bar ───────────────

proptest! {
    /// Position and per-target sold quantities never shrink between bars.
    #[test]
    fn sold_quantities_never_decrease(
        closes in arb_closes(),
        mode in arb_mode(),
        policy in arb_policy(),
    ) {
        let grid = FixedGrid::two_supports();
        let mut sim = GridSimulation::new(
            "PROP",
            strategy_for(mode, policy, 0.1),
            10_000.0,
            TimeDelta::hours(1),
        );
        let mut seen: HashMap<u64, (f64, [f64; 2])> = HashMap::new();
        for bar in make_bars(&closes) {
            sim.step(&bar, &grid).unwrap();
            for position in sim.ledger().positions() {
                let now = (
                    position.sold_quantity,
                    [position.targets[0].sold_quantity, position.targets[1].sold_quantity],
                );
                if let Some((sold, targets)) = seen.get(&position.id) {
                    prop_assert!(now.0 >= sold - EPS, "position {} sold {sold} -> {}", position.id, now.0);
                    for i in 0..2 {
                        prop_assert!(now.1[i] >= targets[i] - EPS);
                    }
                }
                seen.insert(position.id, now);
            }
        }
    }

    /// Once an order is settled its status, fund status and remainder are frozen.
    #[test]
    fn settled_orders_stay_settled(
        closes in arb_closes(),
        policy in arb_policy(),
    ) {
        let grid = FixedGrid::two_supports();
        let mut sim = GridSimulation::new(
            "PROP",
            strategy_for(OrderMode::Pending, policy, 0.0),
            10_000.0,
            TimeDelta::hours(1),
        );
        let mut settled = HashMap::new();
        for bar in make_bars(&closes) {
            sim.step(&bar, &grid).unwrap();
            for order in sim.book().orders() {
                let Some(at) = order.settled_at else {
                    prop_assert!(!settled.contains_key(&order.id));
                    continue;
                };
                let now = (at, order.status, order.fund_status, order.remaining_amount);
                match settled.get(&order.id) {
                    Some(before) => prop_assert_eq!(before, &now),
                    None => {
                        settled.insert(order.id, now);
                    }
                }
            }
        }
    }
}

// ── 5. Weights ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn weights_are_bounded(
        low in 50.0..150.0_f64,
        width in 0.5..30.0_f64,
        offset in -10.0..40.0_f64,
        k in 0.1..10.0_f64,
    ) {
        let zone = GridZone::new(low + width / 2.0, low, low + width);
        let price = low + offset;
        let b = buy_weight(price, &zone, k);
        let s = sell_weight(price, &zone, k);
        prop_assert!(b > 0.0 && b <= 1.0);
        prop_assert!(s > 0.0 && s <= 1.0);
    }

    /// Deeper into a support zone never buys less.
    #[test]
    fn buy_weight_grows_toward_floor(
        low in 50.0..150.0_f64,
        width in 0.5..30.0_f64,
        a in 0.0..1.0_f64,
        b in 0.0..1.0_f64,
    ) {
        let zone = GridZone::new(low + width / 2.0, low, low + width);
        let (deep, shallow) = if a <= b { (a, b) } else { (b, a) };
        let w_deep = buy_weight(low + deep * width, &zone, 3.0);
        let w_shallow = buy_weight(low + shallow * width, &zone, 3.0);
        prop_assert!(w_deep >= w_shallow - 1e-12);
    }
}
