//! Configuration validation.
//!
//! Checks every field before a run and reports the first violation.

use crate::domain::error::GridTraderError;
use crate::domain::execution::PolicyKind;
use crate::domain::ohlcv::parse_timestamp;
use crate::domain::strategy::OrderMode;
use crate::domain::volume_profile::parse_timeframes;
use crate::ports::config_port::ConfigPort;

/// Upper bound on `order_validity_bars`.
pub const MAX_ORDER_VALIDITY_BARS: i64 = 100_000;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), GridTraderError> {
    validate_symbol(config)?;
    validate_run_settings(config)
}

/// Everything in `[backtest]` except the symbol, for runs where the symbol
/// comes from the command line.
pub fn validate_run_settings(config: &dyn ConfigPort) -> Result<(), GridTraderError> {
    validate_initial_capital(config)?;
    validate_risk_free_rate(config)?;
    validate_window(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), GridTraderError> {
    validate_caps(config)?;
    validate_stop_loss(config)?;
    validate_order_settings(config)?;
    validate_execution(config)?;
    validate_grid(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> GridTraderError {
    GridTraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), GridTraderError> {
    match config.get_string("backtest", "symbol") {
        Some(s) => check_symbol(&s),
        None => Err(GridTraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

/// Symbols name data files, so they must not contain path separators.
pub fn check_symbol(symbol: &str) -> Result<(), GridTraderError> {
    if symbol.contains(['/', '\\']) {
        return Err(invalid("backtest", "symbol", "symbol must not contain path separators"));
    }
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), GridTraderError> {
    let value = config.get_double("backtest", "initial_capital", 10_000.0);
    if value <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), GridTraderError> {
    let value = config.get_double("backtest", "risk_free_rate", 0.0);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_window(config: &dyn ConfigPort) -> Result<(), GridTraderError> {
    let mut bounds = Vec::with_capacity(2);
    for key in ["start", "end"] {
        let parsed = match config.get_string("backtest", key) {
            None => None,
            Some(raw) => Some(parse_timestamp(&raw).ok_or_else(|| {
                invalid(
                    "backtest",
                    key,
                    format!("invalid {key} '{raw}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"),
                )
            })?),
        };
        bounds.push(parsed);
    }
    if let [Some(start), Some(end)] = bounds[..] {
        if start >= end {
            return Err(invalid("backtest", "start", "start must be before end"));
        }
    }
    Ok(())
}

fn validate_caps(config: &dyn ConfigPort) -> Result<(), GridTraderError> {
    let s1 = config.get_double("strategy", "support_1_cap_pct", 20.0);
    let s2 = config.get_double("strategy", "support_2_cap_pct", 30.0);
    for (key, value) in [("support_1_cap_pct", s1), ("support_2_cap_pct", s2)] {
        if value <= 0.0 || value > 100.0 {
            return Err(invalid("strategy", key, format!("{key} must be in (0, 100]")));
        }
    }
    if s1 + s2 > 100.0 {
        return Err(invalid(
            "strategy",
            "support_2_cap_pct",
            "level caps together must not exceed 100",
        ));
    }
    Ok(())
}

fn validate_stop_loss(config: &dyn ConfigPort) -> Result<(), GridTraderError> {
    let value = config.get_double("strategy", "stop_loss_pct", 5.0);
    if !(0.0..100.0).contains(&value) {
        return Err(invalid(
            "strategy",
            "stop_loss_pct",
            "stop_loss_pct must be in [0, 100)",
        ));
    }
    Ok(())
}

fn validate_order_settings(config: &dyn ConfigPort) -> Result<(), GridTraderError> {
    let validity = config.get_int("strategy", "order_validity_bars", 24);
    if !(1..=MAX_ORDER_VALIDITY_BARS).contains(&validity) {
        return Err(invalid(
            "strategy",
            "order_validity_bars",
            format!("order_validity_bars must be in [1, {MAX_ORDER_VALIDITY_BARS}]"),
        ));
    }
    if config.get_double("strategy", "min_order_notional", 10.0) <= 0.0 {
        return Err(invalid(
            "strategy",
            "min_order_notional",
            "min_order_notional must be positive",
        ));
    }
    if let Some(mode) = config.get_string("strategy", "order_mode") {
        mode.parse::<OrderMode>()?;
    }
    Ok(())
}

fn validate_execution(config: &dyn ConfigPort) -> Result<(), GridTraderError> {
    if let Some(policy) = config.get_string("execution", "policy") {
        policy.parse::<PolicyKind>()?;
    }
    let fee = config.get_double("execution", "fee_pct", 0.1);
    if !(0.0..100.0).contains(&fee) {
        return Err(invalid("execution", "fee_pct", "fee_pct must be in [0, 100)"));
    }
    if config.get_double("execution", "decay_k", 3.0) <= 0.0 {
        return Err(invalid("execution", "decay_k", "decay_k must be positive"));
    }
    Ok(())
}

fn validate_grid(config: &dyn ConfigPort) -> Result<(), GridTraderError> {
    if let Some(raw) = config.get_string("grid", "timeframes") {
        parse_timeframes(&raw)?;
    }
    if config.get_int("grid", "bins", 48) < 2 {
        return Err(invalid("grid", "bins", "bins must be at least 2"));
    }
    if config.get_int("grid", "min_bars", 10) < 1 {
        return Err(invalid("grid", "min_bars", "min_bars must be at least 1"));
    }
    let q = config.get_double("grid", "cluster_quantile", 0.7);
    if !(0.0..=1.0).contains(&q) {
        return Err(invalid(
            "grid",
            "cluster_quantile",
            "cluster_quantile must be in [0, 1]",
        ));
    }
    if config.get_double("grid", "zone_width_pct", 1.0) <= 0.0 {
        return Err(invalid(
            "grid",
            "zone_width_pct",
            "zone_width_pct must be positive",
        ));
    }
    if config.get_int("grid", "ma_period", 20) < 0 {
        return Err(invalid("grid", "ma_period", "ma_period must be non-negative"));
    }
    if config.get_double("grid", "ma_nudge_max_pct", 2.0) < 0.0 {
        return Err(invalid(
            "grid",
            "ma_nudge_max_pct",
            "ma_nudge_max_pct must be non-negative",
        ));
    }
    Ok(())
}
