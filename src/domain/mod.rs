//! Simulation core: market data, grid levels, capital, orders and positions.

pub mod ohlcv;
pub mod grid;
pub mod capital;
pub mod position;
pub mod ledger;
pub mod execution;
pub mod order_book;
pub mod volume_profile;
pub mod strategy;
pub mod snapshot;
pub mod backtest;
pub mod metrics;
pub mod config_validation;
pub mod error;
