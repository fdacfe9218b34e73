//! gridtrader: capital-constrained grid trading backtester.
//!
//! Hexagonal layout: simulation logic in [`domain`], port traits in [`ports`],
//! file-backed implementations in [`adapters`], and the command-line surface
//! in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
