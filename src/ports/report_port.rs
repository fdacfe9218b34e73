//! Report output port.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::GridTraderError;
use crate::domain::strategy::GridStrategy;

pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        strategy: &GridStrategy,
        output_path: &str,
    ) -> Result<(), GridTraderError>;
}
