//! JSON report adapter: strategy parameters plus the full run result.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::GridTraderError;
use crate::domain::strategy::GridStrategy;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct Report<'a> {
    version: &'static str,
    strategy: &'a GridStrategy,
    result: &'a BacktestResult,
}

pub struct JsonReportAdapter {
    pretty: bool,
}

impl JsonReportAdapter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn render(
        &self,
        result: &BacktestResult,
        strategy: &GridStrategy,
    ) -> Result<String, GridTraderError> {
        let report = Report {
            version: env!("CARGO_PKG_VERSION"),
            strategy,
            result,
        };
        let json = if self.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        Ok(json)
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        strategy: &GridStrategy,
        output_path: &str,
    ) -> Result<(), GridTraderError> {
        let json = self.render(result, strategy)?;
        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json).map_err(|e| GridTraderError::Report {
            reason: format!("failed to write {}: {e}", path.display()),
        })?;
        tracing::info!(path = %path.display(), "report written");
        Ok(())
    }
}
