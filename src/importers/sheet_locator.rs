//! Logical sheet resolution
//!
//! Exported sheet names drift slightly between exports ("Gain Loss Details (2)",
//! "1 - Model Tolerance"), so each logical sheet is matched by substring.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::workbook::{Table, Workbook};
use crate::error::{ReportError, Result};

/// The four sheets a transition export must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalSheet {
    ModelTolerance,
    HoldingAndTrade,
    GainLoss,
    AccountAndCash,
}

impl LogicalSheet {
    /// Resolution order; the first missing sheet is the one reported
    pub const ALL: [LogicalSheet; 4] = [
        LogicalSheet::ModelTolerance,
        LogicalSheet::HoldingAndTrade,
        LogicalSheet::GainLoss,
        LogicalSheet::AccountAndCash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalSheet::ModelTolerance => "Model Tolerance",
            LogicalSheet::HoldingAndTrade => "Holding and Trade Details",
            LogicalSheet::GainLoss => "Gain Loss Details",
            LogicalSheet::AccountAndCash => "Account and Cash Details",
        }
    }
}

/// Substring each logical sheet must contain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub model_tolerance: String,
    pub holding_and_trade: String,
    pub gain_loss: String,
    pub account_and_cash: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            model_tolerance: LogicalSheet::ModelTolerance.as_str().to_string(),
            holding_and_trade: LogicalSheet::HoldingAndTrade.as_str().to_string(),
            gain_loss: LogicalSheet::GainLoss.as_str().to_string(),
            account_and_cash: LogicalSheet::AccountAndCash.as_str().to_string(),
        }
    }
}

impl SheetNames {
    pub fn substring(&self, sheet: LogicalSheet) -> &str {
        match sheet {
            LogicalSheet::ModelTolerance => &self.model_tolerance,
            LogicalSheet::HoldingAndTrade => &self.holding_and_trade,
            LogicalSheet::GainLoss => &self.gain_loss,
            LogicalSheet::AccountAndCash => &self.account_and_cash,
        }
    }
}

/// Tables resolved for each logical sheet
#[derive(Debug, Clone, Copy)]
pub struct LocatedSheets<'a> {
    pub model_tolerance: &'a Table,
    pub holding_and_trade: &'a Table,
    pub gain_loss: &'a Table,
    pub account_and_cash: &'a Table,
}

impl<'a> LocatedSheets<'a> {
    pub fn get(&self, sheet: LogicalSheet) -> &'a Table {
        match sheet {
            LogicalSheet::ModelTolerance => self.model_tolerance,
            LogicalSheet::HoldingAndTrade => self.holding_and_trade,
            LogicalSheet::GainLoss => self.gain_loss,
            LogicalSheet::AccountAndCash => self.account_and_cash,
        }
    }
}

/// First sheet (in workbook order) whose name contains the substring.
/// Matching is case-sensitive.
pub fn find_sheet<'a>(workbook: &'a Workbook, substring: &str) -> Option<&'a Table> {
    workbook
        .tables()
        .iter()
        .find(|table| table.name().contains(substring))
}

/// Resolve all four logical sheets, stopping at the first one that is missing
pub fn locate_sheets<'a>(workbook: &'a Workbook, names: &SheetNames) -> Result<LocatedSheets<'a>> {
    let resolve = |sheet: LogicalSheet| -> Result<&'a Table> {
        let table = find_sheet(workbook, names.substring(sheet)).ok_or_else(|| {
            ReportError::MissingSheet {
                logical: sheet.as_str().to_string(),
            }
        })?;
        debug!("Resolved '{}' -> '{}'", sheet.as_str(), table.name());
        Ok(table)
    };

    let located = LocatedSheets {
        model_tolerance: resolve(LogicalSheet::ModelTolerance)?,
        holding_and_trade: resolve(LogicalSheet::HoldingAndTrade)?,
        gain_loss: resolve(LogicalSheet::GainLoss)?,
        account_and_cash: resolve(LogicalSheet::AccountAndCash)?,
    };

    info!("All {} required sheets located", LogicalSheet::ALL.len());
    Ok(located)
}
