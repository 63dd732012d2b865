//! Report model assembly
//!
//! `build_report_model` is the single place where sheets are resolved and every
//! derivation runs. Any failure here aborts the report before layout starts.

use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use super::allocation::{normalize_allocation, AllocationRow, LabelCleaner};
use super::financials::{
    read_gain_loss, summarize_accounts, tax_impact_pct, AccountSummary, GainLossSummary,
};
use super::trades::{select_trades, RankedTradeList};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::importers::{locate_sheets, Table, Workbook};
use crate::reports::logo::LogoImage;

pub const COL_MODEL_CATEGORY: &str = "Model Category";

/// Everything the composer needs for one client's report
#[derive(Debug, Clone, Serialize)]
pub struct ReportModel {
    pub client_name: String,
    pub target_model_name: String,
    pub allocation: Vec<AllocationRow>,
    pub buys: RankedTradeList,
    pub sells: RankedTradeList,
    pub gain_loss: GainLossSummary,
    pub accounts: AccountSummary,
    pub tax_impact_pct: Decimal,
    #[serde(skip)]
    pub logo: Option<LogoImage>,
}

/// Name of the model the client is moving to.
///
/// First distinct, non-empty category that is not "unassigned"; falls back to
/// `default_name` when none qualifies or the column is absent.
pub fn identify_target_model(table: &Table, default_name: &str) -> String {
    let Some(col) = table.column(COL_MODEL_CATEGORY) else {
        debug!("No '{}' column, using default model name", COL_MODEL_CATEGORY);
        return default_name.to_string();
    };

    table
        .rows()
        .filter_map(|row| row.text(col))
        .map(|value| value.trim().to_string())
        .unique()
        .find(|value| !value.is_empty() && value.to_lowercase() != "unassigned")
        .unwrap_or_else(|| default_name.to_string())
}

/// Derive the full report model from a loaded workbook
pub fn build_report_model(
    workbook: &Workbook,
    client_name: &str,
    logo: Option<LogoImage>,
    config: &ReportConfig,
) -> Result<ReportModel> {
    let sheets = locate_sheets(workbook, &config.sheets)?;

    let target_model_name =
        identify_target_model(sheets.holding_and_trade, &config.default_model_name);

    let cleaner = LabelCleaner::new(&config.label_rules)?;
    let allocation = normalize_allocation(sheets.model_tolerance, &cleaner)?;

    let selection = select_trades(sheets.holding_and_trade, config.top_trades)?;

    let gain_loss = read_gain_loss(sheets.gain_loss, config.strict_gain_loss_rows)?;
    let accounts = summarize_accounts(sheets.account_and_cash)?;
    let tax_impact_pct = tax_impact_pct(&gain_loss, &accounts)?;

    info!(
        "Built report model for '{}': model '{}', {} allocation rows, {} buys, {} sells",
        client_name,
        target_model_name,
        allocation.len(),
        selection.buys.len(),
        selection.sells.len()
    );

    Ok(ReportModel {
        client_name: client_name.to_string(),
        target_model_name,
        allocation,
        buys: selection.buys,
        sells: selection.sells,
        gain_loss,
        accounts,
        tax_impact_pct,
        logo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::Cell;

    fn category_table(values: &[Cell]) -> Table {
        Table::new(
            "Holding and Trade Details",
            vec![COL_MODEL_CATEGORY.to_string(), "Ticker".to_string()],
            values
                .iter()
                .map(|v| vec![v.clone(), Cell::from("VTI")])
                .collect(),
        )
    }

    #[test]
    fn test_skips_unassigned_and_blanks() {
        let table = category_table(&[
            Cell::Empty,
            Cell::from("  Unassigned "),
            Cell::from("UNASSIGNED"),
            Cell::from(" Savvy Growth 80/20 "),
            Cell::from("Savvy Income"),
        ]);
        assert_eq!(identify_target_model(&table, "Fallback"), "Savvy Growth 80/20");
    }

    #[test]
    fn test_falls_back_when_nothing_valid() {
        let table = category_table(&[Cell::from("unassigned"), Cell::Empty]);
        assert_eq!(identify_target_model(&table, "Fallback"), "Fallback");
    }

    #[test]
    fn test_falls_back_when_column_absent() {
        let table = Table::new("Holding and Trade Details", vec!["Ticker".to_string()], vec![]);
        assert_eq!(identify_target_model(&table, "Fallback"), "Fallback");
    }
}
