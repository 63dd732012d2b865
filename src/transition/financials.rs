//! Account value and realized gain/loss aggregation

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::error::{ReportError, Result};
use crate::importers::Table;

pub const COL_ACCOUNT_VALUE: &str = "Account Value";

pub const COL_SHORT_TERM_GAIN: &str = "Trade Short Term Gain";
pub const COL_LONG_TERM_GAIN: &str = "Trade Long Term Gain";
pub const COL_TOTAL_GAIN: &str = "Trade Total Gain $";
pub const COL_ESTIMATED_TAX: &str = "Estimated Tax";
pub const COL_POST_TRADE_YTD_GAIN: &str = "Post-Trade YTD Gain";

/// Realized gain and tax estimate for the whole transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GainLossSummary {
    pub short_term_gain: Decimal,
    pub long_term_gain: Decimal,
    pub total_gain: Decimal,
    pub estimated_tax: Decimal,
    pub post_trade_ytd_gain: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub total_value: Decimal,
}

/// Sum of account values over every row; blanks add nothing
pub fn summarize_accounts(table: &Table) -> Result<AccountSummary> {
    let col_value = table.require_column(COL_ACCOUNT_VALUE)?;

    let total_value = table.rows().try_fold(Decimal::ZERO, |total, row| {
        total
            .checked_add(row.decimal_or_zero(col_value))
            .ok_or_else(|| ReportError::Overflow {
                quantity: "total account value".to_string(),
            })
    })?;

    Ok(AccountSummary { total_value })
}

/// Read the summary row of the gain/loss sheet.
///
/// The sheet should carry exactly one row. Extra rows are ignored with a
/// warning unless `strict` is set, in which case they are a schema error.
pub fn read_gain_loss(table: &Table, strict: bool) -> Result<GainLossSummary> {
    let col_short = table.require_column(COL_SHORT_TERM_GAIN)?;
    let col_long = table.require_column(COL_LONG_TERM_GAIN)?;
    let col_total = table.require_column(COL_TOTAL_GAIN)?;
    let col_tax = table.require_column(COL_ESTIMATED_TAX)?;
    let col_ytd = table.require_column(COL_POST_TRADE_YTD_GAIN)?;

    let row = table.row(0).ok_or_else(|| ReportError::Schema {
        sheet: table.name().to_string(),
        detail: "no summary row".to_string(),
    })?;

    if table.len() > 1 {
        if strict {
            return Err(ReportError::Schema {
                sheet: table.name().to_string(),
                detail: format!("expected one summary row, found {}", table.len()),
            });
        }
        warn!(
            "'{}' has {} summary rows, using the first",
            table.name(),
            table.len()
        );
    }

    Ok(GainLossSummary {
        short_term_gain: row.decimal_or_zero(col_short),
        long_term_gain: row.decimal_or_zero(col_long),
        total_gain: row.decimal_or_zero(col_total),
        estimated_tax: row.decimal_or_zero(col_tax),
        post_trade_ytd_gain: row.decimal_or_zero(col_ytd),
    })
}

/// Estimated tax as a percentage of total account value
pub fn tax_impact_pct(gain_loss: &GainLossSummary, accounts: &AccountSummary) -> Result<Decimal> {
    if accounts.total_value.is_zero() {
        return Err(ReportError::Division {
            quantity: "tax impact %".to_string(),
            denominator: "total account value".to_string(),
        });
    }

    gain_loss
        .estimated_tax
        .checked_div(accounts.total_value)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| ReportError::Overflow {
            quantity: "tax impact %".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::Cell;
    use rust_decimal_macros::dec;

    fn gain_loss_table(rows: Vec<[f64; 5]>) -> Table {
        Table::new(
            "Gain Loss Details",
            vec![
                COL_SHORT_TERM_GAIN.to_string(),
                COL_LONG_TERM_GAIN.to_string(),
                COL_TOTAL_GAIN.to_string(),
                COL_ESTIMATED_TAX.to_string(),
                COL_POST_TRADE_YTD_GAIN.to_string(),
            ],
            rows.into_iter()
                .map(|r| r.iter().map(|v| Cell::from(*v)).collect())
                .collect(),
        )
    }

    fn accounts_table(values: &[Cell]) -> Table {
        Table::new(
            "Account and Cash Details",
            vec!["Account".to_string(), COL_ACCOUNT_VALUE.to_string()],
            values
                .iter()
                .map(|v| vec![Cell::from("acct"), v.clone()])
                .collect(),
        )
    }

    #[test]
    fn test_total_value_counts_every_row() {
        let table = accounts_table(&[
            Cell::from(100000.0),
            Cell::from(0.0),
            Cell::from(-250.5),
            Cell::Empty,
        ]);
        let summary = summarize_accounts(&table).unwrap();
        assert_eq!(summary.total_value, dec!(99749.5));
    }

    #[test]
    fn test_reads_first_gain_loss_row() {
        let table = gain_loss_table(vec![
            [1200.0, 3400.0, 4600.0, 920.0, 15000.0],
            [1.0, 2.0, 3.0, 4.0, 5.0],
        ]);
        let summary = read_gain_loss(&table, false).unwrap();
        assert_eq!(summary.total_gain, dec!(4600));
        assert_eq!(summary.estimated_tax, dec!(920));
        assert_eq!(summary.post_trade_ytd_gain, dec!(15000));
    }

    #[test]
    fn test_strict_mode_rejects_multiple_rows() {
        let table = gain_loss_table(vec![[1.0; 5], [2.0; 5]]);
        assert!(matches!(
            read_gain_loss(&table, true),
            Err(ReportError::Schema { .. })
        ));
    }

    #[test]
    fn test_empty_gain_loss_sheet_is_schema_error() {
        let table = gain_loss_table(vec![]);
        assert!(matches!(
            read_gain_loss(&table, false),
            Err(ReportError::Schema { .. })
        ));
    }

    #[test]
    fn test_missing_gain_field_named() {
        let table = Table::new(
            "Gain Loss Details",
            vec![COL_SHORT_TERM_GAIN.to_string()],
            vec![],
        );
        let err = read_gain_loss(&table, false).unwrap_err();
        assert!(err.to_string().contains(COL_LONG_TERM_GAIN));
    }

    #[test]
    fn test_total_value_overflow_is_error() {
        let table = accounts_table(&[Cell::Number(Decimal::MAX), Cell::Number(Decimal::MAX)]);
        match summarize_accounts(&table) {
            Err(ReportError::Overflow { quantity }) => assert_eq!(quantity, "total account value"),
            other => panic!("expected overflow, got {other:?}"),
        }
    }

    #[test]
    fn test_tax_impact_overflow_is_error() {
        let gain_loss = GainLossSummary {
            short_term_gain: dec!(0),
            long_term_gain: dec!(0),
            total_gain: dec!(0),
            estimated_tax: Decimal::MAX,
            post_trade_ytd_gain: dec!(0),
        };
        let accounts = AccountSummary {
            total_value: dec!(0.001),
        };
        assert!(matches!(
            tax_impact_pct(&gain_loss, &accounts),
            Err(ReportError::Overflow { .. })
        ));

        // Ratio fits but the percentage does not
        let accounts = AccountSummary {
            total_value: dec!(1),
        };
        assert!(matches!(
            tax_impact_pct(&gain_loss, &accounts),
            Err(ReportError::Overflow { .. })
        ));
    }

    #[test]
    fn test_tax_impact_pct() {
        let gain_loss = GainLossSummary {
            short_term_gain: dec!(0),
            long_term_gain: dec!(0),
            total_gain: dec!(0),
            estimated_tax: dec!(1500),
            post_trade_ytd_gain: dec!(0),
        };
        let accounts = AccountSummary {
            total_value: dec!(100000),
        };
        assert_eq!(tax_impact_pct(&gain_loss, &accounts).unwrap(), dec!(1.5));
    }

    #[test]
    fn test_zero_total_value_is_division_error() {
        let gain_loss = GainLossSummary {
            short_term_gain: dec!(0),
            long_term_gain: dec!(0),
            total_gain: dec!(0),
            estimated_tax: dec!(250),
            post_trade_ytd_gain: dec!(0),
        };
        let accounts = AccountSummary {
            total_value: Decimal::ZERO,
        };
        assert!(matches!(
            tax_impact_pct(&gain_loss, &accounts),
            Err(ReportError::Division { .. })
        ));
    }
}
