//! Target allocation normalization
//!
//! Reads the model tolerance sheet, cleans the asset class labels, derives the
//! change column and orders rows by target weight.

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::importers::Table;

pub const COL_CLASS: &str = "Class";
pub const COL_CURRENT_PCT: &str = "Current %";
pub const COL_TARGET_PCT: &str = "Target %";
pub const COL_TRADE_AMOUNT: &str = "Trade $";

pub const CASH_LABEL: &str = "Cash Equivalents";

/// One row of the allocation summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationRow {
    pub class_label: String,
    pub current_pct: Decimal,
    pub target_pct: Decimal,
    /// target_pct - current_pct, unrounded
    pub change_pct: Decimal,
    pub trade_amount: Decimal,
}

/// A (pattern, replacement) label cleanup rule
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabelRule {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
    /// Treat `pattern` as a regular expression instead of literal text
    #[serde(default)]
    pub regex: bool,
}

impl LabelRule {
    pub fn literal(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            regex: false,
        }
    }

    /// Strategy prefixes seen in Orion exports, then "U.S." shortening
    pub fn defaults() -> Vec<LabelRule> {
        vec![
            LabelRule::literal("Savvy Total Portfolios - ", ""),
            LabelRule::literal("Savvy US Equity - ", ""),
            LabelRule::literal("Savvy Strategic 90/10 ", ""),
            LabelRule::literal("STP - Moderate Aggressive - ", ""),
            LabelRule::literal("U.S.", "US"),
        ]
    }
}

/// Compiled, ordered label rules
#[derive(Debug, Clone)]
pub struct LabelCleaner {
    rules: Vec<(Regex, String)>,
}

impl LabelCleaner {
    pub fn new(rules: &[LabelRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let source = if rule.regex {
                    rule.pattern.clone()
                } else {
                    regex::escape(&rule.pattern)
                };
                let compiled = Regex::new(&source).map_err(|source| ReportError::InvalidRule {
                    pattern: rule.pattern.clone(),
                    source,
                })?;
                Ok((compiled, rule.replacement.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Apply every rule in order, then trim
    pub fn clean(&self, label: &str) -> String {
        let mut cleaned = label.to_string();
        for (pattern, replacement) in &self.rules {
            // NoExpand keeps literal replacements free of `$` group syntax
            cleaned = pattern
                .replace_all(&cleaned, regex::NoExpand(replacement))
                .into_owned();
        }
        cleaned.trim().to_string()
    }
}

/// Normalize the model tolerance sheet into ordered allocation rows
pub fn normalize_allocation(table: &Table, cleaner: &LabelCleaner) -> Result<Vec<AllocationRow>> {
    let col_class = table.require_column(COL_CLASS)?;
    let col_current = table.require_column(COL_CURRENT_PCT)?;
    let col_target = table.require_column(COL_TARGET_PCT)?;
    let col_trade = table.require_column(COL_TRADE_AMOUNT)?;

    let mut rows = Vec::new();
    for row in table.rows() {
        let Some(label) = row.text(col_class).filter(|l| !l.trim().is_empty()) else {
            continue;
        };

        let current_pct = row.decimal_or_zero(col_current);
        let target_pct = row.decimal_or_zero(col_target);
        let change_pct =
            target_pct
                .checked_sub(current_pct)
                .ok_or_else(|| ReportError::Overflow {
                    quantity: format!("change % for '{}'", label.trim()),
                })?;

        rows.push(AllocationRow {
            class_label: cleaner.clean(&label),
            current_pct,
            target_pct,
            change_pct,
            trade_amount: row.decimal_or_zero(col_trade),
        });
    }

    // Stable: equal targets keep sheet order
    rows.sort_by(|a, b| b.target_pct.cmp(&a.target_pct));

    relabel_cash(&mut rows);

    debug!("Normalized {} allocation rows", rows.len());
    Ok(rows)
}

/// Rename the first row mentioning cash to the canonical cash label
fn relabel_cash(rows: &mut [AllocationRow]) {
    if let Some(row) = rows
        .iter_mut()
        .find(|row| row.class_label.to_lowercase().contains("cash"))
    {
        row.class_label = CASH_LABEL.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::Cell;
    use rust_decimal_macros::dec;

    fn tolerance_table(rows: &[(&str, f64, f64, f64)]) -> Table {
        Table::new(
            "Model Tolerance",
            vec![
                COL_CLASS.to_string(),
                COL_CURRENT_PCT.to_string(),
                COL_TARGET_PCT.to_string(),
                COL_TRADE_AMOUNT.to_string(),
            ],
            rows.iter()
                .map(|(class, current, target, trade)| {
                    vec![
                        Cell::from(*class),
                        Cell::from(*current),
                        Cell::from(*target),
                        Cell::from(*trade),
                    ]
                })
                .collect(),
        )
    }

    fn default_cleaner() -> LabelCleaner {
        LabelCleaner::new(&LabelRule::defaults()).unwrap()
    }

    #[test]
    fn test_equity_and_cash_scenario() {
        let table = tolerance_table(&[
            ("Savvy Total Portfolios - US Equity", 40.0, 35.0, -5000.0),
            ("Savvy Total Portfolios - Cash", 5.0, 10.0, 5000.0),
        ]);

        let rows = normalize_allocation(&table, &default_cleaner()).unwrap();

        let labels: Vec<_> = rows.iter().map(|r| r.class_label.as_str()).collect();
        assert_eq!(labels, vec!["US Equity", "Cash Equivalents"]);
        assert_eq!(rows[0].change_pct, dec!(-5));
        assert_eq!(rows[1].change_pct, dec!(5));
    }

    #[test]
    fn test_change_overflow_is_error() {
        let table = Table::new(
            "Model Tolerance",
            vec![
                COL_CLASS.to_string(),
                COL_CURRENT_PCT.to_string(),
                COL_TARGET_PCT.to_string(),
                COL_TRADE_AMOUNT.to_string(),
            ],
            vec![vec![
                Cell::from("Bonds"),
                Cell::Number(Decimal::MIN),
                Cell::Number(Decimal::MAX),
                Cell::Empty,
            ]],
        );
        let err = normalize_allocation(&table, &default_cleaner()).unwrap_err();
        assert!(matches!(err, ReportError::Overflow { .. }));
        assert!(err.to_string().contains("Bonds"));
    }

    #[test]
    fn test_sorted_by_target_descending_stable() {
        let table = tolerance_table(&[
            ("Bonds", 10.0, 20.0, 0.0),
            ("International", 15.0, 30.0, 0.0),
            ("Real Estate", 5.0, 20.0, 0.0),
        ]);

        let rows = normalize_allocation(&table, &default_cleaner()).unwrap();
        let labels: Vec<_> = rows.iter().map(|r| r.class_label.as_str()).collect();
        assert_eq!(labels, vec!["International", "Bonds", "Real Estate"]);
    }

    #[test]
    fn test_only_first_cash_row_relabeled() {
        let table = tolerance_table(&[
            ("Cash Sweep", 2.0, 3.0, 0.0),
            ("Money Market CASH", 1.0, 4.0, 0.0),
        ]);

        let rows = normalize_allocation(&table, &default_cleaner()).unwrap();
        assert_eq!(rows[0].class_label, CASH_LABEL);
        assert_eq!(rows[1].class_label, "Cash Sweep");
        assert_eq!(
            rows.iter().filter(|r| r.class_label == CASH_LABEL).count(),
            1
        );
    }

    #[test]
    fn test_no_cash_row_is_not_an_error() {
        let table = tolerance_table(&[("Equity", 50.0, 60.0, 0.0), ("Bonds", 50.0, 40.0, 0.0)]);
        let rows = normalize_allocation(&table, &default_cleaner()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.class_label != CASH_LABEL));
    }

    #[test]
    fn test_us_abbreviation_and_trim() {
        let cleaner = default_cleaner();
        assert_eq!(
            cleaner.clean("Savvy US Equity - U.S. Large Cap  "),
            "US Large Cap"
        );
        assert_eq!(cleaner.clean("  STP - Moderate Aggressive - Bonds"), "Bonds");
    }

    #[test]
    fn test_regex_rule() {
        let cleaner = LabelCleaner::new(&[LabelRule {
            pattern: r"^\d+\s*-\s*".to_string(),
            replacement: String::new(),
            regex: true,
        }])
        .unwrap();
        assert_eq!(cleaner.clean("03 - Emerging Markets"), "Emerging Markets");
    }

    #[test]
    fn test_invalid_regex_rule_is_rejected() {
        let result = LabelCleaner::new(&[LabelRule {
            pattern: "(unclosed".to_string(),
            replacement: String::new(),
            regex: true,
        }]);
        assert!(matches!(result, Err(ReportError::InvalidRule { .. })));
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let table = Table::new("Model Tolerance", vec![COL_CLASS.to_string()], vec![]);
        let err = normalize_allocation(&table, &default_cleaner()).unwrap_err();
        assert!(err.to_string().contains(COL_CURRENT_PCT));
    }
}
