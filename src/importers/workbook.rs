//! In-memory workbook model
//!
//! A `Workbook` is an ordered, read-only set of named tables. Each table keeps
//! its header names and typed cells; derivations read from it and build new
//! values rather than editing it.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{ReportError, Result};

/// A single typed cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(Decimal),
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the cell. Text is parsed leniently so that exports
    /// carrying "$1,234.50" or "(500)" still read as numbers.
    pub fn decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Number(d) => Some(*d),
            Cell::Text(s) => parse_decimal_text(s),
            Cell::Empty | Cell::Bool(_) => None,
        }
    }

    /// Text view of the cell. Numbers are rendered without trailing zeros.
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(d) => Some(d.normalize().to_string()),
            Cell::Text(s) => Some(s.clone()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }
}

impl Cell {
    /// Numeric cell from a spreadsheet float; `None` when the value has no
    /// `Decimal` representation (non-finite or beyond ~7.9e28)
    pub fn from_float(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // The shortest decimal string keeps 0.1 as 0.1; tiny values that need
        // more than 28 places fall back to the rounding conversion
        Decimal::from_str(&value.to_string())
            .ok()
            .or_else(|| Decimal::try_from(value).ok())
            .map(Cell::Number)
    }
}

#[cfg(test)]
impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::from_float(value).unwrap_or(Cell::Empty)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Parse numeric text such as "1,234.56", "$-20", "(75.10)" or "12.5%"
pub fn parse_decimal_text(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (negative, body) = match trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | ' '))
        .collect();

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negative { -value } else { value })
}

/// A named sheet: header row plus data rows
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, dropping rows in which every cell is empty
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let columns = columns.into_iter().map(|c| c.trim().to_string()).collect();
        let rows = rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .collect();

        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of a column the caller cannot do without
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name)
            .ok_or_else(|| ReportError::missing_column(&self.name, name))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row { cells })
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row { cells })
    }
}

/// Borrowed view over one data row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    /// Cell at a column index; short rows read as empty
    pub fn get(&self, index: usize) -> &'a Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.cells.get(index).unwrap_or(EMPTY)
    }

    pub fn decimal(&self, index: usize) -> Option<Decimal> {
        self.get(index).decimal()
    }

    /// Numeric value where an empty cell counts as zero
    pub fn decimal_or_zero(&self, index: usize) -> Decimal {
        self.decimal(index).unwrap_or(Decimal::ZERO)
    }

    pub fn text(&self, index: usize) -> Option<String> {
        self.get(index).text()
    }
}

/// Ordered collection of sheets loaded from one export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    tables: Vec<Table>,
}

impl Workbook {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name()).collect()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }
}
